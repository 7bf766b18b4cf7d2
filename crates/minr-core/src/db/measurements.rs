//! INR measurement database operations.

use rusqlite::{params, params_from_iter, OptionalExtension};

use super::{from_storage, select_sql, to_storage, Database, DbError, DbResult};
use crate::models::{EntityKind, InrMeasurement};
use crate::repository::RecordQuery;

const COLUMNS: &str = "id, inr, timestamp_ms, utc_offset";

impl Database {
    /// Insert a new INR measurement.
    pub fn insert_measurement(&self, measurement: &InrMeasurement) -> DbResult<()> {
        let (timestamp_ms, utc_offset) = to_storage(&measurement.timestamp);
        self.conn.execute(
            r#"
            INSERT INTO inr_measurements (id, inr, timestamp_ms, utc_offset)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![measurement.id, measurement.inr, timestamp_ms, utc_offset],
        )?;
        Ok(())
    }

    /// Replace the value and timestamp of an existing measurement.
    pub fn update_measurement(&self, measurement: &InrMeasurement) -> DbResult<bool> {
        let (timestamp_ms, utc_offset) = to_storage(&measurement.timestamp);
        let rows_affected = self.conn.execute(
            r#"
            UPDATE inr_measurements SET
                inr = ?2,
                timestamp_ms = ?3,
                utc_offset = ?4,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![measurement.id, measurement.inr, timestamp_ms, utc_offset],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a measurement by ID.
    pub fn get_measurement(&self, id: &str) -> DbResult<Option<InrMeasurement>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM inr_measurements WHERE id = ?", COLUMNS),
                [id],
                |row| {
                    Ok(MeasurementRow {
                        id: row.get(0)?,
                        inr: row.get(1)?,
                        timestamp_ms: row.get(2)?,
                        utc_offset: row.get(3)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Query measurements with an optional range, ordering and limit.
    pub fn query_measurements(&self, query: &RecordQuery) -> DbResult<Vec<InrMeasurement>> {
        let (sql, values) = select_sql(EntityKind::InrMeasurement, COLUMNS, query)?;
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(MeasurementRow {
                id: row.get(0)?,
                inr: row.get(1)?,
                timestamp_ms: row.get(2)?,
                utc_offset: row.get(3)?,
            })
        })?;

        let mut measurements = Vec::new();
        for row in rows {
            measurements.push(row?.try_into()?);
        }
        Ok(measurements)
    }
}

/// Intermediate row struct for database mapping.
struct MeasurementRow {
    id: String,
    inr: f64,
    timestamp_ms: i64,
    utc_offset: i32,
}

impl TryFrom<MeasurementRow> for InrMeasurement {
    type Error = DbError;

    fn try_from(row: MeasurementRow) -> Result<Self, Self::Error> {
        Ok(InrMeasurement {
            id: row.id,
            inr: row.inr,
            timestamp: from_storage(row.timestamp_ms, row.utc_offset)?,
        })
    }
}
