//! Anticoagulant dose database operations.

use rusqlite::{params, params_from_iter, OptionalExtension};

use super::{from_storage, select_sql, to_storage, Database, DbError, DbResult};
use crate::models::{AntiCoagulantDose, EntityKind};
use crate::repository::RecordQuery;

const COLUMNS: &str = "id, dose, secondary_dose, note, timestamp_ms, utc_offset";

impl Database {
    /// Insert a new dose.
    pub fn insert_dose(&self, dose: &AntiCoagulantDose) -> DbResult<()> {
        let (timestamp_ms, utc_offset) = to_storage(&dose.timestamp);
        self.conn.execute(
            r#"
            INSERT INTO anticoagulant_doses (
                id, dose, secondary_dose, note, timestamp_ms, utc_offset
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                dose.id,
                dose.dose,
                dose.secondary_dose,
                dose.note,
                timestamp_ms,
                utc_offset,
            ],
        )?;
        Ok(())
    }

    /// Replace every mutable field of an existing dose.
    pub fn update_dose(&self, dose: &AntiCoagulantDose) -> DbResult<bool> {
        let (timestamp_ms, utc_offset) = to_storage(&dose.timestamp);
        let rows_affected = self.conn.execute(
            r#"
            UPDATE anticoagulant_doses SET
                dose = ?2,
                secondary_dose = ?3,
                note = ?4,
                timestamp_ms = ?5,
                utc_offset = ?6,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                dose.id,
                dose.dose,
                dose.secondary_dose,
                dose.note,
                timestamp_ms,
                utc_offset,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a dose by ID.
    pub fn get_dose(&self, id: &str) -> DbResult<Option<AntiCoagulantDose>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM anticoagulant_doses WHERE id = ?", COLUMNS),
                [id],
                |row| {
                    Ok(DoseRow {
                        id: row.get(0)?,
                        dose: row.get(1)?,
                        secondary_dose: row.get(2)?,
                        note: row.get(3)?,
                        timestamp_ms: row.get(4)?,
                        utc_offset: row.get(5)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Query doses with an optional range, ordering and limit.
    pub fn query_doses(&self, query: &RecordQuery) -> DbResult<Vec<AntiCoagulantDose>> {
        let (sql, values) = select_sql(EntityKind::AntiCoagulantDose, COLUMNS, query)?;
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(DoseRow {
                id: row.get(0)?,
                dose: row.get(1)?,
                secondary_dose: row.get(2)?,
                note: row.get(3)?,
                timestamp_ms: row.get(4)?,
                utc_offset: row.get(5)?,
            })
        })?;

        let mut doses = Vec::new();
        for row in rows {
            doses.push(row?.try_into()?);
        }
        Ok(doses)
    }
}

/// Intermediate row struct for database mapping.
struct DoseRow {
    id: String,
    dose: i32,
    secondary_dose: i32,
    note: Option<String>,
    timestamp_ms: i64,
    utc_offset: i32,
}

impl TryFrom<DoseRow> for AntiCoagulantDose {
    type Error = DbError;

    fn try_from(row: DoseRow) -> Result<Self, Self::Error> {
        Ok(AntiCoagulantDose {
            id: row.id,
            dose: row.dose,
            secondary_dose: row.secondary_dose,
            note: row.note,
            timestamp: from_storage(row.timestamp_ms, row.utc_offset)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DoseField, Field};
    use crate::repository::OrderBy;
    use chrono::DateTime;

    fn ts(s: &str) -> crate::models::Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_insert_and_get_dose() {
        let db = Database::open_in_memory().unwrap();
        let d = AntiCoagulantDose::new(5, 1, Some("with dinner".into()), ts("2024-01-01T18:00:00Z"));
        db.insert_dose(&d).unwrap();

        let retrieved = db.get_dose(&d.id).unwrap().unwrap();
        assert_eq!(retrieved, d);
    }

    #[test]
    fn test_update_dose_clears_note() {
        let db = Database::open_in_memory().unwrap();
        let mut d = AntiCoagulantDose::new(5, 0, Some("typo".into()), ts("2024-01-01T18:00:00Z"));
        db.insert_dose(&d).unwrap();

        d.note = None;
        d.dose = 4;
        assert!(db.update_dose(&d).unwrap());

        let retrieved = db.get_dose(&d.id).unwrap().unwrap();
        assert_eq!(retrieved.dose, 4);
        assert!(retrieved.note.is_none());
    }

    #[test]
    fn test_sum_and_count() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.sum_doses(DoseField::Primary).unwrap(), 0);

        db.insert_dose(&AntiCoagulantDose::new(4, 1, None, ts("2024-01-01T08:00:00Z")))
            .unwrap();
        db.insert_dose(&AntiCoagulantDose::new(5, 0, None, ts("2024-01-02T08:00:00Z")))
            .unwrap();

        assert_eq!(db.sum_doses(DoseField::Primary).unwrap(), 9);
        assert_eq!(db.sum_doses(DoseField::Secondary).unwrap(), 1);
        assert_eq!(db.count(EntityKind::AntiCoagulantDose).unwrap(), 2);
        assert_eq!(db.count(EntityKind::InrMeasurement).unwrap(), 0);
    }

    #[test]
    fn test_highest_secondary_dose_first() {
        let db = Database::open_in_memory().unwrap();
        db.insert_dose(&AntiCoagulantDose::new(6, 1, None, ts("2024-01-01T08:00:00Z")))
            .unwrap();
        db.insert_dose(&AntiCoagulantDose::new(2, 3, None, ts("2024-01-02T08:00:00Z")))
            .unwrap();

        let query = RecordQuery::all()
            .ordered_by(OrderBy::FieldDesc(Field::SecondaryDose))
            .limit(1);
        let top = db.query_doses(&query).unwrap();
        assert_eq!(top[0].secondary_dose, 3);
    }
}
