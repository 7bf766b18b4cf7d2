//! Database layer for mINR.

mod doses;
mod measurements;
mod schema;

pub use schema::*;

use chrono::{DateTime, FixedOffset};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::models::{
    AntiCoagulantDose, DoseField, EntityKind, Field, InrMeasurement, Timestamp,
};
use crate::repository::{EntityStore, OrderBy, RecordQuery};

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Delete records of one kind in a single transaction.
    ///
    /// Returns the removed records' timestamps in the order the ids were
    /// given. An unknown id rolls the whole batch back.
    pub fn delete_records(&mut self, kind: EntityKind, ids: &[String]) -> DbResult<Vec<Timestamp>> {
        let tx = self.conn.transaction()?;
        let mut removed = Vec::with_capacity(ids.len());
        {
            let mut select = tx.prepare(&format!(
                "SELECT timestamp_ms, utc_offset FROM {} WHERE id = ?",
                kind.table()
            ))?;
            let mut delete = tx.prepare(&format!("DELETE FROM {} WHERE id = ?", kind.table()))?;

            let mut seen = std::collections::HashSet::new();
            for id in ids.iter().filter(|id| seen.insert(id.as_str())) {
                let stored: Option<(i64, i32)> = select
                    .query_row([id], |row| Ok((row.get(0)?, row.get(1)?)))
                    .optional()?;
                let (millis, offset) = stored.ok_or_else(|| DbError::NotFound(id.clone()))?;
                delete.execute([id])?;
                removed.push(from_storage(millis, offset)?);
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Sum a dose field over every dose.
    pub fn sum_doses(&self, field: DoseField) -> DbResult<i64> {
        let column = Field::from(field).column();
        let total = self.conn.query_row(
            &format!("SELECT COALESCE(SUM({}), 0) FROM anticoagulant_doses", column),
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Count the records of a kind.
    pub fn count(&self, kind: EntityKind) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

impl EntityStore for Database {
    fn insert_measurement(&mut self, measurement: &InrMeasurement) -> DbResult<()> {
        Database::insert_measurement(self, measurement)
    }

    fn update_measurement(&mut self, measurement: &InrMeasurement) -> DbResult<bool> {
        Database::update_measurement(self, measurement)
    }

    fn insert_dose(&mut self, dose: &AntiCoagulantDose) -> DbResult<()> {
        Database::insert_dose(self, dose)
    }

    fn update_dose(&mut self, dose: &AntiCoagulantDose) -> DbResult<bool> {
        Database::update_dose(self, dose)
    }

    fn delete(&mut self, kind: EntityKind, ids: &[String]) -> DbResult<Vec<Timestamp>> {
        self.delete_records(kind, ids)
    }

    fn find_measurement(&self, id: &str) -> DbResult<Option<InrMeasurement>> {
        self.get_measurement(id)
    }

    fn find_dose(&self, id: &str) -> DbResult<Option<AntiCoagulantDose>> {
        self.get_dose(id)
    }

    fn query_measurements(&self, query: &RecordQuery) -> DbResult<Vec<InrMeasurement>> {
        Database::query_measurements(self, query)
    }

    fn query_doses(&self, query: &RecordQuery) -> DbResult<Vec<AntiCoagulantDose>> {
        Database::query_doses(self, query)
    }

    fn sum_doses(&self, field: DoseField) -> DbResult<i64> {
        Database::sum_doses(self, field)
    }

    fn count(&self, kind: EntityKind) -> DbResult<u64> {
        Database::count(self, kind)
    }
}

/// Split a timestamp into its stored columns.
pub(crate) fn to_storage(timestamp: &Timestamp) -> (i64, i32) {
    (timestamp.timestamp_millis(), timestamp.offset().local_minus_utc())
}

/// Rebuild a timestamp from its stored columns.
pub(crate) fn from_storage(millis: i64, offset: i32) -> DbResult<Timestamp> {
    let offset = FixedOffset::east_opt(offset)
        .ok_or_else(|| DbError::Constraint(format!("Invalid UTC offset: {}", offset)))?;
    let utc = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::Constraint(format!("Timestamp out of range: {}", millis)))?;
    Ok(utc.with_timezone(&offset))
}

/// Smallest whole millisecond at or after `timestamp`.
fn ceil_millis(timestamp: &Timestamp) -> i64 {
    let sub_millis = timestamp.timestamp_subsec_nanos() % 1_000_000 != 0;
    timestamp.timestamp_millis() + i64::from(sub_millis)
}

/// Build a SELECT for `query` against `kind`'s table.
///
/// Column names come from fixed enums, never from caller strings.
pub(crate) fn select_sql(
    kind: EntityKind,
    columns: &str,
    query: &RecordQuery,
) -> DbResult<(String, Vec<i64>)> {
    let mut sql = format!("SELECT {} FROM {}", columns, kind.table());
    let mut params = Vec::new();

    if let Some((start, end)) = &query.range {
        sql.push_str(" WHERE timestamp_ms >= ? AND timestamp_ms <= ?");
        // Stored values are whole milliseconds: round the lower bound up and
        // the upper bound down so sub-millisecond bounds stay exact.
        params.push(ceil_millis(start));
        params.push(end.timestamp_millis());
    }

    match query.order_by {
        OrderBy::TimestampDesc => sql.push_str(" ORDER BY timestamp_ms DESC, id DESC"),
        OrderBy::TimestampAsc => sql.push_str(" ORDER BY timestamp_ms ASC, id ASC"),
        OrderBy::FieldDesc(field) => {
            if field.kind() != kind {
                return Err(DbError::Constraint(format!(
                    "Field {:?} does not belong to {}",
                    field, kind
                )));
            }
            sql.push_str(&format!(" ORDER BY {} DESC, timestamp_ms DESC, id DESC", field.column()));
        }
    }

    if let Some(limit) = query.limit {
        sql.push_str(" LIMIT ?");
        params.push(limit as i64);
    }

    Ok((sql, params))
}
