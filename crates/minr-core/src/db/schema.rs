//! SQLite schema definition.

/// Complete database schema for mINR.
///
/// Timestamps are stored as UTC milliseconds plus the UTC offset (seconds
/// east) they were recorded in, so range predicates compare instants and
/// records round-trip with their original offset.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- INR Measurements
-- ============================================================================

CREATE TABLE IF NOT EXISTS inr_measurements (
    id TEXT PRIMARY KEY,
    inr REAL NOT NULL,
    timestamp_ms INTEGER NOT NULL,
    utc_offset INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_inr_timestamp ON inr_measurements(timestamp_ms);

-- ============================================================================
-- Anticoagulant Doses
-- ============================================================================

CREATE TABLE IF NOT EXISTS anticoagulant_doses (
    id TEXT PRIMARY KEY,
    dose INTEGER NOT NULL,
    secondary_dose INTEGER NOT NULL DEFAULT 0,
    note TEXT,
    timestamp_ms INTEGER NOT NULL,
    utc_offset INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_doses_timestamp ON anticoagulant_doses(timestamp_ms);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_timestamp_required() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO inr_measurements (id, inr) VALUES ('m1', 2.5)",
            [],
        );
        assert!(result.is_err());
    }
}
