//! Persistence contract the repository is written against.

use crate::db::DbResult;
use crate::models::{AntiCoagulantDose, DoseField, EntityKind, Field, InrMeasurement, Timestamp};

/// Result ordering for a [`RecordQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Newest first
    #[default]
    TimestampDesc,
    /// Oldest first
    TimestampAsc,
    /// Highest value of a field first, newest first among ties
    FieldDesc(Field),
}

/// Predicate, sort and limit for a store query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordQuery {
    /// Inclusive `[start, end]`; `start > end` matches nothing
    pub range: Option<(Timestamp, Timestamp)>,
    pub order_by: OrderBy,
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Every record, newest first.
    pub fn all() -> Self {
        Self::default()
    }

    /// Records with `start <= timestamp <= end`, newest first.
    pub fn between(start: Timestamp, end: Timestamp) -> Self {
        Self {
            range: Some((start, end)),
            ..Self::default()
        }
    }

    pub fn ordered_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Minimal store the repository needs.
///
/// Writes take `&mut self`: the repository is the only writer.
pub trait EntityStore {
    fn insert_measurement(&mut self, measurement: &InrMeasurement) -> DbResult<()>;

    /// Returns `false` when no row has the measurement's id.
    fn update_measurement(&mut self, measurement: &InrMeasurement) -> DbResult<bool>;

    fn insert_dose(&mut self, dose: &AntiCoagulantDose) -> DbResult<()>;

    /// Returns `false` when no row has the dose's id.
    fn update_dose(&mut self, dose: &AntiCoagulantDose) -> DbResult<bool>;

    /// Remove all `ids` or none of them, returning the removed timestamps.
    fn delete(&mut self, kind: EntityKind, ids: &[String]) -> DbResult<Vec<Timestamp>>;

    fn find_measurement(&self, id: &str) -> DbResult<Option<InrMeasurement>>;

    fn find_dose(&self, id: &str) -> DbResult<Option<AntiCoagulantDose>>;

    fn query_measurements(&self, query: &RecordQuery) -> DbResult<Vec<InrMeasurement>>;

    fn query_doses(&self, query: &RecordQuery) -> DbResult<Vec<AntiCoagulantDose>>;

    fn sum_doses(&self, field: DoseField) -> DbResult<i64>;

    fn count(&self, kind: EntityKind) -> DbResult<u64>;
}
