//! Repository: the single owner of INR measurements and anticoagulant doses.
//!
//! Every mutation goes through [`Repository`]. After a successful write the
//! in-memory snapshots are re-read from the store in full, then the touched
//! timestamps are appended to every subscribed [`ChangeLog`]. A failed write
//! returns an error and leaves snapshots and change logs as they were.

mod change_log;
mod store;

pub use change_log::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{DbError, DbResult};
use crate::models::{
    AntiCoagulantDose, DoseField, DoseFields, EntityKind, Field, InrMeasurement,
    MeasurementFields, Record, RecordFields, Records, Timestamp,
};

/// Repository errors.
#[derive(Error, Debug)]
pub enum RepoError {
    /// The store call failed. For a create, update or delete the write itself
    /// may have landed with only the snapshot re-read failing; the next
    /// successful [`Repository::refresh`] then loads it and publishes its
    /// timestamps.
    #[error("Persistence error: {0}")]
    Persistence(#[from] DbError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Aggregates shown on the statistics screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseStatistics {
    /// Sum of primary doses (mg)
    pub total_primary: i64,
    /// Sum of secondary doses (mg)
    pub total_secondary: i64,
    pub dose_count: u64,
    /// Earliest logged dose, if any
    pub first_dose_at: Option<Timestamp>,
}

/// CRUD and range queries over an [`EntityStore`], with cached snapshots.
pub struct Repository<S: EntityStore> {
    store: S,
    inr_measurements: Vec<InrMeasurement>,
    anticoagulant_doses: Vec<AntiCoagulantDose>,
    change_logs: Vec<ChangeLog>,
    /// Written but not yet published: the refresh after the write failed
    pending_changes: Vec<Timestamp>,
}

impl<S: EntityStore> Repository<S> {
    /// Wrap a store and load both snapshots.
    pub fn new(store: S) -> RepoResult<Self> {
        let mut repo = Self {
            store,
            inr_measurements: Vec::new(),
            anticoagulant_doses: Vec::new(),
            change_logs: Vec::new(),
            pending_changes: Vec::new(),
        };
        repo.refresh()?;
        tracing::info!(
            measurements = repo.inr_measurements.len(),
            doses = repo.anticoagulant_doses.len(),
            "Repository loaded"
        );
        Ok(repo)
    }

    /// Re-read both snapshots from the store.
    ///
    /// Snapshots are only replaced once both reads have succeeded. Changes
    /// held back by an earlier failed refresh are published then.
    pub fn refresh(&mut self) -> RepoResult<()> {
        let measurements = persisted(
            self.store.query_measurements(&RecordQuery::all()),
            "load INR measurements",
        )?;
        let doses = persisted(
            self.store.query_doses(&RecordQuery::all()),
            "load anticoagulant doses",
        )?;
        self.inr_measurements = measurements;
        self.anticoagulant_doses = doses;
        self.publish_pending();
        Ok(())
    }

    /// Register a new change consumer.
    ///
    /// The returned log receives every change made after this call.
    pub fn subscribe_changes(&mut self) -> ChangeLog {
        let log = ChangeLog::new();
        self.change_logs.push(log.clone());
        log
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a record of either kind with a fresh identifier.
    pub fn create(&mut self, fields: RecordFields) -> RepoResult<Record> {
        match fields {
            RecordFields::InrMeasurement(f) => self
                .add_measurement(f.inr, f.timestamp)
                .map(Record::InrMeasurement),
            RecordFields::AntiCoagulantDose(f) => self
                .add_dose(f.dose, f.secondary_dose, f.note, f.timestamp)
                .map(Record::AntiCoagulantDose),
        }
    }

    /// Add an INR measurement.
    pub fn add_measurement(&mut self, inr: f64, timestamp: Timestamp) -> RepoResult<InrMeasurement> {
        let measurement = InrMeasurement::new(inr, timestamp);
        persisted(
            self.store.insert_measurement(&measurement),
            "save INR measurement",
        )?;
        tracing::info!(
            id = %measurement.id,
            inr,
            timestamp = %measurement.timestamp,
            "Created INR measurement"
        );

        self.commit(vec![measurement.timestamp])?;
        Ok(measurement)
    }

    /// Add an anticoagulant dose.
    pub fn add_dose(
        &mut self,
        dose: i32,
        secondary_dose: i32,
        note: Option<String>,
        timestamp: Timestamp,
    ) -> RepoResult<AntiCoagulantDose> {
        let dose = AntiCoagulantDose::new(dose, secondary_dose, note, timestamp);
        persisted(self.store.insert_dose(&dose), "save anticoagulant dose")?;
        tracing::info!(
            id = %dose.id,
            dose = dose.dose,
            secondary_dose = dose.secondary_dose,
            timestamp = %dose.timestamp,
            "Created anticoagulant dose"
        );

        self.commit(vec![dose.timestamp])?;
        Ok(dose)
    }

    /// Replace every mutable field of the record with `id`.
    ///
    /// The kind of `fields` selects which records are searched.
    pub fn update(&mut self, id: &str, fields: RecordFields) -> RepoResult<Record> {
        match fields {
            RecordFields::InrMeasurement(f) => {
                self.update_measurement(id, &f).map(Record::InrMeasurement)
            }
            RecordFields::AntiCoagulantDose(f) => {
                self.update_dose(id, &f).map(Record::AntiCoagulantDose)
            }
        }
    }

    /// Replace the value and timestamp of a measurement.
    pub fn update_measurement(
        &mut self,
        id: &str,
        fields: &MeasurementFields,
    ) -> RepoResult<InrMeasurement> {
        let mut measurement = persisted(
            self.store.find_measurement(id),
            "look up INR measurement",
        )?
        .ok_or_else(|| not_found(EntityKind::InrMeasurement, id))?;

        let previous = measurement.timestamp;
        measurement.apply(fields);

        let updated = persisted(
            self.store.update_measurement(&measurement),
            "update INR measurement",
        )?;
        if !updated {
            return Err(not_found(EntityKind::InrMeasurement, id));
        }
        tracing::info!(id, inr = measurement.inr, "Updated INR measurement");

        self.commit(touched(previous, measurement.timestamp))?;
        Ok(measurement)
    }

    /// Replace every mutable field of a dose.
    pub fn update_dose(&mut self, id: &str, fields: &DoseFields) -> RepoResult<AntiCoagulantDose> {
        let mut dose = persisted(self.store.find_dose(id), "look up anticoagulant dose")?
            .ok_or_else(|| not_found(EntityKind::AntiCoagulantDose, id))?;

        let previous = dose.timestamp;
        dose.apply(fields);

        if !persisted(self.store.update_dose(&dose), "update anticoagulant dose")? {
            return Err(not_found(EntityKind::AntiCoagulantDose, id));
        }
        tracing::info!(id, dose = dose.dose, "Updated anticoagulant dose");

        self.commit(touched(previous, dose.timestamp))?;
        Ok(dose)
    }

    /// Delete records of one kind. Either every id is removed or none is.
    pub fn delete(&mut self, kind: EntityKind, ids: &[String]) -> RepoResult<usize> {
        let removed = match self.store.delete(kind, ids) {
            Ok(removed) => removed,
            Err(DbError::NotFound(id)) => return Err(not_found(kind, &id)),
            Err(e) => {
                tracing::error!(error = %e, %kind, "Failed to delete records");
                return Err(e.into());
            }
        };

        let count = removed.len();
        tracing::info!(%kind, count, "Deleted records");

        self.commit(removed)?;
        Ok(count)
    }

    /// Queue the touched timestamps, then refresh snapshots, which publishes them.
    fn commit(&mut self, changed: Vec<Timestamp>) -> RepoResult<()> {
        self.pending_changes.extend(changed);
        self.refresh()
    }

    fn publish_pending(&mut self) {
        if self.pending_changes.is_empty() {
            return;
        }
        self.change_logs.retain(|log| !log.is_orphaned());
        for log in &self.change_logs {
            for timestamp in &self.pending_changes {
                log.record(*timestamp);
            }
        }
        self.pending_changes.clear();
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// All measurements, newest first.
    pub fn inr_measurements(&self) -> &[InrMeasurement] {
        &self.inr_measurements
    }

    /// All doses, newest first.
    pub fn anticoagulant_doses(&self) -> &[AntiCoagulantDose] {
        &self.anticoagulant_doses
    }

    /// Copy of the cached records of one kind.
    pub fn snapshot(&self, kind: EntityKind) -> Records {
        match kind {
            EntityKind::InrMeasurement => Records::InrMeasurements(self.inr_measurements.clone()),
            EntityKind::AntiCoagulantDose => {
                Records::AntiCoagulantDoses(self.anticoagulant_doses.clone())
            }
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Records with `start <= timestamp <= end`, newest first.
    pub fn query_range(&self, kind: EntityKind, start: Timestamp, end: Timestamp) -> RepoResult<Records> {
        tracing::debug!(%kind, %start, %end, "Querying range");
        Ok(match kind {
            EntityKind::InrMeasurement => {
                Records::InrMeasurements(self.measurements_between(start, end)?)
            }
            EntityKind::AntiCoagulantDose => {
                Records::AntiCoagulantDoses(self.doses_between(start, end)?)
            }
        })
    }

    pub fn measurements_between(&self, start: Timestamp, end: Timestamp) -> RepoResult<Vec<InrMeasurement>> {
        persisted(
            self.store
                .query_measurements(&RecordQuery::between(start, end)),
            "query INR measurements",
        )
    }

    pub fn doses_between(&self, start: Timestamp, end: Timestamp) -> RepoResult<Vec<AntiCoagulantDose>> {
        persisted(
            self.store.query_doses(&RecordQuery::between(start, end)),
            "query anticoagulant doses",
        )
    }

    /// The latest record of a kind.
    pub fn most_recent(&self, kind: EntityKind) -> RepoResult<Option<Record>> {
        Ok(match kind {
            EntityKind::InrMeasurement => self.latest_measurement()?.map(Record::InrMeasurement),
            EntityKind::AntiCoagulantDose => self.latest_dose()?.map(Record::AntiCoagulantDose),
        })
    }

    pub fn latest_measurement(&self) -> RepoResult<Option<InrMeasurement>> {
        let latest = persisted(
            self.store.query_measurements(&RecordQuery::all().limit(1)),
            "fetch most recent INR measurement",
        )?;
        Ok(latest.into_iter().next())
    }

    pub fn latest_dose(&self) -> RepoResult<Option<AntiCoagulantDose>> {
        let latest = persisted(
            self.store.query_doses(&RecordQuery::all().limit(1)),
            "fetch most recent anticoagulant dose",
        )?;
        Ok(latest.into_iter().next())
    }

    /// The record with the highest `field` value in `[start, end]`.
    ///
    /// The field decides the kind. Ties go to the newest record.
    pub fn max_in_range(&self, field: Field, start: Timestamp, end: Timestamp) -> RepoResult<Option<Record>> {
        tracing::debug!(?field, %start, %end, "Querying maximum in range");
        let query = RecordQuery::between(start, end)
            .ordered_by(OrderBy::FieldDesc(field))
            .limit(1);

        Ok(match field.kind() {
            EntityKind::InrMeasurement => persisted(
                self.store.query_measurements(&query),
                "fetch highest INR measurement",
            )?
            .into_iter()
            .next()
            .map(Record::InrMeasurement),
            EntityKind::AntiCoagulantDose => {
                persisted(self.store.query_doses(&query), "fetch highest dose")?
                    .into_iter()
                    .next()
                    .map(Record::AntiCoagulantDose)
            }
        })
    }

    /// Sum of a dose field over every dose.
    pub fn total_of(&self, field: DoseField) -> RepoResult<i64> {
        persisted(self.store.sum_doses(field), "sum doses")
    }

    /// Number of records of a kind.
    pub fn count_of(&self, kind: EntityKind) -> RepoResult<u64> {
        persisted(self.store.count(kind), "count records")
    }

    pub fn dose_statistics(&self) -> RepoResult<DoseStatistics> {
        let first = persisted(
            self.store.query_doses(
                &RecordQuery::all()
                    .ordered_by(OrderBy::TimestampAsc)
                    .limit(1),
            ),
            "fetch first dose",
        )?;

        Ok(DoseStatistics {
            total_primary: self.total_of(DoseField::Primary)?,
            total_secondary: self.total_of(DoseField::Secondary)?,
            dose_count: self.count_of(EntityKind::AntiCoagulantDose)?,
            first_dose_at: first.first().map(|d| d.timestamp),
        })
    }
}

/// Log a failed store call and lift it into a repository error.
fn persisted<T>(result: DbResult<T>, action: &'static str) -> RepoResult<T> {
    result.map_err(|e| {
        tracing::error!(error = %e, "Failed to {}", action);
        RepoError::Persistence(e)
    })
}

fn not_found(kind: EntityKind, id: &str) -> RepoError {
    tracing::warn!(%kind, id, "Record not found");
    RepoError::NotFound {
        kind,
        id: id.to_string(),
    }
}

/// Timestamps an update touched, previous first when it moved.
fn touched(previous: Timestamp, current: Timestamp) -> Vec<Timestamp> {
    if previous == current {
        vec![current]
    } else {
        vec![previous, current]
    }
}
