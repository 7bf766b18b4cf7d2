//! mINR Core Library
//!
//! Local-first INR and anticoagulant dose tracker.
//!
//! # Architecture
//!
//! ```text
//!   Swift UI / widgets / notification handler
//!                     │
//!               [FFI: MinrCore]
//!                     │
//!        ┌────────────┴─────────────┐
//!        ▼                          ▼
//!   Repository  ──drain──▶   Derived views (chart, status,
//!   (snapshots,  ChangeLog   calendar, export rows,
//!    queries)                reminder text)
//!        │                          ▲
//!        ▼                          │
//!   EntityStore             SharedPreferences
//!   (SQLite)                (read per call)
//! ```
//!
//! # Core Principle
//!
//! **Every mutation goes through the repository.** A write either succeeds and
//! refreshes every snapshot before anything else can read, or fails with an
//! error and changes nothing.
//!
//! # Modules
//!
//! - [`db`]: SQLite entity store
//! - [`models`]: Domain types (InrMeasurement, AntiCoagulantDose, Preferences)
//! - [`repository`]: CRUD, range queries, cached snapshots and change logs
//! - [`views`]: Pure calculators for charts, status and the calendar
//! - [`export`]: CSV export
//! - [`reminder`]: Daily reminder and its quick actions
//! - [`logging`]: Subscriber setup

pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod reminder;
pub mod repository;
pub mod views;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    AntiCoagulantDose, DoseField, DoseFields, EntityKind, Field, InrMeasurement,
    MeasurementFields, Preferences, Record, RecordFields, Records, SharedPreferences, Timestamp,
};
pub use repository::{ChangeLog, EntityStore, RepoError, Repository};
pub use views::ViewError;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Timelike};

use export::{format_timestamp, ExportError};
use models::{ChartColors, PreferencesError};
use reminder::{ReminderAction, ReminderRequest};
use views::{ChartPoint, DayDecoration, EntryStatus};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MinrError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl From<RepoError> for MinrError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Persistence(_) => MinrError::Persistence(e.to_string()),
            RepoError::NotFound { .. } => MinrError::NotFound(e.to_string()),
        }
    }
}

impl From<db::DbError> for MinrError {
    fn from(e: db::DbError) -> Self {
        MinrError::Persistence(e.to_string())
    }
}

impl From<ViewError> for MinrError {
    fn from(e: ViewError) -> Self {
        MinrError::InvalidRecord(e.to_string())
    }
}

impl From<ExportError> for MinrError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::View(e) => e.into(),
            ExportError::Io(_) => MinrError::Export(e.to_string()),
        }
    }
}

impl From<PreferencesError> for MinrError {
    fn from(e: PreferencesError) -> Self {
        MinrError::Persistence(format!("Preferences: {}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for MinrError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MinrError::Persistence(format!("Lock poisoned: {}", e))
    }
}

/// Parse an RFC 3339 timestamp coming from the host.
fn parse_timestamp(field: &str, value: &str) -> Result<Timestamp, MinrError> {
    if value.trim().is_empty() {
        return Err(MinrError::InvalidRecord(format!("missing {}", field)));
    }
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| MinrError::InvalidRecord(format!("{} {:?}: {}", field, value, e)))
}

fn parse_date(value: &str) -> Result<NaiveDate, MinrError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| MinrError::InvalidRecord(format!("day {:?}: {}", value, e)))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MinrCore>, MinrError> {
    let db = Database::open(&path)?;
    MinrCore::with_store(db)
}

/// Create an in-memory database (for testing and previews).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MinrCore>, MinrError> {
    let db = Database::open_in_memory()?;
    MinrCore::with_store(db)
}

/// Install the log subscriber. Returns `false` if one was already installed.
#[uniffi::export]
pub fn init_logging(level: String) -> bool {
    logging::init_logging(&level)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe repository and preferences wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MinrCore {
    repo: Arc<Mutex<Repository<Database>>>,
    prefs: SharedPreferences,
}

impl MinrCore {
    fn with_store(db: Database) -> Result<Arc<Self>, MinrError> {
        let repo = Repository::new(db)?;
        Ok(Arc::new(Self {
            repo: Arc::new(Mutex::new(repo)),
            prefs: SharedPreferences::default(),
        }))
    }
}

#[uniffi::export]
impl MinrCore {
    // =========================================================================
    // INR Measurements
    // =========================================================================

    pub fn add_measurement(
        &self,
        inr: f64,
        timestamp: String,
    ) -> Result<FfiInrMeasurement, MinrError> {
        let timestamp = parse_timestamp("timestamp", &timestamp)?;
        let mut repo = self.repo.lock()?;
        Ok(repo.add_measurement(inr, timestamp)?.into())
    }

    pub fn update_measurement(
        &self,
        id: String,
        inr: f64,
        timestamp: String,
    ) -> Result<FfiInrMeasurement, MinrError> {
        let fields = MeasurementFields {
            inr,
            timestamp: parse_timestamp("timestamp", &timestamp)?,
        };
        let mut repo = self.repo.lock()?;
        Ok(repo.update_measurement(&id, &fields)?.into())
    }

    /// Delete measurements. Either all ids are removed or none.
    pub fn delete_measurements(&self, ids: Vec<String>) -> Result<u32, MinrError> {
        let mut repo = self.repo.lock()?;
        let removed = repo.delete(EntityKind::InrMeasurement, &ids)?;
        Ok(removed as u32)
    }

    /// Cached snapshot, newest first.
    pub fn inr_measurements(&self) -> Result<Vec<FfiInrMeasurement>, MinrError> {
        let repo = self.repo.lock()?;
        Ok(repo.inr_measurements().iter().cloned().map(Into::into).collect())
    }

    pub fn measurements_between(
        &self,
        start: String,
        end: String,
    ) -> Result<Vec<FfiInrMeasurement>, MinrError> {
        let start = parse_timestamp("start", &start)?;
        let end = parse_timestamp("end", &end)?;
        let repo = self.repo.lock()?;
        let measurements = repo.measurements_between(start, end)?;
        Ok(measurements.into_iter().map(Into::into).collect())
    }

    pub fn latest_measurement(&self) -> Result<Option<FfiInrMeasurement>, MinrError> {
        let repo = self.repo.lock()?;
        Ok(repo.latest_measurement()?.map(Into::into))
    }

    /// Highest INR in the range, newest on ties.
    pub fn highest_inr_between(
        &self,
        start: String,
        end: String,
    ) -> Result<Option<FfiInrMeasurement>, MinrError> {
        let start = parse_timestamp("start", &start)?;
        let end = parse_timestamp("end", &end)?;
        let repo = self.repo.lock()?;
        let record = repo.max_in_range(Field::Inr, start, end)?;
        Ok(record
            .and_then(|r| r.as_measurement().cloned())
            .map(Into::into))
    }

    // =========================================================================
    // Anticoagulant Doses
    // =========================================================================

    pub fn add_dose(
        &self,
        dose: i32,
        secondary_dose: i32,
        note: Option<String>,
        timestamp: String,
    ) -> Result<FfiAntiCoagulantDose, MinrError> {
        let timestamp = parse_timestamp("timestamp", &timestamp)?;
        let mut repo = self.repo.lock()?;
        Ok(repo.add_dose(dose, secondary_dose, note, timestamp)?.into())
    }

    pub fn update_dose(
        &self,
        id: String,
        dose: i32,
        secondary_dose: i32,
        note: Option<String>,
        timestamp: String,
    ) -> Result<FfiAntiCoagulantDose, MinrError> {
        let fields = DoseFields {
            dose,
            secondary_dose,
            note,
            timestamp: parse_timestamp("timestamp", &timestamp)?,
        };
        let mut repo = self.repo.lock()?;
        Ok(repo.update_dose(&id, &fields)?.into())
    }

    /// Delete doses. Either all ids are removed or none.
    pub fn delete_doses(&self, ids: Vec<String>) -> Result<u32, MinrError> {
        let mut repo = self.repo.lock()?;
        let removed = repo.delete(EntityKind::AntiCoagulantDose, &ids)?;
        Ok(removed as u32)
    }

    /// Cached snapshot, newest first.
    pub fn anticoagulant_doses(&self) -> Result<Vec<FfiAntiCoagulantDose>, MinrError> {
        let repo = self.repo.lock()?;
        Ok(repo
            .anticoagulant_doses()
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    pub fn doses_between(
        &self,
        start: String,
        end: String,
    ) -> Result<Vec<FfiAntiCoagulantDose>, MinrError> {
        let start = parse_timestamp("start", &start)?;
        let end = parse_timestamp("end", &end)?;
        let repo = self.repo.lock()?;
        let doses = repo.doses_between(start, end)?;
        Ok(doses.into_iter().map(Into::into).collect())
    }

    pub fn latest_dose(&self) -> Result<Option<FfiAntiCoagulantDose>, MinrError> {
        let repo = self.repo.lock()?;
        Ok(repo.latest_dose()?.map(Into::into))
    }

    pub fn dose_statistics(&self) -> Result<FfiDoseStatistics, MinrError> {
        let repo = self.repo.lock()?;
        Ok(repo.dose_statistics()?.into())
    }

    // =========================================================================
    // Change Tracking
    // =========================================================================

    /// Register a consumer (calendar, widget) for changed timestamps.
    pub fn subscribe_changes(&self) -> Result<Arc<FfiChangeLog>, MinrError> {
        let mut repo = self.repo.lock()?;
        Ok(Arc::new(FfiChangeLog {
            log: repo.subscribe_changes(),
        }))
    }

    /// Re-read snapshots after an external sync.
    pub fn refresh(&self) -> Result<(), MinrError> {
        let mut repo = self.repo.lock()?;
        repo.refresh()?;
        Ok(())
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Chart data for the configured window ending at `now`.
    pub fn chart_series(&self, now: String) -> Result<FfiChartSeries, MinrError> {
        let now = parse_timestamp("now", &now)?;
        let prefs = self.prefs.current();
        let (start, end) = views::chart_window(now, &prefs)?;

        let repo = self.repo.lock()?;
        let measurements = repo.measurements_between(start, end)?;
        let doses = repo.doses_between(start, end)?;
        drop(repo);

        let series = views::compute_chart_series(&measurements, &doses, &prefs)?;
        Ok(FfiChartSeries::new(series, &prefs))
    }

    pub fn status_summary(&self, now: String) -> Result<FfiStatusSummary, MinrError> {
        let now = parse_timestamp("now", &now)?;
        let repo = self.repo.lock()?;
        let latest_inr = repo.latest_measurement()?;
        let latest_dose = repo.latest_dose()?;
        drop(repo);

        let summary =
            views::compute_status_summary(latest_inr.as_ref(), latest_dose.as_ref(), now)?;
        Ok(FfiStatusSummary {
            inr: summary.inr.into(),
            dose: match summary.dose {
                EntryStatus::NoData => FfiEntryStatus::NoData,
                EntryStatus::Recorded { value, days_since } => FfiEntryStatus::Recorded {
                    value: f64::from(value),
                    days_since,
                },
            },
        })
    }

    /// Calendar cell for `day` (`YYYY-MM-DD`), judged in `today`'s offset.
    pub fn day_decoration(
        &self,
        day: String,
        today: String,
    ) -> Result<FfiDayDecoration, MinrError> {
        let day = parse_date(&day)?;
        let today = parse_timestamp("today", &today)?;
        let repo = self.repo.lock()?;
        Ok(views::day_decoration(repo.anticoagulant_doses(), day, today).into())
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Write both CSV files into `dir`.
    pub fn export_csv(&self, dir: String) -> Result<FfiExportPaths, MinrError> {
        let prefs = self.prefs.current();
        let repo = self.repo.lock()?;
        let paths = export::write_csv_exports(&dir, &*repo, &prefs)?;
        Ok(FfiExportPaths {
            inr: paths.inr.to_string_lossy().into_owned(),
            anticoagulant: paths.anticoagulant.to_string_lossy().into_owned(),
        })
    }

    // =========================================================================
    // Reminder
    // =========================================================================

    /// The reminder to arm after cancelling all pending ones; `None` when disabled.
    pub fn reminder_request(&self) -> Result<Option<FfiReminderRequest>, MinrError> {
        let prefs = self.prefs.current();
        let latest = self.repo.lock()?.latest_dose()?;
        let request = reminder::build_reminder(&prefs, latest.as_ref())?;
        Ok(request.map(Into::into))
    }

    /// Handle a notification quick action.
    ///
    /// Unknown identifiers (the plain "open app" tap) log nothing.
    pub fn log_dose_from_action(
        &self,
        action_identifier: String,
        now: String,
    ) -> Result<Option<FfiAntiCoagulantDose>, MinrError> {
        let Some(action) = ReminderAction::from_identifier(&action_identifier) else {
            tracing::info!(action = %action_identifier, "Notification opened without action");
            return Ok(None);
        };
        let now = parse_timestamp("now", &now)?;
        let mut repo = self.repo.lock()?;
        let dose = reminder::log_dose_from_action(&mut *repo, action, now)?;
        Ok(dose.map(Into::into))
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    pub fn preferences(&self) -> FfiPreferences {
        self.prefs.current().into()
    }

    pub fn set_preferences(&self, prefs: FfiPreferences) -> Result<(), MinrError> {
        let prefs = Preferences::try_from(prefs)?;
        self.prefs.update(|current| *current = prefs);
        Ok(())
    }

    /// Replace the live preferences with the file at `path`, if it exists.
    pub fn load_preferences(&self, path: String) -> Result<FfiPreferences, MinrError> {
        let loaded = SharedPreferences::load_or_default(&path)?.current();
        self.prefs.update(|current| *current = loaded.clone());
        Ok(loaded.into())
    }

    pub fn save_preferences(&self, path: String) -> Result<(), MinrError> {
        self.prefs.save(&path)?;
        Ok(())
    }
}

/// Change consumer handle. Drain once per redraw.
#[derive(uniffi::Object)]
pub struct FfiChangeLog {
    log: ChangeLog,
}

#[uniffi::export]
impl FfiChangeLog {
    /// Timestamps changed since the last drain, oldest change first.
    pub fn drain(&self) -> Vec<String> {
        self.log.drain().iter().map(format_timestamp).collect()
    }

    /// Distinct changed calendar days (`YYYY-MM-DD`) in the given UTC offset.
    pub fn drain_days(&self, utc_offset_seconds: i32) -> Result<Vec<String>, MinrError> {
        let offset = FixedOffset::east_opt(utc_offset_seconds).ok_or_else(|| {
            MinrError::InvalidRecord(format!("UTC offset out of range: {}", utc_offset_seconds))
        })?;
        Ok(views::changed_days(&self.log.drain(), offset)
            .into_iter()
            .map(|day| day.format("%Y-%m-%d").to_string())
            .collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe INR measurement.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInrMeasurement {
    pub id: String,
    pub inr: f64,
    pub timestamp: String,
}

impl From<InrMeasurement> for FfiInrMeasurement {
    fn from(m: InrMeasurement) -> Self {
        Self {
            timestamp: format_timestamp(&m.timestamp),
            id: m.id,
            inr: m.inr,
        }
    }
}

/// FFI-safe anticoagulant dose.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAntiCoagulantDose {
    pub id: String,
    pub dose: i32,
    pub secondary_dose: i32,
    pub note: Option<String>,
    pub timestamp: String,
}

impl From<AntiCoagulantDose> for FfiAntiCoagulantDose {
    fn from(d: AntiCoagulantDose) -> Self {
        Self {
            timestamp: format_timestamp(&d.timestamp),
            id: d.id,
            dose: d.dose,
            secondary_dose: d.secondary_dose,
            note: d.note,
        }
    }
}

/// FFI-safe dose statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoseStatistics {
    pub total_primary: i64,
    pub total_secondary: i64,
    pub dose_count: u64,
    pub first_dose_at: Option<String>,
}

impl From<repository::DoseStatistics> for FfiDoseStatistics {
    fn from(stats: repository::DoseStatistics) -> Self {
        Self {
            total_primary: stats.total_primary,
            total_secondary: stats.total_secondary,
            dose_count: stats.dose_count,
            first_dose_at: stats.first_dose_at.as_ref().map(format_timestamp),
        }
    }
}

/// FFI-safe chart point.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChartPoint {
    pub timestamp: String,
    pub value: f64,
    pub normalized: f64,
}

impl From<ChartPoint> for FfiChartPoint {
    fn from(point: ChartPoint) -> Self {
        Self {
            timestamp: format_timestamp(&point.timestamp),
            value: point.value,
            normalized: point.normalized,
        }
    }
}

/// FFI-safe legend entry with its label already resolved.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLegendEntry {
    pub label: String,
    pub color: String,
}

/// FFI-safe chart data.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChartSeries {
    pub inr_axis_max: f64,
    pub dose_axis_max: i32,
    pub inr: Vec<FfiChartPoint>,
    pub primary: Vec<FfiChartPoint>,
    pub secondary: Option<Vec<FfiChartPoint>>,
    pub target_lower: f64,
    pub target_upper: f64,
    pub legend: Vec<FfiLegendEntry>,
    pub plot_width: f64,
}

impl FfiChartSeries {
    fn new(series: views::ChartSeries, prefs: &Preferences) -> Self {
        let points = |points: Vec<ChartPoint>| -> Vec<FfiChartPoint> {
            points.into_iter().map(Into::into).collect()
        };
        Self {
            inr_axis_max: series.inr_axis_max,
            dose_axis_max: series.dose_axis_max,
            inr: points(series.inr),
            primary: points(series.primary),
            secondary: series.secondary.map(points),
            target_lower: series.target_band.lower,
            target_upper: series.target_band.upper,
            legend: series
                .legend
                .into_iter()
                .map(|entry| FfiLegendEntry {
                    label: entry.series.label(prefs),
                    color: entry.color,
                })
                .collect(),
            plot_width: series.plot_width,
        }
    }
}

/// FFI-safe "days since" entry.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiEntryStatus {
    NoData,
    Recorded { value: f64, days_since: i64 },
}

impl From<EntryStatus<f64>> for FfiEntryStatus {
    fn from(status: EntryStatus<f64>) -> Self {
        match status {
            EntryStatus::NoData => FfiEntryStatus::NoData,
            EntryStatus::Recorded { value, days_since } => {
                FfiEntryStatus::Recorded { value, days_since }
            }
        }
    }
}

/// FFI-safe status summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatusSummary {
    pub inr: FfiEntryStatus,
    pub dose: FfiEntryStatus,
}

/// FFI-safe calendar decoration.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiDayDecoration {
    Future,
    Taken { dose: i32 },
    Missed,
}

impl From<DayDecoration> for FfiDayDecoration {
    fn from(decoration: DayDecoration) -> Self {
        match decoration {
            DayDecoration::Future => FfiDayDecoration::Future,
            DayDecoration::Taken { dose } => FfiDayDecoration::Taken { dose },
            DayDecoration::Missed => FfiDayDecoration::Missed,
        }
    }
}

/// FFI-safe export file locations.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExportPaths {
    pub inr: String,
    pub anticoagulant: String,
}

/// FFI-safe reminder request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminderRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub thread: String,
    pub hour: u32,
    pub minute: u32,
    /// Quick action identifiers to register with the category
    pub actions: Vec<String>,
}

impl From<ReminderRequest> for FfiReminderRequest {
    fn from(request: ReminderRequest) -> Self {
        Self {
            hour: request.time.hour(),
            minute: request.time.minute(),
            identifier: request.identifier,
            title: request.title,
            body: request.body,
            category: request.category,
            thread: request.thread,
            actions: ReminderAction::ALL
                .iter()
                .map(|a| a.identifier().to_string())
                .collect(),
        }
    }
}

/// FFI-safe preferences.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPreferences {
    pub primary_medication_name: String,
    pub primary_default_dose: i32,
    pub secondary_medication_enabled: bool,
    pub secondary_medication_name: String,
    pub secondary_default_dose: i32,
    pub target_inr_min: f64,
    pub target_inr_max: f64,
    pub chart_range_days: u32,
    pub chart_point_spacing: f64,
    pub inr_color: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub target_range_color: String,
    pub reminder_enabled: bool,
    pub reminder_hour: u32,
    pub reminder_minute: u32,
}

impl From<Preferences> for FfiPreferences {
    fn from(p: Preferences) -> Self {
        Self {
            primary_medication_name: p.primary_medication_name,
            primary_default_dose: p.primary_default_dose,
            secondary_medication_enabled: p.secondary_medication_enabled,
            secondary_medication_name: p.secondary_medication_name,
            secondary_default_dose: p.secondary_default_dose,
            target_inr_min: p.target_inr_min,
            target_inr_max: p.target_inr_max,
            chart_range_days: p.chart_range_days,
            chart_point_spacing: p.chart_point_spacing,
            inr_color: p.chart_colors.inr,
            primary_color: p.chart_colors.primary,
            secondary_color: p.chart_colors.secondary,
            target_range_color: p.chart_colors.target_range,
            reminder_enabled: p.reminder_enabled,
            reminder_hour: p.reminder_time.hour(),
            reminder_minute: p.reminder_time.minute(),
        }
    }
}

impl TryFrom<FfiPreferences> for Preferences {
    type Error = MinrError;

    fn try_from(p: FfiPreferences) -> Result<Self, Self::Error> {
        let reminder_time = NaiveTime::from_hms_opt(p.reminder_hour, p.reminder_minute, 0)
            .ok_or_else(|| {
                MinrError::InvalidRecord(format!(
                    "reminder time {}:{}",
                    p.reminder_hour, p.reminder_minute
                ))
            })?;

        Ok(Preferences {
            primary_medication_name: p.primary_medication_name,
            primary_default_dose: p.primary_default_dose,
            secondary_medication_enabled: p.secondary_medication_enabled,
            secondary_medication_name: p.secondary_medication_name,
            secondary_default_dose: p.secondary_default_dose,
            target_inr_min: p.target_inr_min,
            target_inr_max: p.target_inr_max,
            chart_range_days: p.chart_range_days,
            chart_point_spacing: p.chart_point_spacing,
            chart_colors: ChartColors {
                inr: p.inr_color,
                primary: p.primary_color,
                secondary: p.secondary_color,
                target_range: p.target_range_color,
            },
            reminder_enabled: p.reminder_enabled,
            reminder_time,
        })
    }
}
