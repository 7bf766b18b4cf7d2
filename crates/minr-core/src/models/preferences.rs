//! User preferences consumed by the derived-view calculators.

use std::path::Path;
use std::sync::{Arc, RwLock};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preferences load/save errors.
#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Chart colors as `#RRGGBB` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartColors {
    pub inr: String,
    pub primary: String,
    pub secondary: String,
    pub target_range: String,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            inr: "#FF3B30".into(),
            primary: "#007AFF".into(),
            secondary: "#AF52DE".into(),
            target_range: "#34C759".into(),
        }
    }
}

/// Everything the user can configure that affects derived views.
///
/// Missing keys in a stored file fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub primary_medication_name: String,
    /// Pre-filled amount on the add-dose form (mg)
    pub primary_default_dose: i32,
    pub secondary_medication_enabled: bool,
    pub secondary_medication_name: String,
    pub secondary_default_dose: i32,
    /// Lower edge of the INR target band
    pub target_inr_min: f64,
    /// Upper edge of the INR target band
    pub target_inr_max: f64,
    /// Days shown on the chart
    pub chart_range_days: u32,
    /// Horizontal spacing per chart day, in points
    pub chart_point_spacing: f64,
    pub chart_colors: ChartColors,
    pub reminder_enabled: bool,
    pub reminder_time: NaiveTime,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            primary_medication_name: "Warfarin".into(),
            primary_default_dose: 4,
            secondary_medication_enabled: false,
            secondary_medication_name: "Aspirin".into(),
            secondary_default_dose: 2,
            target_inr_min: 2.5,
            target_inr_max: 3.5,
            chart_range_days: 14,
            chart_point_spacing: 25.0,
            chart_colors: ChartColors::default(),
            reminder_enabled: false,
            reminder_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
        }
    }
}

impl Preferences {
    /// Read preferences from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PreferencesError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write preferences to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Live preferences handle shared by every consumer.
///
/// Readers call [`SharedPreferences::current`] for each computation and
/// never keep the result around.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences {
    inner: Arc<RwLock<Preferences>>,
}

impl SharedPreferences {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            inner: Arc::new(RwLock::new(prefs)),
        }
    }

    /// Load from `path`, or start from defaults when the file does not exist yet.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, PreferencesError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No preferences file, using defaults");
            return Ok(Self::default());
        }
        Ok(Self::new(Preferences::load(path)?))
    }

    /// Copy of the values as of now.
    pub fn current(&self) -> Preferences {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Mutate the live values in place.
    pub fn update<F: FnOnce(&mut Preferences)>(&self, f: F) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }

    /// Persist the current values.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PreferencesError> {
        self.current().save(path)
    }
}
