//! Derived-view calculators.
//!
//! Pure functions from query results and the current [`Preferences`] to
//! display-ready values. Nothing here touches the store, and nothing is
//! cached between calls: callers pass `SharedPreferences::current()` each time.
//!
//! [`Preferences`]: crate::models::Preferences

mod calendar;
mod chart;
mod status;

pub use calendar::*;
pub use chart::*;
pub use status::*;

use thiserror::Error;

use crate::models::{AntiCoagulantDose, InrMeasurement};

/// Calculator errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Invalid preference {name}: {reason}")]
    InvalidPreference { name: String, reason: String },
}

pub type ViewResult<T> = Result<T, ViewError>;

impl ViewError {
    pub fn invalid(id: &str, reason: impl Into<String>) -> Self {
        ViewError::InvalidRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_preference(name: &str, reason: impl Into<String>) -> Self {
        ViewError::InvalidPreference {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reject measurements the calculators cannot place on a chart.
pub fn validate_measurement(measurement: &InrMeasurement) -> ViewResult<()> {
    if measurement.id.is_empty() {
        return Err(ViewError::invalid("<empty>", "missing identifier"));
    }
    if !measurement.inr.is_finite() {
        return Err(ViewError::invalid(
            &measurement.id,
            format!("INR is not a finite number: {}", measurement.inr),
        ));
    }
    Ok(())
}

/// Reject doses with missing identifiers or negative amounts.
pub fn validate_dose(dose: &AntiCoagulantDose) -> ViewResult<()> {
    if dose.id.is_empty() {
        return Err(ViewError::invalid("<empty>", "missing identifier"));
    }
    if dose.dose < 0 || dose.secondary_dose < 0 {
        return Err(ViewError::invalid(
            &dose.id,
            format!("negative dose: {}/{}", dose.dose, dose.secondary_dose),
        ));
    }
    Ok(())
}
