//! INR measurement model.

use chrono::SubsecRound;
use serde::{Deserialize, Serialize};

use super::Timestamp;

/// A single INR lab result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InrMeasurement {
    /// Local UUID, assigned at creation
    pub id: String,
    /// INR value (the app limits entry to 0-30, the store does not)
    pub inr: f64,
    /// When the blood was drawn
    pub timestamp: Timestamp,
}

impl InrMeasurement {
    /// Create a new measurement with a fresh identifier.
    ///
    /// The timestamp is truncated to millisecond precision so the record
    /// compares equal to what the store hands back.
    pub fn new(inr: f64, timestamp: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            inr,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Replace every mutable field, keeping the identifier.
    pub fn apply(&mut self, fields: &MeasurementFields) {
        self.inr = fields.inr;
        self.timestamp = fields.timestamp.trunc_subsecs(3);
    }
}

/// The user-editable fields of a measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementFields {
    pub inr: f64,
    pub timestamp: Timestamp,
}

impl From<&InrMeasurement> for MeasurementFields {
    fn from(m: &InrMeasurement) -> Self {
        Self {
            inr: m.inr,
            timestamp: m.timestamp,
        }
    }
}
