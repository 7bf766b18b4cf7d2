//! Anticoagulant dose model.

use chrono::SubsecRound;
use serde::{Deserialize, Serialize};

use super::Timestamp;

/// A logged anticoagulant dose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AntiCoagulantDose {
    /// Local UUID, assigned at creation
    pub id: String,
    /// Primary medication amount in mg
    pub dose: i32,
    /// Secondary medication amount in mg (only meaningful when enabled)
    pub secondary_dose: i32,
    /// Free-text annotation
    pub note: Option<String>,
    /// When the dose was taken
    pub timestamp: Timestamp,
}

impl AntiCoagulantDose {
    /// Create a new dose with a fresh identifier.
    pub fn new(dose: i32, secondary_dose: i32, note: Option<String>, timestamp: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            dose,
            secondary_dose,
            note,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Replace every mutable field, keeping the identifier.
    pub fn apply(&mut self, fields: &DoseFields) {
        self.dose = fields.dose;
        self.secondary_dose = fields.secondary_dose;
        self.note = fields.note.clone();
        self.timestamp = fields.timestamp.trunc_subsecs(3);
    }

    /// Note text, empty when none was entered.
    pub fn note_text(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}

/// The user-editable fields of a dose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseFields {
    pub dose: i32,
    #[serde(default)]
    pub secondary_dose: i32,
    pub note: Option<String>,
    pub timestamp: Timestamp,
}

impl From<&AntiCoagulantDose> for DoseFields {
    fn from(d: &AntiCoagulantDose) -> Self {
        Self {
            dose: d.dose,
            secondary_dose: d.secondary_dose,
            note: d.note.clone(),
            timestamp: d.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_new_dose() {
        let ts = DateTime::parse_from_rfc3339("2024-01-01T08:00:00Z").unwrap();
        let d = AntiCoagulantDose::new(4, 0, None, ts);
        assert_eq!(d.id.len(), 36);
        assert_eq!(d.dose, 4);
        assert_eq!(d.secondary_dose, 0);
        assert_eq!(d.note_text(), "");
    }

    #[test]
    fn test_secondary_dose_defaults_to_zero() {
        let json = r#"{"dose":3,"note":null,"timestamp":"2024-01-01T08:00:00+00:00"}"#;
        let fields: DoseFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.secondary_dose, 0);
    }
}
