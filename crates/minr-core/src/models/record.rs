//! Entity kinds, queryable fields and kind-tagged record wrappers.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{AntiCoagulantDose, InrMeasurement};

/// Point in time with the UTC offset it was recorded in.
pub type Timestamp = DateTime<FixedOffset>;

/// The two kinds of record the repository owns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    InrMeasurement,
    AntiCoagulantDose,
}

impl EntityKind {
    /// Table backing this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::InrMeasurement => "inr_measurements",
            EntityKind::AntiCoagulantDose => "anticoagulant_doses",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::InrMeasurement => f.write_str("INR measurement"),
            EntityKind::AntiCoagulantDose => f.write_str("anticoagulant dose"),
        }
    }
}

/// Numeric fields that can be ranked by `max_in_range`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Inr,
    Dose,
    SecondaryDose,
}

impl Field {
    /// The entity kind this field belongs to.
    pub fn kind(&self) -> EntityKind {
        match self {
            Field::Inr => EntityKind::InrMeasurement,
            Field::Dose | Field::SecondaryDose => EntityKind::AntiCoagulantDose,
        }
    }

    /// Column holding this field.
    pub fn column(&self) -> &'static str {
        match self {
            Field::Inr => "inr",
            Field::Dose => "dose",
            Field::SecondaryDose => "secondary_dose",
        }
    }
}

/// Dose fields, the only ones that can be summed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DoseField {
    Primary,
    Secondary,
}

impl From<DoseField> for Field {
    fn from(field: DoseField) -> Self {
        match field {
            DoseField::Primary => Field::Dose,
            DoseField::Secondary => Field::SecondaryDose,
        }
    }
}

/// A single record of either kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    InrMeasurement(InrMeasurement),
    AntiCoagulantDose(AntiCoagulantDose),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::InrMeasurement(_) => EntityKind::InrMeasurement,
            Record::AntiCoagulantDose(_) => EntityKind::AntiCoagulantDose,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::InrMeasurement(m) => &m.id,
            Record::AntiCoagulantDose(d) => &d.id,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Record::InrMeasurement(m) => m.timestamp,
            Record::AntiCoagulantDose(d) => d.timestamp,
        }
    }

    pub fn as_measurement(&self) -> Option<&InrMeasurement> {
        match self {
            Record::InrMeasurement(m) => Some(m),
            Record::AntiCoagulantDose(_) => None,
        }
    }

    pub fn as_dose(&self) -> Option<&AntiCoagulantDose> {
        match self {
            Record::AntiCoagulantDose(d) => Some(d),
            Record::InrMeasurement(_) => None,
        }
    }
}

/// Replacement values for `create`/`update`, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordFields {
    InrMeasurement(super::MeasurementFields),
    AntiCoagulantDose(super::DoseFields),
}

/// A homogeneous set of records, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum Records {
    InrMeasurements(Vec<InrMeasurement>),
    AntiCoagulantDoses(Vec<AntiCoagulantDose>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Records::InrMeasurements(v) => v.len(),
            Records::AntiCoagulantDoses(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
