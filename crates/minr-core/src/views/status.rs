//! "Days since" summaries for the status widget and the reminder text.

use serde::{Deserialize, Serialize};

use super::{validate_dose, validate_measurement, ViewResult};
use crate::models::{AntiCoagulantDose, InrMeasurement, Timestamp};

/// Latest value of one kind, or an explicit marker that there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus<T> {
    NoData,
    Recorded { value: T, days_since: i64 },
}

impl<T> EntryStatus<T> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, EntryStatus::NoData)
    }

    pub fn days_since(&self) -> Option<i64> {
        match self {
            EntryStatus::NoData => None,
            EntryStatus::Recorded { days_since, .. } => Some(*days_since),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub inr: EntryStatus<f64>,
    pub dose: EntryStatus<i32>,
}

/// Calendar days from `from` to `to`, counted in `to`'s UTC offset.
///
/// 23:50 yesterday to 00:10 today is one day.
pub fn days_between(from: Timestamp, to: Timestamp) -> i64 {
    let from_day = from.with_timezone(to.offset()).date_naive();
    (to.date_naive() - from_day).num_days()
}

/// Summarize the latest measurement and dose relative to `now`.
pub fn compute_status_summary(
    latest_inr: Option<&InrMeasurement>,
    latest_dose: Option<&AntiCoagulantDose>,
    now: Timestamp,
) -> ViewResult<StatusSummary> {
    let inr = match latest_inr {
        Some(m) => {
            validate_measurement(m)?;
            EntryStatus::Recorded {
                value: m.inr,
                days_since: days_between(m.timestamp, now),
            }
        }
        None => EntryStatus::NoData,
    };

    let dose = match latest_dose {
        Some(d) => {
            validate_dose(d)?;
            EntryStatus::Recorded {
                value: d.dose,
                days_since: days_between(d.timestamp, now),
            }
        }
        None => EntryStatus::NoData,
    };

    Ok(StatusSummary { inr, dose })
}

/// Sentence naming the most recent dose, or an empty string without one.
pub fn compute_reminder_payload(latest_dose: Option<&AntiCoagulantDose>) -> ViewResult<String> {
    match latest_dose {
        Some(d) => {
            validate_dose(d)?;
            Ok(format!("Your last dose was {}mg.", d.dose))
        }
        None => Ok(String::new()),
    }
}
