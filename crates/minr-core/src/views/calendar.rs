//! Compliance calendar decorations.

use std::collections::BTreeSet;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{AntiCoagulantDose, Timestamp};

/// What a calendar cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DayDecoration {
    /// After today, nothing to show
    Future,
    /// A dose was logged that day (the latest one if several)
    Taken { dose: i32 },
    /// No dose logged
    Missed,
}

/// Decoration for `day`, with days evaluated in `today`'s UTC offset.
pub fn day_decoration(doses: &[AntiCoagulantDose], day: NaiveDate, today: Timestamp) -> DayDecoration {
    let offset = *today.offset();
    if day > today.date_naive() {
        return DayDecoration::Future;
    }

    doses
        .iter()
        .filter(|d| d.timestamp.with_timezone(&offset).date_naive() == day)
        .max_by_key(|d| d.timestamp)
        .map_or(DayDecoration::Missed, |d| DayDecoration::Taken { dose: d.dose })
}

/// Distinct calendar dates touched by a drained change log, in date order.
pub fn changed_days(changes: &[Timestamp], offset: FixedOffset) -> Vec<NaiveDate> {
    changes
        .iter()
        .map(|t| t.with_timezone(&offset).date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
