//! Daily anticoagulant reminder.
//!
//! The core only decides *what* to schedule. Delivery belongs to the host
//! platform behind [`NotificationScheduler`]. Re-arming always clears what
//! was scheduled before, so at most one reminder is ever pending.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::{AntiCoagulantDose, Preferences, Timestamp};
use crate::repository::{EntityStore, RepoResult, Repository};
use crate::views::{compute_reminder_payload, ViewResult};

pub const REMINDER_TITLE: &str = "mINR";
pub const REMINDER_CATEGORY: &str = "anticoagulantReminderCategory";
pub const REMINDER_THREAD: &str = "minr.anticoagulantReminder";

/// A repeating daily notification, ready to hand to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub thread: String,
    /// Local time of day the reminder repeats at
    pub time: NaiveTime,
}

/// Platform notification center.
pub trait NotificationScheduler {
    /// Remove every pending reminder.
    fn cancel_all(&mut self);

    /// Arm a repeating reminder.
    fn schedule(&mut self, request: ReminderRequest);
}

/// Build the reminder for the current preferences, or `None` when disabled.
pub fn build_reminder(
    prefs: &Preferences,
    latest_dose: Option<&AntiCoagulantDose>,
) -> ViewResult<Option<ReminderRequest>> {
    if !prefs.reminder_enabled {
        return Ok(None);
    }

    let payload = compute_reminder_payload(latest_dose)?;
    let body = format!("Take {}. {}", prefs.primary_medication_name, payload);

    Ok(Some(ReminderRequest {
        identifier: uuid::Uuid::new_v4().to_string(),
        title: REMINDER_TITLE.to_string(),
        body: body.trim().to_string(),
        category: REMINDER_CATEGORY.to_string(),
        thread: REMINDER_THREAD.to_string(),
        time: prefs.reminder_time,
    }))
}

/// Replace whatever is pending with the reminder for `prefs`.
///
/// Returns the request that was scheduled, if any.
pub fn rearm<N: NotificationScheduler + ?Sized>(
    scheduler: &mut N,
    prefs: &Preferences,
    latest_dose: Option<&AntiCoagulantDose>,
) -> ViewResult<Option<ReminderRequest>> {
    scheduler.cancel_all();

    let request = build_reminder(prefs, latest_dose)?;
    match &request {
        Some(r) => {
            tracing::info!(body = %r.body, time = %r.time, "Reminder armed");
            scheduler.schedule(r.clone());
        }
        None => tracing::info!("Reminders disabled, pending reminders removed"),
    }
    Ok(request)
}

/// Quick actions offered on the reminder notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderAction {
    RepeatSameDose,
    RepeatOneLess,
    RepeatOneMore,
}

impl ReminderAction {
    pub const ALL: [ReminderAction; 3] = [
        ReminderAction::RepeatOneLess,
        ReminderAction::RepeatSameDose,
        ReminderAction::RepeatOneMore,
    ];

    /// Action identifier registered with the notification category.
    pub fn identifier(&self) -> &'static str {
        match self {
            ReminderAction::RepeatSameDose => "repeatAction",
            ReminderAction::RepeatOneLess => "repeatOneLessAction",
            ReminderAction::RepeatOneMore => "repeatOneMoreAction",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReminderAction::RepeatSameDose => "Repeat Same Dose",
            ReminderAction::RepeatOneLess => "Repeat -1mg",
            ReminderAction::RepeatOneMore => "Repeat +1mg",
        }
    }

    /// Parse an action identifier. Unknown identifiers (e.g. the default
    /// "open app" tap) yield `None`.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.identifier() == identifier)
    }

    /// Dose to log given the latest one; `None` without a prior dose.
    pub fn next_dose(&self, latest: Option<&AntiCoagulantDose>) -> Option<i32> {
        let previous = latest?.dose;
        Some(match self {
            ReminderAction::RepeatSameDose => previous,
            ReminderAction::RepeatOneLess => previous.saturating_sub(1).max(0),
            ReminderAction::RepeatOneMore => previous.saturating_add(1),
        })
    }
}

/// Log the dose a notification action asks for.
///
/// Returns `Ok(None)` when there is no previous dose to repeat.
pub fn log_dose_from_action<S: EntityStore>(
    repo: &mut Repository<S>,
    action: ReminderAction,
    now: Timestamp,
) -> RepoResult<Option<AntiCoagulantDose>> {
    let latest = repo.latest_dose()?;
    let Some(dose) = action.next_dose(latest.as_ref()) else {
        tracing::warn!(action = action.identifier(), "No previous dose to repeat");
        return Ok(None);
    };

    tracing::info!(action = action.identifier(), dose, "Logging dose from reminder");
    repo.add_dose(dose, 0, None, now).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use chrono::DateTime;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[derive(Default)]
    struct RecordingScheduler {
        pending: Vec<ReminderRequest>,
        cancels: usize,
    }

    impl NotificationScheduler for RecordingScheduler {
        fn cancel_all(&mut self) {
            self.cancels += 1;
            self.pending.clear();
        }

        fn schedule(&mut self, request: ReminderRequest) {
            self.pending.push(request);
        }
    }

    fn enabled() -> Preferences {
        Preferences {
            reminder_enabled: true,
            reminder_time: NaiveTime::from_hms_opt(20, 30, 0).unwrap(),
            ..Preferences::default()
        }
    }

    #[test]
    fn test_build_reminder_body() {
        let dose = AntiCoagulantDose::new(5, 0, None, ts("2024-01-01T08:00:00Z"));
        let request = build_reminder(&enabled(), Some(&dose)).unwrap().unwrap();

        assert_eq!(request.title, "mINR");
        assert_eq!(request.body, "Take Warfarin. Your last dose was 5mg.");
        assert_eq!(request.category, REMINDER_CATEGORY);
        assert_eq!(request.thread, REMINDER_THREAD);
        assert_eq!(request.time, NaiveTime::from_hms_opt(20, 30, 0).unwrap());

        let first_run = build_reminder(&enabled(), None).unwrap().unwrap();
        assert_eq!(first_run.body, "Take Warfarin.");
    }

    #[test]
    fn test_disabled_builds_nothing() {
        assert!(build_reminder(&Preferences::default(), None).unwrap().is_none());
    }

    #[test]
    fn test_rearm_replaces_pending() {
        let mut scheduler = RecordingScheduler::default();
        let prefs = enabled();

        rearm(&mut scheduler, &prefs, None).unwrap();
        rearm(&mut scheduler, &prefs, None).unwrap();
        assert_eq!(scheduler.pending.len(), 1);
        assert_eq!(scheduler.cancels, 2);

        let scheduled = rearm(&mut scheduler, &Preferences::default(), None).unwrap();
        assert!(scheduled.is_none());
        assert!(scheduler.pending.is_empty());
    }

    #[test]
    fn test_action_identifiers() {
        for action in ReminderAction::ALL {
            assert_eq!(ReminderAction::from_identifier(action.identifier()), Some(action));
        }
        assert_eq!(
            ReminderAction::from_identifier("com.apple.UNNotificationDefaultActionIdentifier"),
            None
        );
    }

    #[test]
    fn test_next_dose() {
        let zero = AntiCoagulantDose::new(0, 0, None, ts("2024-01-01T08:00:00Z"));
        let four = AntiCoagulantDose::new(4, 0, None, ts("2024-01-01T08:00:00Z"));

        assert_eq!(ReminderAction::RepeatSameDose.next_dose(Some(&four)), Some(4));
        assert_eq!(ReminderAction::RepeatOneLess.next_dose(Some(&four)), Some(3));
        assert_eq!(ReminderAction::RepeatOneMore.next_dose(Some(&four)), Some(5));
        assert_eq!(ReminderAction::RepeatOneLess.next_dose(Some(&zero)), Some(0));
        assert_eq!(ReminderAction::RepeatSameDose.next_dose(None), None);
    }

    #[test]
    fn test_log_dose_from_action() {
        let mut repo = Repository::new(Database::open_in_memory().unwrap()).unwrap();
        let now = ts("2024-01-02T20:30:00Z");

        assert!(log_dose_from_action(&mut repo, ReminderAction::RepeatOneMore, now)
            .unwrap()
            .is_none());

        repo.add_dose(4, 1, Some("evening".into()), ts("2024-01-01T20:30:00Z"))
            .unwrap();
        let logged = log_dose_from_action(&mut repo, ReminderAction::RepeatOneMore, now)
            .unwrap()
            .unwrap();

        assert_eq!(logged.dose, 5);
        assert_eq!(logged.secondary_dose, 0);
        assert_eq!(logged.note_text(), "");
        assert_eq!(repo.latest_dose().unwrap().unwrap().id, logged.id);
    }
}
