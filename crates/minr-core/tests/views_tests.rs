//! Derived-view integration tests, fed from a real repository.

use chrono::{DateTime, NaiveDate};

use minr_core::db::Database;
use minr_core::export::{compute_export_rows, write_csv_exports};
use minr_core::models::{EntityKind, Preferences, SharedPreferences, Timestamp};
use minr_core::reminder::{rearm, NotificationScheduler, ReminderRequest};
use minr_core::repository::Repository;
use minr_core::views::{
    chart_window, changed_days, compute_chart_series, compute_status_summary, day_decoration,
    DayDecoration, EntryStatus, Series,
};

fn ts(s: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn repo() -> Repository<Database> {
    Repository::new(Database::open_in_memory().unwrap()).unwrap()
}

#[test]
fn test_chart_from_window_query() {
    let mut repo = repo();
    let now = ts("2024-01-15T12:00:00Z");
    repo.add_measurement(3.2, ts("2024-01-10T08:00:00Z")).unwrap();
    repo.add_measurement(2.1, ts("2024-01-12T08:00:00Z")).unwrap();
    // Outside the default 14 day window
    repo.add_measurement(6.5, ts("2023-12-01T08:00:00Z")).unwrap();
    repo.add_dose(5, 0, None, ts("2024-01-12T20:00:00Z")).unwrap();

    let prefs = Preferences::default();
    let (start, end) = chart_window(now, &prefs).unwrap();
    let inr = repo.measurements_between(start, end).unwrap();
    let doses = repo.doses_between(start, end).unwrap();
    let chart = compute_chart_series(&inr, &doses, &prefs).unwrap();

    assert_eq!(chart.inr_axis_max, 5.0);
    assert_eq!(chart.dose_axis_max, 8);
    assert_eq!(chart.inr.len(), 2);
    assert_eq!(chart.inr[0].timestamp, ts("2024-01-10T08:00:00Z"));
    assert!((chart.inr[0].normalized - 0.64).abs() < 1e-9);
    assert!((chart.primary[0].normalized - 0.625).abs() < 1e-9);
    assert!(chart.secondary.is_none());
    assert_eq!(chart.target_band.lower, 0.5);
    assert_eq!(chart.target_band.upper, 0.7);
    assert_eq!(chart.plot_width, 350.0);
}

#[test]
fn test_chart_defaults_on_empty_input() {
    let chart = compute_chart_series(&[], &[], &Preferences::default()).unwrap();
    assert_eq!(chart.inr_axis_max, 5.0);
    assert_eq!(chart.dose_axis_max, 6);
    assert!(chart.inr.is_empty());
    assert!(chart.primary.is_empty());
}

#[test]
fn test_even_dose_axis() {
    let mut repo = repo();
    repo.add_dose(4, 0, None, ts("2024-01-12T20:00:00Z")).unwrap();
    let chart =
        compute_chart_series(&[], repo.anticoagulant_doses(), &Preferences::default()).unwrap();
    assert_eq!(chart.dose_axis_max, 6);
}

#[test]
fn test_labels_follow_live_preferences() {
    let shared = SharedPreferences::default();
    let mut repo = repo();
    repo.add_dose(4, 7, None, ts("2024-01-12T20:00:00Z")).unwrap();

    let before = compute_chart_series(&[], repo.anticoagulant_doses(), &shared.current()).unwrap();
    assert_eq!(before.dose_axis_max, 6);

    shared.update(|p| {
        p.primary_medication_name = "Coumadin".into();
        p.secondary_medication_enabled = true;
    });
    let prefs = shared.current();
    let after = compute_chart_series(&[], repo.anticoagulant_doses(), &prefs).unwrap();

    assert_eq!(after.dose_axis_max, 10);
    let labels: Vec<String> = after.legend.iter().map(|e| e.series.label(&prefs)).collect();
    assert_eq!(labels, vec!["INR", "Coumadin", "Aspirin", "INR Range"]);
    assert_eq!(after.legend[2].series, Series::Secondary);
    assert_eq!(after.legend[2].color, prefs.chart_colors.secondary);
}

#[test]
fn test_status_from_repository() {
    let mut repo = repo();
    let now = ts("2024-01-02T00:10:00Z");

    let empty = compute_status_summary(None, None, now).unwrap();
    assert_eq!(empty.inr, EntryStatus::NoData);

    repo.add_dose(4, 0, None, ts("2024-01-01T23:50:00Z")).unwrap();
    let latest = repo.latest_dose().unwrap();
    let summary = compute_status_summary(None, latest.as_ref(), now).unwrap();

    assert_eq!(summary.inr, EntryStatus::NoData);
    assert_eq!(summary.dose.days_since(), Some(1));
}

#[test]
fn test_calendar_redraws_changed_days() {
    let mut repo = repo();
    let log = repo.subscribe_changes();
    let dose = repo.add_dose(4, 0, None, ts("2024-01-01T20:00:00Z")).unwrap();
    repo.update_dose(
        &dose.id,
        &minr_core::models::DoseFields {
            dose: 3,
            secondary_dose: 0,
            note: None,
            timestamp: ts("2024-01-03T20:00:00Z"),
        },
    )
    .unwrap();

    let utc = *ts("2024-01-04T00:00:00Z").offset();
    let days = changed_days(&log.drain(), utc);
    let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    assert_eq!(days, vec![jan(1), jan(3)]);

    let today = ts("2024-01-04T09:00:00Z");
    let doses = repo.anticoagulant_doses();
    assert_eq!(day_decoration(doses, jan(1), today), DayDecoration::Missed);
    assert_eq!(day_decoration(doses, jan(3), today), DayDecoration::Taken { dose: 3 });
    assert_eq!(day_decoration(doses, jan(5), today), DayDecoration::Future);
}

#[test]
fn test_export_uses_current_names() {
    let mut repo = repo();
    repo.add_dose(4, 1, Some("missed lunch".into()), ts("2024-01-01T08:00:00-05:00"))
        .unwrap();

    let shared = SharedPreferences::default();
    shared.update(|p| p.secondary_medication_name = "Clopidogrel".into());

    let table =
        compute_export_rows(&repo.snapshot(EntityKind::AntiCoagulantDose), &shared.current())
            .unwrap();
    assert_eq!(table.headers, vec!["Timestamp", "Warfarin", "Clopidogrel", "Note"]);
    assert_eq!(
        table.rows[0],
        vec!["2024-01-01T08:00:00-05:00", "4", "1", "missed lunch"]
    );

    let dir = tempfile::tempdir().unwrap();
    let paths = write_csv_exports(dir.path(), &repo, &shared.current()).unwrap();
    let csv = std::fs::read_to_string(paths.anticoagulant).unwrap();
    assert!(csv.starts_with("Timestamp,Warfarin,Clopidogrel,Note\n"));
}

#[derive(Default)]
struct FakeScheduler {
    pending: Vec<ReminderRequest>,
}

impl NotificationScheduler for FakeScheduler {
    fn cancel_all(&mut self) {
        self.pending.clear();
    }

    fn schedule(&mut self, request: ReminderRequest) {
        self.pending.push(request);
    }
}

#[test]
fn test_reminder_rearm_after_new_dose() {
    let mut repo = repo();
    let shared = SharedPreferences::default();
    shared.update(|p| p.reminder_enabled = true);
    let mut scheduler = FakeScheduler::default();

    rearm(&mut scheduler, &shared.current(), repo.latest_dose().unwrap().as_ref()).unwrap();
    assert_eq!(scheduler.pending[0].body, "Take Warfarin.");

    repo.add_dose(6, 0, None, ts("2024-01-01T08:00:00Z")).unwrap();
    rearm(&mut scheduler, &shared.current(), repo.latest_dose().unwrap().as_ref()).unwrap();
    assert_eq!(scheduler.pending.len(), 1);
    assert_eq!(scheduler.pending[0].body, "Take Warfarin. Your last dose was 6mg.");
}
