//! Flat export rows.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::models::{EntityKind, Preferences, Records, Timestamp};
use crate::views::{validate_dose, validate_measurement, ViewResult};

/// Header row plus one row of cells per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTable {
    pub kind: EntityKind,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// RFC 4180 CSV, header first, `\n` line endings.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        push_line(&mut csv, &self.headers);
        for row in &self.rows {
            push_line(&mut csv, row);
        }
        csv
    }
}

/// ISO-8601 with the record's own UTC offset, never shortened to `Z`.
pub fn format_timestamp(timestamp: &Timestamp) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Flatten records into export rows, keeping their order.
///
/// Measurements: `Timestamp, INR`. Doses: `Timestamp, <primary>,
/// <secondary>, Note`, with the medication names read from `prefs`.
pub fn compute_export_rows(records: &Records, prefs: &Preferences) -> ViewResult<ExportTable> {
    let table = match records {
        Records::InrMeasurements(measurements) => {
            let rows = measurements
                .iter()
                .map(|m| {
                    validate_measurement(m)?;
                    Ok(vec![format_timestamp(&m.timestamp), m.inr.to_string()])
                })
                .collect::<ViewResult<Vec<_>>>()?;

            ExportTable {
                kind: EntityKind::InrMeasurement,
                headers: vec!["Timestamp".to_string(), "INR".to_string()],
                rows,
            }
        }
        Records::AntiCoagulantDoses(doses) => {
            let rows = doses
                .iter()
                .map(|d| {
                    validate_dose(d)?;
                    Ok(vec![
                        format_timestamp(&d.timestamp),
                        d.dose.to_string(),
                        d.secondary_dose.to_string(),
                        d.note_text().to_string(),
                    ])
                })
                .collect::<ViewResult<Vec<_>>>()?;

            ExportTable {
                kind: EntityKind::AntiCoagulantDose,
                headers: vec![
                    "Timestamp".to_string(),
                    prefs.primary_medication_name.clone(),
                    prefs.secondary_medication_name.clone(),
                    "Note".to_string(),
                ],
                rows,
            }
        }
    };

    tracing::debug!(kind = %table.kind, rows = table.rows.len(), "Computed export rows");
    Ok(table)
}

fn push_line(csv: &mut String, cells: &[String]) {
    let line = cells
        .iter()
        .map(|cell| escape_csv(cell))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(&line);
    csv.push('\n');
}

/// Escape a string for CSV.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AntiCoagulantDose, InrMeasurement};
    use chrono::DateTime;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_measurement_rows() {
        let records = Records::InrMeasurements(vec![
            InrMeasurement::new(3.0, ts("2024-01-03T08:00:00+13:00")),
            InrMeasurement::new(2.5, ts("2024-01-01T08:00:00Z")),
        ]);
        let table = compute_export_rows(&records, &Preferences::default()).unwrap();

        assert_eq!(table.headers, vec!["Timestamp", "INR"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["2024-01-03T08:00:00+13:00".to_string(), "3".to_string()],
                vec!["2024-01-01T08:00:00+00:00".to_string(), "2.5".to_string()],
            ]
        );
    }

    #[test]
    fn test_timestamp_round_trips() {
        let original = ts("2024-01-03T08:15:30.250-05:00");
        let formatted = format_timestamp(&original);
        assert_eq!(formatted, "2024-01-03T08:15:30.250-05:00");
        assert_eq!(DateTime::parse_from_rfc3339(&formatted).unwrap(), original);
    }

    #[test]
    fn test_dose_headers_follow_preferences() {
        let mut prefs = Preferences::default();
        prefs.primary_medication_name = "Coumadin".to_string();

        let records = Records::AntiCoagulantDoses(vec![AntiCoagulantDose::new(
            4,
            1,
            Some("felt fine, \"mostly\"".to_string()),
            ts("2024-01-01T08:00:00Z"),
        )]);
        let table = compute_export_rows(&records, &prefs).unwrap();

        assert_eq!(table.headers, vec!["Timestamp", "Coumadin", "Aspirin", "Note"]);
        assert_eq!(
            table.to_csv(),
            "Timestamp,Coumadin,Aspirin,Note\n\
             2024-01-01T08:00:00+00:00,4,1,\"felt fine, \"\"mostly\"\"\"\n"
        );
    }

    #[test]
    fn test_empty_records_have_header_only() {
        let table =
            compute_export_rows(&Records::AntiCoagulantDoses(vec![]), &Preferences::default()).unwrap();
        assert!(table.rows.is_empty());
        assert_eq!(table.to_csv(), "Timestamp,Warfarin,Aspirin,Note\n");
    }

    #[test]
    fn test_invalid_record_rejected() {
        let records = Records::InrMeasurements(vec![InrMeasurement::new(
            f64::INFINITY,
            ts("2024-01-01T08:00:00Z"),
        )]);
        assert!(compute_export_rows(&records, &Preferences::default()).is_err());
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }
}
