//! Chart scaling and series normalization.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{validate_dose, validate_measurement, ViewError, ViewResult};
use crate::models::{AntiCoagulantDose, InrMeasurement, Preferences, Timestamp};

/// INR axis maximum when there are no measurements in range.
pub const DEFAULT_INR_AXIS_MAX: f64 = 5.0;

/// Dose axis maximum when there are no doses in range.
pub const DEFAULT_DOSE_AXIS_MAX: i32 = 6;

/// Chart series, resolved to a label only when displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Series {
    Inr,
    Primary,
    Secondary,
    Range,
}

impl Series {
    /// Display label under the current medication names.
    pub fn label(&self, prefs: &Preferences) -> String {
        match self {
            Series::Inr => "INR".to_string(),
            Series::Primary => prefs.primary_medication_name.clone(),
            Series::Secondary => prefs.secondary_medication_name.clone(),
            Series::Range => "INR Range".to_string(),
        }
    }

    /// Configured color.
    pub fn color<'a>(&self, prefs: &'a Preferences) -> &'a str {
        match self {
            Series::Inr => &prefs.chart_colors.inr,
            Series::Primary => &prefs.chart_colors.primary,
            Series::Secondary => &prefs.chart_colors.secondary,
            Series::Range => &prefs.chart_colors.target_range,
        }
    }
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: Timestamp,
    /// Value in its own unit (INR or mg)
    pub value: f64,
    /// `value / axis maximum`
    pub normalized: f64,
}

/// INR target band on the normalized scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBand {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub series: Series,
    pub color: String,
}

/// Everything the chart view needs, all series oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub inr_axis_max: f64,
    pub dose_axis_max: i32,
    pub inr: Vec<ChartPoint>,
    pub primary: Vec<ChartPoint>,
    /// Present only while the secondary medication is enabled
    pub secondary: Option<Vec<ChartPoint>>,
    pub target_band: TargetBand,
    pub legend: Vec<LegendEntry>,
    /// `chart_point_spacing * chart_range_days`
    pub plot_width: f64,
}

/// Date range the chart covers: `range_days` back from `now` to one day ahead.
///
/// Fails when either end falls outside the representable date range.
pub fn chart_window(now: Timestamp, prefs: &Preferences) -> ViewResult<(Timestamp, Timestamp)> {
    let out_of_range = || {
        ViewError::invalid_preference(
            "chart_range_days",
            format!("{} days before {} is out of range", prefs.chart_range_days, now),
        )
    };
    let start = now
        .checked_sub_signed(Duration::days(i64::from(prefs.chart_range_days)))
        .ok_or_else(out_of_range)?;
    let end = now
        .checked_add_signed(Duration::days(1))
        .ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// `ceil(max + 1)`, or [`DEFAULT_INR_AXIS_MAX`] without measurements.
pub fn inr_axis_max(measurements: &[InrMeasurement]) -> f64 {
    measurements
        .iter()
        .map(|m| m.inr)
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
        .map_or(DEFAULT_INR_AXIS_MAX, |max| (max + 1.0).ceil())
}

/// `max + 2` for an even maximum, `max + 3` for an odd one,
/// [`DEFAULT_DOSE_AXIS_MAX`] without doses.
pub fn dose_axis_max(max_dose: Option<i32>) -> i32 {
    match max_dose {
        Some(max) if max % 2 == 0 => max + 2,
        Some(max) => max + 3,
        None => DEFAULT_DOSE_AXIS_MAX,
    }
}

/// Build the normalized chart series.
///
/// The dose axis covers the secondary medication too while it is enabled,
/// so both dose lines share one scale.
pub fn compute_chart_series(
    measurements: &[InrMeasurement],
    doses: &[AntiCoagulantDose],
    prefs: &Preferences,
) -> ViewResult<ChartSeries> {
    for m in measurements {
        validate_measurement(m)?;
    }
    for d in doses {
        validate_dose(d)?;
    }

    let secondary_enabled = prefs.secondary_medication_enabled;
    let inr_max = inr_axis_max(measurements);
    let max_dose = doses
        .iter()
        .map(|d| {
            if secondary_enabled {
                d.dose.max(d.secondary_dose)
            } else {
                d.dose
            }
        })
        .max();
    let dose_max = dose_axis_max(max_dose);

    let inr = normalize(measurements.iter().map(|m| (m.timestamp, m.inr)), inr_max);
    let primary = normalize(
        doses.iter().map(|d| (d.timestamp, f64::from(d.dose))),
        f64::from(dose_max),
    );
    let secondary = secondary_enabled.then(|| {
        normalize(
            doses.iter().map(|d| (d.timestamp, f64::from(d.secondary_dose))),
            f64::from(dose_max),
        )
    });

    let mut series = vec![Series::Inr, Series::Primary];
    if secondary_enabled {
        series.push(Series::Secondary);
    }
    series.push(Series::Range);
    let legend = series
        .into_iter()
        .map(|series| LegendEntry {
            series,
            color: series.color(prefs).to_string(),
        })
        .collect();

    Ok(ChartSeries {
        inr_axis_max: inr_max,
        dose_axis_max: dose_max,
        inr,
        primary,
        secondary,
        target_band: TargetBand {
            lower: prefs.target_inr_min / inr_max,
            upper: prefs.target_inr_max / inr_max,
        },
        legend,
        plot_width: prefs.chart_point_spacing * f64::from(prefs.chart_range_days),
    })
}

fn normalize(values: impl Iterator<Item = (Timestamp, f64)>, axis_max: f64) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = values
        .map(|(timestamp, value)| ChartPoint {
            timestamp,
            value,
            normalized: value / axis_max,
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_inr_axis_max() {
        let ms = vec![
            InrMeasurement::new(3.2, ts("2024-01-01T08:00:00Z")),
            InrMeasurement::new(2.0, ts("2024-01-02T08:00:00Z")),
        ];
        assert_eq!(inr_axis_max(&ms), 5.0);
        assert_eq!(inr_axis_max(&[]), DEFAULT_INR_AXIS_MAX);

        let whole = vec![InrMeasurement::new(3.0, ts("2024-01-01T08:00:00Z"))];
        assert_eq!(inr_axis_max(&whole), 4.0);
    }

    #[test]
    fn test_dose_axis_max() {
        assert_eq!(dose_axis_max(Some(4)), 6);
        assert_eq!(dose_axis_max(Some(5)), 8);
        assert_eq!(dose_axis_max(Some(0)), 2);
        assert_eq!(dose_axis_max(None), DEFAULT_DOSE_AXIS_MAX);
    }

    #[test]
    fn test_chart_window() {
        let prefs = Preferences::default();
        let now = ts("2024-01-15T12:00:00+13:00");
        let (start, end) = chart_window(now, &prefs).unwrap();
        assert_eq!(start, ts("2024-01-01T12:00:00+13:00"));
        assert_eq!(end, ts("2024-01-16T12:00:00+13:00"));
    }

    #[test]
    fn test_chart_window_out_of_range_is_error() {
        let prefs = Preferences {
            chart_range_days: u32::MAX,
            ..Preferences::default()
        };
        let result = chart_window(ts("2024-01-15T12:00:00Z"), &prefs);
        assert!(matches!(
            result,
            Err(ViewError::InvalidPreference { name, .. }) if name == "chart_range_days"
        ));
    }

    #[test]
    fn test_points_are_oldest_first() {
        let ms = vec![
            InrMeasurement::new(2.0, ts("2024-01-02T08:00:00Z")),
            InrMeasurement::new(3.0, ts("2024-01-01T08:00:00Z")),
        ];
        let chart = compute_chart_series(&ms, &[], &Preferences::default()).unwrap();
        assert_eq!(chart.inr[0].value, 3.0);
        assert_eq!(chart.inr[0].normalized, 0.75);
        assert_eq!(chart.inr[1].normalized, 0.5);
    }

    #[test]
    fn test_series_labels_follow_preferences() {
        let mut prefs = Preferences::default();
        prefs.primary_medication_name = "Coumadin".into();
        assert_eq!(Series::Primary.label(&prefs), "Coumadin");
        assert_eq!(Series::Range.label(&prefs), "INR Range");
        assert_eq!(Series::Inr.color(&prefs), "#FF3B30");
    }
}
