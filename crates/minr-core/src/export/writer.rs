//! File output for CSV exports.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{compute_export_rows, ExportResult};
use crate::models::{EntityKind, Preferences};
use crate::repository::{EntityStore, Repository};

pub const INR_EXPORT_FILE: &str = "INR_Data_Export.csv";
pub const DOSE_EXPORT_FILE: &str = "Anticoagulant_Data_Export.csv";

/// Where [`write_csv_exports`] put each file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPaths {
    pub inr: PathBuf,
    pub anticoagulant: PathBuf,
}

/// Write both CSV files into `dir` from the current snapshots.
///
/// Rows are computed for both kinds before anything is written.
pub fn write_csv_exports<S: EntityStore, P: AsRef<Path>>(
    dir: P,
    repo: &Repository<S>,
    prefs: &Preferences,
) -> ExportResult<ExportPaths> {
    let dir = dir.as_ref();
    let inr = compute_export_rows(&repo.snapshot(EntityKind::InrMeasurement), prefs)?;
    let doses = compute_export_rows(&repo.snapshot(EntityKind::AntiCoagulantDose), prefs)?;

    let paths = ExportPaths {
        inr: dir.join(INR_EXPORT_FILE),
        anticoagulant: dir.join(DOSE_EXPORT_FILE),
    };

    write_file(&paths.inr, &inr.to_csv())?;
    write_file(&paths.anticoagulant, &doses.to_csv())?;

    tracing::info!(
        measurements = inr.rows.len(),
        doses = doses.rows.len(),
        dir = %dir.display(),
        "Exported CSV files"
    );
    Ok(paths)
}

fn write_file(path: &Path, contents: &str) -> ExportResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        tracing::error!(error = %e, path = %path.display(), "Failed to write export");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::export::ExportError;
    use chrono::DateTime;

    #[test]
    fn test_write_both_files() {
        let mut repo = Repository::new(Database::open_in_memory().unwrap()).unwrap();
        let at = DateTime::parse_from_rfc3339("2024-01-01T08:00:00Z").unwrap();
        repo.add_measurement(2.7, at).unwrap();
        repo.add_dose(4, 0, None, at).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let paths = write_csv_exports(dir.path(), &repo, &Preferences::default()).unwrap();

        assert!(paths.inr.ends_with(INR_EXPORT_FILE));
        let inr = std::fs::read_to_string(&paths.inr).unwrap();
        assert_eq!(inr, "Timestamp,INR\n2024-01-01T08:00:00+00:00,2.7\n");

        let doses = std::fs::read_to_string(&paths.anticoagulant).unwrap();
        assert_eq!(
            doses,
            "Timestamp,Warfarin,Aspirin,Note\n2024-01-01T08:00:00+00:00,4,0,\n"
        );
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let repo = Repository::new(Database::open_in_memory().unwrap()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = write_csv_exports(&missing, &repo, &Preferences::default());
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
