// file: src/models/manifest.rs
// description: run reporting structures, in-memory only

use crate::exporter::ExportFormat;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub table_id: String,
    pub path: PathBuf,
    pub format: ExportFormat,
}

/// Everything actually written during a run. Used for end-of-run reporting,
/// never persisted.
#[derive(Debug, Clone, Default)]
pub struct ExportManifest {
    pub entries: Vec<ManifestEntry>,
}

impl ExportManifest {
    pub fn record(&mut self, table_id: &str, path: PathBuf, format: ExportFormat) {
        self.entries.push(ManifestEntry {
            table_id: table_id.to_string(),
            path,
            format,
        });
    }

    pub fn paths(&self) -> Vec<&PathBuf> {
        self.entries.iter().map(|e| &e.path).collect()
    }
}

#[derive(Debug, Clone)]
pub struct FailedTable {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedTable>,
    pub manifest: ExportManifest,
    pub workbook_error: Option<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, id: &str, reason: String) {
        self.failed.push(FailedTable {
            id: id.to_string(),
            reason,
        });
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty() || self.workbook_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report_has_no_failures() {
        let mut report = RunReport::new();
        report.succeeded.push("squads_standard".to_string());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_failed_table_flags_report() {
        let mut report = RunReport::new();
        report.record_failure("keepers", "no table markup".to_string());
        assert!(report.has_failures());
        assert_eq!(report.failed[0].id, "keepers");
    }

    #[test]
    fn test_workbook_error_flags_report() {
        let mut report = RunReport::new();
        report.workbook_error = Some("disk full".to_string());
        assert!(report.has_failures());
    }

    #[test]
    fn test_manifest_records_paths() {
        let mut manifest = ExportManifest::default();
        manifest.record(
            "squads_standard",
            PathBuf::from("data/raw/squads_standard.csv"),
            ExportFormat::Csv,
        );
        assert_eq!(manifest.entries.len(), 1);
        assert_eq!(manifest.paths().len(), 1);
    }
}
