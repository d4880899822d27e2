// file: src/exporter/csv.rs
// description: per-table CSV export with temp-file + rename atomicity
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::models::NormalizedTable;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Writes `<output_dir>/<table-name>.csv`. The header row is always
    /// present, even for a zero-row table. The temp file lives in the
    /// destination directory so the final rename never crosses filesystems.
    pub fn export(&self, table: &NormalizedTable) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.csv", table.name));
        debug!("Writing CSV: {}", path.display());

        let tmp = NamedTempFile::new_in(&self.output_dir).map_err(|source| {
            PipelineError::Export {
                path: path.clone(),
                source,
            }
        })?;

        {
            let mut writer = csv::Writer::from_writer(tmp.as_file());
            writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
            for row in &table.rows {
                writer.write_record(row.iter().map(|cell| cell.to_field()))?;
            }
            writer.flush()?;
        }

        tmp.persist(&path).map_err(|e| PipelineError::Export {
            path: path.clone(),
            source: e.error,
        })?;

        Ok(path)
    }
}
