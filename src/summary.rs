// file: src/summary.rs
// description: scans exported per-table CSVs and writes a summary CSV

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

pub const SUMMARY_FILE: &str = "table_summary.csv";
const SAMPLE_HEADER_COUNT: usize = 8;

#[derive(Debug, Clone)]
struct SummaryRow {
    table_name: String,
    file_name: String,
    rows: String,
    cols: String,
    sample_headers: String,
}

/// Writes `<dir>/table_summary.csv` describing every exported CSV in the
/// directory: data-row count, column count, and the first eight headers.
/// A file that cannot be read becomes an error row instead of aborting.
pub fn summarize_dir(dir: &Path) -> Result<PathBuf> {
    Validator::validate_directory(dir)?;

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("csv"))
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(SUMMARY_FILE))
        .collect();
    files.sort();

    if files.is_empty() {
        warn!("No exported CSV files found in {}", dir.display());
    }

    let mut summary_rows = Vec::with_capacity(files.len());
    for path in &files {
        let table_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match summarize_file(path) {
            Ok((rows, cols, sample_headers)) => summary_rows.push(SummaryRow {
                table_name,
                file_name,
                rows: rows.to_string(),
                cols: cols.to_string(),
                sample_headers,
            }),
            Err(e) => {
                warn!("Could not summarize {}: {}", path.display(), e);
                summary_rows.push(SummaryRow {
                    table_name,
                    file_name,
                    rows: "error".to_string(),
                    cols: "error".to_string(),
                    sample_headers: format!("error: {}", e),
                });
            }
        }
    }

    let out_path = dir.join(SUMMARY_FILE);
    let tmp = NamedTempFile::new_in(dir).map_err(|source| PipelineError::Export {
        path: out_path.clone(),
        source,
    })?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());
        writer.write_record(["table_name", "file_name", "rows", "cols", "sample_headers"])?;
        for row in &summary_rows {
            writer.write_record([
                row.table_name.as_str(),
                row.file_name.as_str(),
                row.rows.as_str(),
                row.cols.as_str(),
                row.sample_headers.as_str(),
            ])?;
        }
        writer.flush()?;
    }

    tmp.persist(&out_path).map_err(|e| PipelineError::Export {
        path: out_path.clone(),
        source: e.error,
    })?;

    info!("Wrote summary: {}", out_path.display());
    Ok(out_path)
}

fn summarize_file(path: &Path) -> Result<(usize, usize, String)> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut data_rows = 0usize;
    for record in reader.records() {
        record?;
        data_rows += 1;
    }

    let sample = headers
        .iter()
        .take(SAMPLE_HEADER_COUNT)
        .collect::<Vec<_>>()
        .join(";");

    Ok((data_rows, headers.len(), sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_summary_counts_rows_and_columns() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("squads_standard.csv"),
            "squad,gls,ast\nArsenal,91,66\nChelsea,77,55\n",
        )
        .unwrap();

        let out = summarize_dir(dir.path()).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();

        assert_eq!(
            content,
            "table_name,file_name,rows,cols,sample_headers\n\
             squads_standard,squads_standard.csv,2,3,squad;gls;ast\n"
        );
    }

    #[test]
    fn test_summary_skips_itself_on_rerun() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("keepers.csv"), "squad,saves\nArsenal,120\n").unwrap();

        summarize_dir(dir.path()).unwrap();
        let out = summarize_dir(dir.path()).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();

        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("table_summary,"));
    }

    #[test]
    fn test_sample_headers_capped_at_eight() {
        let dir = tempdir().unwrap();
        let headers: Vec<String> = (0..12).map(|i| format!("c{}", i)).collect();
        std::fs::write(
            dir.path().join("wide.csv"),
            format!("{}\n", headers.join(",")),
        )
        .unwrap();

        let out = summarize_dir(dir.path()).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        let sample = content.lines().nth(1).unwrap().split(',').nth(4).unwrap();

        assert_eq!(sample.split(';').count(), 8);
    }

    #[test]
    fn test_unreadable_file_becomes_error_row() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("good.csv"), "squad,gls\nArsenal,91\n").unwrap();
        // ragged row: the reader errors instead of producing a count
        std::fs::write(dir.path().join("bad.csv"), "squad,gls\nArsenal\n").unwrap();

        let out = summarize_dir(dir.path()).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();

        assert!(content.contains("bad,bad.csv,error,error,"));
        assert!(content.contains("good,good.csv,1,2,squad;gls"));
    }

    #[test]
    fn test_missing_directory_is_validation_error() {
        let err = summarize_dir(Path::new("/nonexistent/raw")).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }
}
