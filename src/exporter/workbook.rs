// file: src/exporter/workbook.rs
// description: multi-sheet workbook export with a metadata sheet
// reference: https://docs.rs/rust_xlsxwriter

use crate::error::{PipelineError, Result};
use crate::models::{Cell, NormalizedTable};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Sheet name length limit in the xlsx format.
const SHEET_NAME_MAX: usize = 31;

/// Provenance row for the metadata sheet, one per exported table.
#[derive(Debug, Clone)]
pub struct SheetMeta {
    pub table: String,
    pub source: String,
    pub fetched_at: String,
    pub retrieved_via: String,
}

pub struct WorkbookExporter {
    output_dir: PathBuf,
    run_label: String,
}

impl WorkbookExporter {
    pub fn new(output_dir: impl Into<PathBuf>, run_label: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            run_label: run_label.into(),
        })
    }

    /// Writes `<output_dir>/<run_label>.xlsx`: a metadata sheet first, then
    /// one sheet per table. Saved to a temp path and renamed so readers
    /// never observe a half-written workbook.
    pub fn export(&self, tables: &[NormalizedTable], meta: &[SheetMeta]) -> Result<PathBuf> {
        let mut workbook = Workbook::new();

        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("metadata")?;
            for (col, title) in ["table", "source", "fetched_at", "retrieved_via"]
                .iter()
                .enumerate()
            {
                sheet.write_string(0, col as u16, *title)?;
            }
            for (row, entry) in meta.iter().enumerate() {
                let row = (row + 1) as u32;
                sheet.write_string(row, 0, entry.table.as_str())?;
                sheet.write_string(row, 1, entry.source.as_str())?;
                sheet.write_string(row, 2, entry.fetched_at.as_str())?;
                sheet.write_string(row, 3, entry.retrieved_via.as_str())?;
            }
        }

        let mut used: HashSet<String> = HashSet::new();
        used.insert("metadata".to_string());

        for table in tables {
            let name = unique_sheet_name(&mut used, &sanitize_sheet_name(&table.name));
            debug!("Writing sheet: {}", name);

            let sheet = workbook.add_worksheet();
            sheet.set_name(&name)?;

            for (col, column) in table.columns.iter().enumerate() {
                sheet.write_string(0, col as u16, column.name.as_str())?;
            }

            for (r, row) in table.rows.iter().enumerate() {
                let row_n = (r + 1) as u32;
                for (c, cell) in row.iter().enumerate() {
                    let col_n = c as u16;
                    match cell {
                        Cell::Int(v) => {
                            sheet.write_number(row_n, col_n, *v as f64)?;
                        }
                        Cell::Float(v) => {
                            sheet.write_number(row_n, col_n, *v)?;
                        }
                        Cell::Str(s) => {
                            sheet.write_string(row_n, col_n, s.as_str())?;
                        }
                        Cell::Null => {}
                    }
                }
            }
        }

        let path = self.output_dir.join(format!("{}.xlsx", self.run_label));
        let tmp = self.output_dir.join(format!("{}.xlsx.tmp", self.run_label));

        workbook.save(&tmp)?;
        std::fs::rename(&tmp, &path).map_err(|source| PipelineError::Export {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}

/// Replaces the characters the xlsx format forbids and truncates to the
/// 31-character limit.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '[' | ']' => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        return "table".to_string();
    }
    cleaned.chars().take(SHEET_NAME_MAX).collect()
}

fn unique_sheet_name(used: &mut HashSet<String>, base: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }

    let mut n = 2usize;
    loop {
        let suffix = format!("_{}", n);
        let keep = SHEET_NAME_MAX.saturating_sub(suffix.len());
        let candidate = format!(
            "{}{}",
            base.chars().take(keep).collect::<String>(),
            suffix
        );
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
