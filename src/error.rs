// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Retrieval failed for {table}: {detail}")]
    Retrieval { table: String, detail: String },

    #[error("Extraction failed for {table}: {detail}")]
    Extraction { table: String, detail: String },

    #[error("Normalization failed for {table}: {detail}")]
    Normalization { table: String, detail: String },

    #[error("Export failed for {}: {}", .path.display(), .source)]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn retrieval(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Retrieval {
            table: table.into(),
            detail: detail.into(),
        }
    }

    pub fn extraction(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Extraction {
            table: table.into(),
            detail: detail.into(),
        }
    }

    pub fn normalization(table: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Normalization {
            table: table.into(),
            detail: detail.into(),
        }
    }
}
