// file: src/models/table.rs
// description: raw and normalized tabular structures

use serde::Serialize;

/// A single scalar value after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Str(String),
    Int(i64),
    Float(f64),
    Null,
}

impl Cell {
    /// CSV field rendering. Null maps to the empty field; floats use Rust's
    /// shortest round-trip formatting, which is stable across runs.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Str(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Null => String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
}

/// Pre-normalization extract: the header grid (one entry per header row,
/// colspan already expanded) and the body rows, all as raw cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub header_rows: Vec<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Widest row wins; short rows are padded downstream.
    pub fn width(&self) -> usize {
        self.header_rows
            .iter()
            .chain(self.rows.iter())
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
    }
}

/// Rectangular table with unique, ordered, typed columns. Invariant: every
/// row holds exactly one cell per declared column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|r| r.len() == self.columns.len())
    }
}
