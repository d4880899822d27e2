// file: src/normalizer/coerce.rs
// description: column type promotion and scalar coercion

use crate::models::{Cell, Column, ColumnType};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Parsed {
    Null,
    Int(i64),
    Float(f64),
    Text,
}

/// Whole-column promotion: integer when every non-null cell parses as an
/// integer, else float when every non-null cell parses numerically, else
/// text. Cells are then coerced to the column's type.
pub fn coerce_columns(
    names: Vec<String>,
    rows: Vec<Vec<String>>,
    null_tokens: &[String],
) -> (Vec<Column>, Vec<Vec<Cell>>) {
    let width = names.len();
    let mut types = Vec::with_capacity(width);

    for i in 0..width {
        let mut all_int = true;
        let mut all_numeric = true;
        let mut any_value = false;

        for row in &rows {
            match parse_scalar(&row[i], null_tokens) {
                Parsed::Null => {}
                Parsed::Int(_) => any_value = true,
                Parsed::Float(_) => {
                    any_value = true;
                    all_int = false;
                }
                Parsed::Text => {
                    any_value = true;
                    all_int = false;
                    all_numeric = false;
                }
            }
        }

        let dtype = if !any_value {
            ColumnType::Text
        } else if all_int {
            ColumnType::Integer
        } else if all_numeric {
            ColumnType::Float
        } else {
            ColumnType::Text
        };
        types.push(dtype);
    }

    let columns = names
        .into_iter()
        .zip(types.iter())
        .map(|(name, dtype)| Column {
            name,
            dtype: *dtype,
        })
        .collect();

    let cells = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(types.iter())
                .map(|(raw, dtype)| make_cell(raw, *dtype, null_tokens))
                .collect()
        })
        .collect();

    (columns, cells)
}

fn make_cell(raw: &str, dtype: ColumnType, null_tokens: &[String]) -> Cell {
    match parse_scalar(raw, null_tokens) {
        Parsed::Null => Cell::Null,
        Parsed::Int(v) => match dtype {
            ColumnType::Integer => Cell::Int(v),
            ColumnType::Float => Cell::Float(v as f64),
            ColumnType::Text => Cell::Str(raw.trim().to_string()),
        },
        Parsed::Float(v) => match dtype {
            ColumnType::Float => Cell::Float(v),
            _ => Cell::Str(raw.trim().to_string()),
        },
        Parsed::Text => Cell::Str(raw.trim().to_string()),
    }
}

pub(crate) fn parse_scalar(raw: &str, null_tokens: &[String]) -> Parsed {
    let trimmed = raw.trim();
    if null_tokens.iter().any(|t| t == trimmed) {
        return Parsed::Null;
    }
    if let Some(v) = parse_int(trimmed) {
        return Parsed::Int(v);
    }
    if let Some(v) = parse_float(trimmed) {
        return Parsed::Float(v);
    }
    Parsed::Text
}

/// Optional sign, digits, optional comma thousands separators. Anything
/// with a decimal point or percent sign is not an integer.
fn parse_int(s: &str) -> Option<i64> {
    if s.contains('.') || s.ends_with('%') {
        return None;
    }
    let cleaned = s.replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok()
}

/// A trailing percent sign scales by 1/100; commas are stripped. Alphabetic
/// content is rejected so "inf"/"nan" stay text.
fn parse_float(s: &str) -> Option<f64> {
    let (body, percent) = match s.strip_suffix('%') {
        Some(b) => (b, true),
        None => (s, false),
    };
    let cleaned = body.trim().replace(',', "");
    if cleaned.is_empty() || cleaned.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .map(|v| if percent { v / 100.0 } else { v })
}
