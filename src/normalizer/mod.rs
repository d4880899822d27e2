// file: src/normalizer/mod.rs
// description: header flattening, column renaming, and table normalization

pub mod coerce;

use crate::config::NormalizeConfig;
use crate::error::{PipelineError, Result};
use crate::models::{NormalizedTable, RawTable};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    // Footnote and reference markers that FBref appends to header cells.
    static ref FOOTNOTE: Regex =
        Regex::new(r"\[[^\]]*\]|[*\u{2020}\u{2021}]").expect("FOOTNOTE regex is valid");
    static ref SEPARATORS: Regex = Regex::new(r"_+").expect("SEPARATORS regex is valid");
}

pub struct Normalizer {
    null_tokens: Vec<String>,
    rename_exact: Vec<(String, String)>,
    rename_patterns: Vec<(Regex, String)>,
}

impl Normalizer {
    pub fn new(config: &NormalizeConfig) -> Result<Self> {
        let rename_exact = config
            .rename_exact
            .iter()
            .map(|r| (r.from.to_lowercase(), r.to.clone()))
            .collect();

        let rename_patterns = config
            .rename_patterns
            .iter()
            .map(|r| {
                Regex::new(&format!("(?i){}", r.pattern))
                    .map(|re| (re, r.to.clone()))
                    .map_err(|e| {
                        PipelineError::Config(format!(
                            "invalid rename pattern {:?}: {}",
                            r.pattern, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            null_tokens: config.null_tokens.clone(),
            rename_exact,
            rename_patterns,
        })
    }

    /// Deterministic: identical raw input yields an identical table.
    pub fn normalize(&self, raw: &RawTable, name: &str) -> Result<NormalizedTable> {
        let width = raw.width();
        if width == 0 {
            return Err(PipelineError::normalization(name, "table has no columns"));
        }

        let flattened = flatten_headers(&raw.header_rows, width);
        let renamed = flattened
            .into_iter()
            .map(|n| self.apply_renames(n))
            .collect();
        let names = dedupe_names(renamed);

        let rows: Vec<Vec<String>> = raw.rows.iter().map(|r| pad_row(r, width)).collect();
        let (columns, cells) = coerce::coerce_columns(names, rows, &self.null_tokens);

        Ok(NormalizedTable {
            name: name.to_string(),
            columns,
            rows: cells,
        })
    }

    /// Exact lowercase match wins over the first matching pattern rule;
    /// unmatched names pass through untouched.
    fn apply_renames(&self, name: String) -> String {
        if let Some((_, to)) = self.rename_exact.iter().find(|(from, _)| *from == name) {
            return to.clone();
        }
        for (pattern, to) in &self.rename_patterns {
            if pattern.is_match(&name) {
                return to.clone();
            }
        }
        name
    }
}

/// Joins the non-empty cleaned parts of each header row with `_`, one name
/// per column. Columns whose header cells are all empty get a positional
/// name so the result is never blank.
fn flatten_headers(header_rows: &[Vec<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|i| {
            let parts: Vec<String> = header_rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| clean_header_part(cell))
                .filter(|part| !part.is_empty())
                .collect();

            if parts.is_empty() {
                format!("column_{}", i + 1)
            } else {
                parts.join("_")
            }
        })
        .collect()
}

fn clean_header_part(raw: &str) -> String {
    let stripped = FOOTNOTE.replace_all(raw, "");
    let lowered = stripped.trim().to_lowercase();
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join("_");
    let collapsed = SEPARATORS.replace_all(&joined, "_");
    collapsed.trim_matches('_').to_string()
}

/// First occurrence keeps the base name; collisions get `_2`, `_3`, ...
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let count = {
            let entry = seen.entry(name.clone()).or_insert(0);
            *entry += 1;
            *entry
        };

        if count == 1 {
            out.push(name);
            continue;
        }

        let mut n = count;
        loop {
            let candidate = format!("{}_{}", name, n);
            if !seen.contains_key(&candidate) {
                seen.insert(candidate.clone(), 1);
                out.push(candidate);
                break;
            }
            n += 1;
        }
    }

    out
}

fn pad_row(row: &[String], width: usize) -> Vec<String> {
    let mut out = row.to_vec();
    out.truncate(width);
    while out.len() < width {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExactRename, PatternRename};
    use crate::models::{Cell, ColumnType};
    use pretty_assertions::assert_eq;

    fn plain_normalizer() -> Normalizer {
        Normalizer::new(&crate::config::Config::default_config().normalize).unwrap()
    }

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_row_header_flattening() {
        let names = flatten_headers(
            &[
                header(&["", "Performance", "Performance"]),
                header(&["Squad", "Gls", "Ast"]),
            ],
            3,
        );
        assert_eq!(names, vec!["squad", "performance_gls", "performance_ast"]);
    }

    #[test]
    fn test_footnote_markers_stripped() {
        assert_eq!(clean_header_part("Gls*"), "gls");
        assert_eq!(clean_header_part("xG [1]"), "xg");
        assert_eq!(clean_header_part("Poss\u{2020}"), "poss");
    }

    #[test]
    fn test_whitespace_and_separator_collapse() {
        assert_eq!(clean_header_part("  Per  90   Minutes "), "per_90_minutes");
        assert_eq!(clean_header_part("_a__b_"), "a_b");
    }

    #[test]
    fn test_all_empty_header_gets_positional_name() {
        let names = flatten_headers(&[header(&["", "Squad"])], 2);
        assert_eq!(names, vec!["column_1", "squad"]);
    }

    #[test]
    fn test_duplicate_names_get_numeric_suffix() {
        let names = dedupe_names(vec![
            "squad".to_string(),
            "gls".to_string(),
            "squad".to_string(),
            "squad".to_string(),
        ]);
        assert_eq!(names, vec!["squad", "gls", "squad_2", "squad_3"]);
    }

    #[test]
    fn test_exact_rename_beats_pattern() {
        let mut config = crate::config::Config::default_config().normalize;
        config.rename_exact = vec![ExactRename {
            from: "Squad".to_string(),
            to: "team_name".to_string(),
        }];
        config.rename_patterns = vec![PatternRename {
            pattern: "^squad".to_string(),
            to: "wrong".to_string(),
        }];
        let normalizer = Normalizer::new(&config).unwrap();

        assert_eq!(normalizer.apply_renames("squad".to_string()), "team_name");
    }

    #[test]
    fn test_pattern_rename_applies_in_order() {
        let mut config = crate::config::Config::default_config().normalize;
        config.rename_patterns = vec![
            PatternRename {
                pattern: "goals".to_string(),
                to: "gls".to_string(),
            },
            PatternRename {
                pattern: "goal".to_string(),
                to: "g".to_string(),
            },
        ];
        let normalizer = Normalizer::new(&config).unwrap();

        assert_eq!(
            normalizer.apply_renames("standard_goals".to_string()),
            "gls"
        );
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let mut config = crate::config::Config::default_config().normalize;
        config.rename_patterns = vec![PatternRename {
            pattern: "[unclosed".to_string(),
            to: "x".to_string(),
        }];
        assert!(Normalizer::new(&config).is_err());
    }

    #[test]
    fn test_normalize_produces_rectangular_typed_table() {
        let raw = RawTable {
            header_rows: vec![
                header(&["", "Performance", "Performance"]),
                header(&["Squad", "Gls", "Ast"]),
            ],
            rows: vec![
                header(&["Arsenal", "91", "66"]),
                header(&["Chelsea", "77"]),
            ],
        };
        let table = plain_normalizer().normalize(&raw, "squads_standard").unwrap();

        assert!(table.is_rectangular());
        assert_eq!(
            table.column_names(),
            vec!["squad", "performance_gls", "performance_ast"]
        );
        assert_eq!(table.columns[1].dtype, ColumnType::Integer);
        assert_eq!(table.rows[1][2], Cell::Null);
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let raw = RawTable {
            header_rows: vec![header(&["Squad", "Poss"])],
            rows: vec![header(&["Arsenal", "58.3%"])],
        };
        let normalizer = plain_normalizer();

        let a = normalizer.normalize(&raw, "t").unwrap();
        let b = normalizer.normalize(&raw, "t").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_table_is_normalization_error() {
        let err = plain_normalizer()
            .normalize(&RawTable::default(), "empty")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Normalization { .. }));
    }
}
