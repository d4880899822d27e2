// file: src/extractor/mod.rs
// description: locates the target table in fetched HTML, including tables
//              embedded inside comment nodes

pub mod selectors;
pub mod tables;

use crate::catalog::TableSpec;
use crate::error::{PipelineError, Result};
use crate::models::{RawDocument, RawTable};
use scraper::node::Node;
use scraper::{ElementRef, Html};
use tables::{cell_text, grid_from_table};
use tracing::debug;

const HEADER_KEYWORDS: [&str; 3] = ["club", "squad", "team"];

pub struct TableExtractor;

impl TableExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Strategy ladder: table id in the page, table id inside a comment,
    /// then a header-keyword match in either place.
    pub fn extract(&self, doc: &RawDocument, spec: &TableSpec) -> Result<RawTable> {
        let document = Html::parse_document(&doc.html);

        if let Some(table) = find_by_id(&document, &spec.html_ids) {
            debug!("Found table for {} in main HTML", spec.id);
            return Ok(grid_from_table(table));
        }

        let comments = comment_fragments(&document);
        debug!(
            "No direct id match for {}; scanning {} comment fragments",
            spec.id,
            comments.len()
        );

        for fragment_html in &comments {
            let fragment = Html::parse_fragment(fragment_html);
            if let Some(table) = find_by_id(&fragment, &spec.html_ids) {
                debug!("Found table for {} inside a comment", spec.id);
                return Ok(grid_from_table(table));
            }
        }

        if let Some(table) = find_by_header_keyword(&document) {
            debug!("Falling back to header-keyword match for {}", spec.id);
            return Ok(grid_from_table(table));
        }

        for fragment_html in &comments {
            let fragment = Html::parse_fragment(fragment_html);
            if let Some(table) = find_by_header_keyword(&fragment) {
                debug!(
                    "Falling back to header-keyword match inside a comment for {}",
                    spec.id
                );
                return Ok(grid_from_table(table));
            }
        }

        Err(PipelineError::extraction(
            &spec.id,
            format!(
                "no table matching {:?} in document or {} comments",
                spec.html_ids,
                comments.len()
            ),
        ))
    }
}

impl Default for TableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact id match first across all hints, then substring match.
fn find_by_id<'a>(html: &'a Html, hints: &[String]) -> Option<ElementRef<'a>> {
    let candidates: Vec<ElementRef<'a>> = html.select(&selectors::TABLE).collect();

    for hint in hints {
        if let Some(table) = candidates
            .iter()
            .find(|t| t.value().attr("id") == Some(hint.as_str()))
        {
            return Some(*table);
        }
    }

    for hint in hints {
        if let Some(table) = candidates
            .iter()
            .find(|t| t.value().attr("id").is_some_and(|id| id.contains(hint.as_str())))
        {
            return Some(*table);
        }
    }

    None
}

/// Last resort: any table whose headers mention a club/squad/team column.
fn find_by_header_keyword(html: &Html) -> Option<ElementRef<'_>> {
    html.select(&selectors::TABLE).find(|table| {
        table.select(&selectors::HEADER_CELL).any(|th| {
            let text = cell_text(&th).to_lowercase();
            HEADER_KEYWORDS.iter().any(|k| text.contains(k))
        })
    })
}

/// Comment nodes that carry table markup, in document order.
fn comment_fragments(html: &Html) -> Vec<String> {
    html.tree
        .nodes()
        .filter_map(|node| match node.value() {
            Node::Comment(comment) => {
                let text: &str = comment;
                if text.contains("<table") {
                    Some(text.to_string())
                } else {
                    None
                }
            }
            _ => None,
        })
        .collect()
}
