// file: src/extractor/tables.rs
// description: converts a located <table> element into a raw header/body grid

use crate::extractor::selectors;
use crate::models::RawTable;
use scraper::ElementRef;

/// Builds the raw grid: colspan-expanded header rows from `<thead>`, body
/// rows with mid-table marker rows and spacers excluded.
pub fn grid_from_table(table: ElementRef<'_>) -> RawTable {
    let mut header_rows: Vec<Vec<String>> = table
        .select(&selectors::THEAD_ROW)
        .map(expand_row)
        .collect();

    let mut body: Vec<ElementRef> = table.select(&selectors::BODY_ROW).collect();
    if body.is_empty() {
        body = table
            .select(&selectors::ROW)
            .filter(|tr| !in_thead(tr))
            .collect();
    }

    // Tables without a <thead> promote their first row to the header.
    if header_rows.is_empty() && !body.is_empty() {
        header_rows.push(expand_row(body.remove(0)));
    }

    let signature = header_rows.last().cloned();

    let rows = body
        .into_iter()
        .filter(|tr| !is_marker_row(tr))
        .map(expand_row)
        .filter(|cells| Some(cells) != signature.as_ref())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    RawTable { header_rows, rows }
}

/// Cell texts in document order, repeated per colspan so every header row
/// lines up column-for-column with the data rows.
fn expand_row(tr: ElementRef<'_>) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in tr.select(&selectors::CELL) {
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let text = cell_text(&cell);
        for _ in 0..span {
            cells.push(text.clone());
        }
    }
    cells
}

pub(crate) fn cell_text(el: &ElementRef) -> String {
    let joined: String = el.text().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Repeated header blocks and section spacers embedded mid-table.
fn is_marker_row(tr: &ElementRef) -> bool {
    tr.value()
        .classes()
        .any(|c| matches!(c, "thead" | "over_header" | "spacer"))
}

fn in_thead(tr: &ElementRef) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "thead")
}
