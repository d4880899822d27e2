// file: src/extractor/selectors.rs
// description: compiled css selectors for table extraction
// reference: https://docs.rs/scraper

use lazy_static::lazy_static;
use scraper::Selector;

lazy_static! {
    pub static ref TABLE: Selector = Selector::parse("table").expect("TABLE selector is valid");
    pub static ref THEAD_ROW: Selector =
        Selector::parse("thead tr").expect("THEAD_ROW selector is valid");
    pub static ref BODY_ROW: Selector =
        Selector::parse("tbody tr").expect("BODY_ROW selector is valid");
    pub static ref ROW: Selector = Selector::parse("tr").expect("ROW selector is valid");
    pub static ref HEADER_CELL: Selector =
        Selector::parse("th").expect("HEADER_CELL selector is valid");
    pub static ref CELL: Selector = Selector::parse("th, td").expect("CELL selector is valid");
}
