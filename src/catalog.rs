// file: src/catalog.rs
// description: fixed catalog of FBref squad tables and name filtering

use crate::config::SourceConfig;

/// Identifies one source table: a stable id, the page it lives on, and the
/// HTML id hints used to locate it in the markup (most specific first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub id: String,
    pub label: String,
    pub url: String,
    pub html_ids: Vec<String>,
}

impl TableSpec {
    fn new(id: &str, label: &str, url: &str, html_ids: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            url: url.to_string(),
            html_ids: html_ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Case-insensitive substring match against id or label.
    pub fn matches(&self, filter: &str) -> bool {
        let needle = filter.to_lowercase();
        self.id.to_lowercase().contains(&needle) || self.label.to_lowercase().contains(&needle)
    }
}

/// The squad tables published on the competition stats page. FBref renders
/// most of these inside HTML comments, so the hints cover both the commented
/// and the directly rendered variants.
pub fn catalog(source: &SourceConfig) -> Vec<TableSpec> {
    let url = source.base_url.as_str();

    vec![
        TableSpec::new(
            "squads_standard",
            "Squad Standard Stats",
            url,
            &["stats_squads_standard_for", "stats_standard"],
        ),
        TableSpec::new(
            "keepers",
            "Squad Goalkeeping",
            url,
            &["stats_squads_keeper_for", "stats_keeper"],
        ),
        TableSpec::new(
            "keepers_adv",
            "Squad Advanced Goalkeeping",
            url,
            &["stats_squads_keeper_adv_for", "stats_keeper_adv"],
        ),
        TableSpec::new(
            "squads_shooting",
            "Squad Shooting",
            url,
            &["stats_squads_shooting_for", "stats_shooting"],
        ),
        TableSpec::new(
            "squads_passing",
            "Squad Passing",
            url,
            &["stats_squads_passing_for", "stats_passing"],
        ),
        TableSpec::new(
            "squads_passing_types",
            "Squad Pass Types",
            url,
            &["stats_squads_passing_types_for", "stats_passing_types"],
        ),
        TableSpec::new(
            "squads_gca",
            "Squad Goal and Shot Creation",
            url,
            &["stats_squads_gca_for", "stats_gca"],
        ),
        TableSpec::new(
            "squads_defense",
            "Squad Defensive Actions",
            url,
            &["stats_squads_defense_for", "stats_defense"],
        ),
        TableSpec::new(
            "squads_possession",
            "Squad Possession",
            url,
            &["stats_squads_possession_for", "stats_possession"],
        ),
        TableSpec::new(
            "squads_playing_time",
            "Squad Playing Time",
            url,
            &["stats_squads_playing_time_for", "stats_playing_time"],
        ),
        TableSpec::new(
            "squads_misc",
            "Squad Miscellaneous Stats",
            url,
            &["stats_squads_misc_for", "stats_misc"],
        ),
    ]
}

/// Applied before any fetch so excluded tables never hit the network.
/// An empty filter list selects the whole catalog; otherwise a spec is kept
/// when any filter matches its id or label.
pub fn filter_specs(specs: Vec<TableSpec>, filters: &[String]) -> Vec<TableSpec> {
    if filters.is_empty() {
        return specs;
    }

    specs
        .into_iter()
        .filter(|spec| filters.iter().any(|f| spec.matches(f)))
        .collect()
}
