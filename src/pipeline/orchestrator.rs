// file: src/pipeline/orchestrator.rs
// description: sequential per-table fetch, extract, normalize, export loop
// reference: run-to-completion driver with per-table error scoping

use crate::catalog::TableSpec;
use crate::config::Config;
use crate::error::Result;
use crate::exporter::{CsvExporter, ExportFormat, SheetMeta, WorkbookExporter};
use crate::extractor::TableExtractor;
use crate::fetcher::{Retrieve, RetrievalMode, Retriever};
use crate::models::{ExportManifest, NormalizedTable, RunReport};
use crate::normalizer::Normalizer;
use crate::pipeline::progress::ProgressTracker;
use std::path::Path;
use tracing::{debug, error, info, warn};

pub struct PipelineOrchestrator {
    config: Config,
    retriever: Box<dyn Retrieve>,
    extractor: TableExtractor,
    normalizer: Normalizer,
}

impl PipelineOrchestrator {
    pub fn new(config: Config, mode: RetrievalMode) -> Result<Self> {
        let retriever = Box::new(Retriever::new(mode, &config.fetch)?);
        Self::with_retriever(config, retriever)
    }

    /// Retrieval-injecting constructor; the pipeline is otherwise offline.
    pub fn with_retriever(config: Config, retriever: Box<dyn Retrieve>) -> Result<Self> {
        let normalizer = Normalizer::new(&config.normalize)?;
        Ok(Self {
            config,
            retriever,
            extractor: TableExtractor::new(),
            normalizer,
        })
    }

    /// Processes one TableSpec at a time. A failure is recorded against its
    /// table and the loop moves on; already-exported files stay in place.
    pub async fn run(
        &self,
        specs: &[TableSpec],
        format: ExportFormat,
        output_dir: &Path,
    ) -> Result<RunReport> {
        let mut report = RunReport::new();

        if specs.is_empty() {
            warn!("No tables selected, nothing to do");
            return Ok(report);
        }

        info!(
            "Processing {} tables from {}",
            specs.len(),
            self.config.source.base_url
        );

        let csv_exporter = if format.includes_csv() {
            Some(CsvExporter::new(output_dir)?)
        } else {
            None
        };

        let progress = ProgressTracker::new(specs.len());
        let mut workbook_tables: Vec<NormalizedTable> = Vec::new();
        let mut sheet_meta: Vec<SheetMeta> = Vec::new();

        for spec in specs {
            progress.set_message(spec.id.clone());

            match self
                .process_spec(spec, csv_exporter.as_ref(), &mut report.manifest)
                .await
            {
                Ok((table, meta)) => {
                    report.succeeded.push(spec.id.clone());
                    progress.inc_succeeded();
                    if format.includes_xlsx() {
                        workbook_tables.push(table);
                        sheet_meta.push(meta);
                    }
                }
                Err(e) => {
                    error!("Table {} failed: {}", spec.id, e);
                    report.record_failure(&spec.id, e.to_string());
                    progress.inc_failed();
                }
            }
        }

        if format.includes_xlsx() && !workbook_tables.is_empty() {
            let outcome = WorkbookExporter::new(output_dir, &self.config.export.run_label)
                .and_then(|exporter| exporter.export(&workbook_tables, &sheet_meta));

            match outcome {
                Ok(path) => {
                    info!("Wrote workbook: {}", path.display());
                    for table in &workbook_tables {
                        report
                            .manifest
                            .record(&table.name, path.clone(), ExportFormat::Xlsx);
                    }
                }
                Err(e) => {
                    error!("Workbook export failed: {}", e);
                    report.workbook_error = Some(e.to_string());
                }
            }
        }

        progress.finish();

        let stats = progress.get_stats();
        info!(
            "Run complete: {} succeeded, {} failed in {}s",
            stats.tables_succeeded, stats.tables_failed, stats.duration_secs
        );

        Ok(report)
    }

    async fn process_spec(
        &self,
        spec: &TableSpec,
        csv_exporter: Option<&CsvExporter>,
        manifest: &mut ExportManifest,
    ) -> Result<(NormalizedTable, SheetMeta)> {
        info!("Processing table: {}", spec.id);

        let doc = self.retriever.fetch(spec).await?;
        debug!(
            "Fetched {} via {} ({} bytes, hash {})",
            spec.id,
            doc.retrieved_via,
            doc.html.len(),
            &doc.content_hash[..12]
        );

        let raw = self.extractor.extract(&doc, spec)?;
        let table = self.normalizer.normalize(&raw, &spec.id)?;

        if let Some(exporter) = csv_exporter {
            let path = exporter.export(&table)?;
            info!("Wrote CSV: {}", path.display());
            manifest.record(&spec.id, path, ExportFormat::Csv);
        }

        let meta = SheetMeta {
            table: spec.id.clone(),
            source: doc.url.clone(),
            fetched_at: doc.fetched_at.to_rfc3339(),
            retrieved_via: doc.retrieved_via.to_string(),
        };

        Ok((table, meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::models::{RawDocument, RetrievalPath};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn table_html(id: &str) -> String {
        format!(
            r#"<html><body><table id="{}"><thead>
                <tr><th>Squad</th><th>Gls</th></tr>
            </thead><tbody>
                <tr><th>Arsenal</th><td>91</td></tr>
                <tr><th>Chelsea</th><td>77</td></tr>
            </tbody></table></body></html>"#,
            id
        )
    }

    fn spec(id: &str) -> TableSpec {
        TableSpec {
            id: id.to_string(),
            label: id.to_string(),
            url: format!("https://example.com/stats#{}", id),
            html_ids: vec![format!("stats_{}_for", id)],
        }
    }

    struct MockRetriever {
        pages: HashMap<String, String>,
        fetched: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Retrieve for MockRetriever {
        async fn fetch(&self, spec: &TableSpec) -> Result<RawDocument> {
            self.fetched.lock().unwrap().push(spec.id.clone());
            match self.pages.get(&spec.id) {
                Some(html) => Ok(RawDocument::new(
                    spec.id.clone(),
                    spec.url.clone(),
                    html.clone(),
                    RetrievalPath::Direct,
                )),
                None => Err(PipelineError::retrieval(&spec.id, "connection refused")),
            }
        }
    }

    fn orchestrator_with(
        pages: HashMap<String, String>,
    ) -> (PipelineOrchestrator, Arc<Mutex<Vec<String>>>) {
        let fetched = Arc::new(Mutex::new(Vec::new()));
        let retriever = MockRetriever {
            pages,
            fetched: fetched.clone(),
        };
        let orchestrator = PipelineOrchestrator::with_retriever(
            crate::config::Config::default_config(),
            Box::new(retriever),
        )
        .unwrap();
        (orchestrator, fetched)
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_other_tables() {
        let mut pages = HashMap::new();
        pages.insert("squads_standard".to_string(), table_html("stats_squads_standard_for"));
        // the second table's page has no recognizable table markup
        pages.insert(
            "keepers".to_string(),
            "<html><body><p>blocked</p></body></html>".to_string(),
        );
        pages.insert("squads_shooting".to_string(), table_html("stats_squads_shooting_for"));

        let (orchestrator, _) = orchestrator_with(pages);
        let dir = tempdir().unwrap();

        let specs = vec![spec("squads_standard"), spec("keepers"), spec("squads_shooting")];
        let report = orchestrator
            .run(&specs, ExportFormat::Csv, dir.path())
            .await
            .unwrap();

        assert_eq!(report.succeeded, vec!["squads_standard", "squads_shooting"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, "keepers");
        assert!(report.has_failures());

        assert!(dir.path().join("squads_standard.csv").exists());
        assert!(dir.path().join("squads_shooting.csv").exists());
        assert!(!dir.path().join("keepers.csv").exists());
    }

    #[tokio::test]
    async fn test_retrieval_failure_is_scoped_to_its_table() {
        let mut pages = HashMap::new();
        pages.insert("squads_standard".to_string(), table_html("stats_squads_standard_for"));
        // "keepers" has no page at all: the mock refuses the connection

        let (orchestrator, _) = orchestrator_with(pages);
        let dir = tempdir().unwrap();

        let report = orchestrator
            .run(
                &[spec("squads_standard"), spec("keepers")],
                ExportFormat::Csv,
                dir.path(),
            )
            .await
            .unwrap();

        assert_eq!(report.succeeded, vec!["squads_standard"]);
        assert!(report.failed[0].reason.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_filtered_specs_never_fetch() {
        let mut pages = HashMap::new();
        pages.insert("squads_standard".to_string(), table_html("stats_squads_standard_for"));
        pages.insert("keepers".to_string(), table_html("stats_keepers_for"));
        pages.insert("squads_shooting".to_string(), table_html("stats_squads_shooting_for"));

        let (orchestrator, fetched) = orchestrator_with(pages);
        let dir = tempdir().unwrap();

        let all = vec![spec("squads_standard"), spec("keepers"), spec("squads_shooting")];
        let selected = crate::catalog::filter_specs(all, &["squads".to_string()]);
        let report = orchestrator
            .run(&selected, ExportFormat::Csv, dir.path())
            .await
            .unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(
            *fetched.lock().unwrap(),
            vec!["squads_standard", "squads_shooting"]
        );
        assert!(!dir.path().join("keepers.csv").exists());
    }

    #[tokio::test]
    async fn test_workbook_export_with_both_formats() {
        let mut pages = HashMap::new();
        pages.insert("squads_standard".to_string(), table_html("stats_squads_standard_for"));

        let (orchestrator, _) = orchestrator_with(pages);
        let dir = tempdir().unwrap();

        let report = orchestrator
            .run(&[spec("squads_standard")], ExportFormat::Both, dir.path())
            .await
            .unwrap();

        assert!(!report.has_failures());
        assert!(dir.path().join("squads_standard.csv").exists());
        assert!(dir.path().join("premier_league_team_stats.xlsx").exists());
        assert_eq!(report.manifest.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_selection_is_a_clean_noop() {
        let (orchestrator, fetched) = orchestrator_with(HashMap::new());
        let dir = tempdir().unwrap();

        let report = orchestrator
            .run(&[], ExportFormat::Both, dir.path())
            .await
            .unwrap();

        assert!(!report.has_failures());
        assert!(fetched.lock().unwrap().is_empty());
    }
}
