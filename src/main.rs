// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use fbref_scrape::utils::logging;
use fbref_scrape::{
    Config, ExportFormat, PipelineOrchestrator, RetrievalMode, RunReport, catalog, filter_specs,
    summary,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fbref_scrape")]
#[command(version = "0.1.0")]
#[command(about = "Premier League team statistics pipeline: fetch, normalize, export", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the selected tables and export them
    Run {
        /// Skip the direct HTTP attempt and go straight to the browser
        #[arg(long, visible_alias = "use-selenium", conflicts_with = "force_direct")]
        force_browser: bool,

        /// Never fall back to the browser path
        #[arg(long)]
        force_direct: bool,

        #[arg(long, value_enum, default_value_t = ExportFormat::Both)]
        format: ExportFormat,

        /// Case-insensitive substring filters on table id or label
        #[arg(long = "tables", value_name = "SUBSTRING", value_delimiter = ',')]
        tables: Vec<String>,

        /// Destination directory (defaults to export.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the table catalog
    Catalog,

    /// Summarize previously exported CSV files
    Summarize {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);

    info!("FBref statistics pipeline");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Run {
            force_browser,
            force_direct,
            format,
            tables,
            output,
        } => {
            let failed = cmd_run(&config, force_browser, force_direct, format, tables, output)
                .await?;
            if failed {
                std::process::exit(1);
            }
        }
        Commands::Catalog => {
            cmd_catalog(&config);
        }
        Commands::Summarize { output } => {
            cmd_summarize(&config, output)?;
        }
    }

    Ok(())
}

async fn cmd_run(
    config: &Config,
    force_browser: bool,
    force_direct: bool,
    format: ExportFormat,
    tables: Vec<String>,
    output: Option<PathBuf>,
) -> Result<bool> {
    let mode = if force_browser {
        RetrievalMode::ForceBrowser
    } else if force_direct {
        RetrievalMode::ForceDirect
    } else {
        RetrievalMode::Auto
    };

    // Filtering happens before any fetch so excluded tables never hit the
    // network.
    let specs = filter_specs(catalog(&config.source), &tables);
    if specs.is_empty() {
        warn!("No catalog entries match {:?}", tables);
        return Ok(false);
    }

    let output_dir = output.unwrap_or_else(|| config.export.output_dir.clone());

    let orchestrator = PipelineOrchestrator::new(config.clone(), mode)
        .context("Failed to build the pipeline")?;
    let report = orchestrator
        .run(&specs, format, &output_dir)
        .await
        .context("Pipeline run failed")?;

    print_summary(&report);
    Ok(report.has_failures())
}

fn cmd_catalog(config: &Config) {
    let specs = catalog(&config.source);
    println!(
        "{} tables for {} {}:",
        specs.len(),
        config.source.competition,
        config.source.season
    );
    for spec in specs {
        println!("  {:<22} {}", spec.id, spec.label);
    }
}

fn cmd_summarize(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let dir = output.unwrap_or_else(|| config.export.output_dir.clone());
    let path = summary::summarize_dir(&dir).context("Summarize failed")?;
    println!("{}", logging::format_success(&path.display().to_string()));
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("Run summary");
    println!("{}", "=".repeat(60));

    for id in &report.succeeded {
        println!("  {}", logging::format_success(id));
    }
    for failure in &report.failed {
        println!(
            "  {}",
            logging::format_error(&format!("{}: {}", failure.id, failure.reason))
        );
    }
    if let Some(err) = &report.workbook_error {
        println!("  {}", logging::format_warning(&format!("workbook: {}", err)));
    }

    println!();
    println!(
        "{} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    for entry in &report.manifest.entries {
        println!("  wrote {}", entry.path.display());
    }

    if report.has_failures() {
        eprintln!("Failed tables:");
        for failure in &report.failed {
            eprintln!("  {}: {}", failure.id, failure.reason);
        }
        if let Some(err) = &report.workbook_error {
            eprintln!("  workbook: {}", err);
        }
    }
}
