// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub source: SourceConfig,
    pub fetch: FetchConfig,
    pub normalize: NormalizeConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub competition: String,
    pub season: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    pub attempts: usize,
    pub backoff_ms: u64,
    /// Minimum pause between successive fetches against the source site.
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Extra settle time after page load on the browser path.
    pub browser_wait_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NormalizeConfig {
    #[serde(default = "default_null_tokens")]
    pub null_tokens: Vec<String>,
    #[serde(default)]
    pub rename_exact: Vec<ExactRename>,
    #[serde(default)]
    pub rename_patterns: Vec<PatternRename>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExactRename {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternRename {
    pub pattern: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    /// Workbook file stem: `<output_dir>/<run_label>.xlsx`.
    pub run_label: String,
}

fn default_null_tokens() -> Vec<String> {
    vec!["".to_string(), "-".to_string(), "\u{2014}".to_string()]
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FBREF_SCRAPE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            source: SourceConfig {
                base_url: "https://fbref.com/en/comps/9/Premier-League-Stats".to_string(),
                competition: "Premier League".to_string(),
                season: "2024-2025".to_string(),
            },
            fetch: FetchConfig {
                attempts: 3,
                backoff_ms: 1000,
                delay_ms: 3000,
                timeout_secs: 15,
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                    .to_string(),
                browser_wait_secs: 5,
            },
            normalize: NormalizeConfig {
                null_tokens: default_null_tokens(),
                rename_exact: vec![],
                rename_patterns: vec![],
            },
            export: ExportConfig {
                output_dir: PathBuf::from("data/raw"),
                run_label: "premier_league_team_stats".to_string(),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_url(&self.source.base_url)?;

        if self.fetch.attempts == 0 {
            return Err(PipelineError::Config(
                "fetch.attempts must be greater than 0".to_string(),
            ));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "fetch.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.export.run_label.trim().is_empty() {
            return Err(PipelineError::Config(
                "export.run_label must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
