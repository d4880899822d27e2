// file: src/fetcher/direct.rs
// description: plain HTTP retrieval with bounded retries and block detection
// reference: https://docs.rs/reqwest

use crate::catalog::TableSpec;
use crate::config::FetchConfig;
use crate::error::{PipelineError, Result};
use crate::models::{RawDocument, RetrievalPath};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};

pub struct DirectFetcher {
    client: reqwest::Client,
    attempts: usize,
    backoff: Duration,
}

impl DirectFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            attempts: config.attempts,
            backoff: Duration::from_millis(config.backoff_ms),
        })
    }

    pub async fn fetch(&self, spec: &TableSpec) -> Result<RawDocument> {
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            if attempt > 1 {
                let pause = self.backoff * 2u32.pow((attempt - 2) as u32);
                tokio::time::sleep(pause).await;
            }

            info!(
                "Fetching {} (attempt {}/{})",
                spec.url, attempt, self.attempts
            );

            match self.try_fetch(spec).await {
                Ok(doc) => return Ok(doc),
                Err(detail) => {
                    warn!("Attempt {} failed: {}", attempt, detail);
                    last_error = detail;
                }
            }
        }

        Err(PipelineError::retrieval(&spec.id, last_error))
    }

    async fn try_fetch(&self, spec: &TableSpec) -> std::result::Result<RawDocument, String> {
        let response = self
            .client
            .get(&spec.url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if looks_blocked(status) {
            return Err(format!("blocked by source (HTTP {})", status.as_u16()));
        }
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let body = response.text().await.map_err(|e| e.to_string())?;
        if !has_table_markers(&body) {
            return Err("response body has no table markup".to_string());
        }

        Ok(RawDocument::new(
            spec.id.clone(),
            spec.url.clone(),
            body,
            RetrievalPath::Direct,
        ))
    }
}

/// Statuses the source uses to refuse non-browser clients.
pub fn looks_blocked(status: StatusCode) -> bool {
    matches!(status.as_u16(), 403 | 429)
}

/// The tables may sit inside HTML comments, but the marker text survives
/// either way.
pub fn has_table_markers(html: &str) -> bool {
    html.contains("<table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_statuses() {
        assert!(looks_blocked(StatusCode::FORBIDDEN));
        assert!(looks_blocked(StatusCode::TOO_MANY_REQUESTS));
        assert!(!looks_blocked(StatusCode::OK));
        assert!(!looks_blocked(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_table_markers_plain() {
        assert!(has_table_markers("<html><table id=\"stats\"></table></html>"));
    }

    #[test]
    fn test_table_markers_inside_comment() {
        assert!(has_table_markers(
            "<html><!-- <table id=\"stats\"></table> --></html>"
        ));
    }

    #[test]
    fn test_missing_table_markers() {
        assert!(!has_table_markers("<html><body>Rate limited</body></html>"));
    }
}
