// file: src/fetcher/browser.rs
// description: headless browser retrieval for pages that refuse plain HTTP
// reference: https://docs.rs/chromiumoxide

use crate::catalog::TableSpec;
use crate::config::FetchConfig;
use crate::error::{PipelineError, Result};
use crate::fetcher::direct::has_table_markers;
use crate::models::{RawDocument, RetrievalPath};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct BrowserFetcher {
    user_agent: String,
    settle: Duration,
    attempts: usize,
    backoff: Duration,
}

impl BrowserFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            settle: Duration::from_secs(config.browser_wait_secs),
            attempts: config.attempts,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    pub async fn fetch(&self, spec: &TableSpec) -> Result<RawDocument> {
        let mut last_error = String::new();

        for attempt in 1..=self.attempts {
            if attempt > 1 {
                tokio::time::sleep(self.backoff).await;
            }

            match self.try_fetch(spec).await {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    warn!("Browser attempt {} failed for {}: {}", attempt, spec.id, e);
                    last_error = e.to_string();
                }
            }
        }

        Err(PipelineError::retrieval(&spec.id, last_error))
    }

    /// Launches a fresh headless session and closes it on every exit path
    /// before the result is returned.
    async fn try_fetch(&self, spec: &TableSpec) -> Result<RawDocument> {
        info!("Launching headless browser for {}", spec.url);

        let browser_config = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.user_agent))
            .build()
            .map_err(|e| PipelineError::retrieval(&spec.id, e))?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| PipelineError::retrieval(&spec.id, e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = self.load_page(&browser, spec).await;

        if let Err(e) = browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        if let Err(e) = browser.wait().await {
            debug!("Browser wait failed: {}", e);
        }
        handler_task.abort();

        let html = outcome?;
        if !has_table_markers(&html) {
            return Err(PipelineError::retrieval(
                &spec.id,
                "browser page has no table markup",
            ));
        }

        Ok(RawDocument::new(
            spec.id.clone(),
            spec.url.clone(),
            html,
            RetrievalPath::Browser,
        ))
    }

    async fn load_page(&self, browser: &Browser, spec: &TableSpec) -> Result<String> {
        let page = browser
            .new_page(spec.url.as_str())
            .await
            .map_err(|e| PipelineError::retrieval(&spec.id, e.to_string()))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| PipelineError::retrieval(&spec.id, e.to_string()))?;

        // Late scripts populate the commented-out tables; give them room.
        tokio::time::sleep(self.settle).await;

        page.content()
            .await
            .map_err(|e| PipelineError::retrieval(&spec.id, e.to_string()))
    }
}
