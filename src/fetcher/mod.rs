// file: src/fetcher/mod.rs
// description: retrieval strategies and the auto-fallback policy

pub mod browser;
pub mod direct;

pub use browser::BrowserFetcher;
pub use direct::DirectFetcher;

use crate::catalog::TableSpec;
use crate::config::FetchConfig;
use crate::error::Result;
use crate::models::RawDocument;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalMode {
    /// Direct HTTP first, browser fallback when blocked or unusable.
    #[default]
    Auto,
    ForceDirect,
    ForceBrowser,
}

/// One retrieval interface over both paths. The orchestrator only ever sees
/// this trait, which also keeps it testable offline.
#[async_trait]
pub trait Retrieve: Send + Sync {
    async fn fetch(&self, spec: &TableSpec) -> Result<RawDocument>;
}

pub struct Retriever {
    mode: RetrievalMode,
    direct: DirectFetcher,
    browser: BrowserFetcher,
    delay: Duration,
    last_fetch: Mutex<Option<Instant>>,
}

impl Retriever {
    pub fn new(mode: RetrievalMode, config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            mode,
            direct: DirectFetcher::new(config)?,
            browser: BrowserFetcher::new(config),
            delay: Duration::from_millis(config.delay_ms),
            last_fetch: Mutex::new(None),
        })
    }

    /// Polite spacing between successive requests to the source site.
    async fn pace(&self) {
        let mut last = self.last_fetch.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.delay {
                let pause = self.delay - elapsed;
                debug!("Pacing: sleeping {} ms before next fetch", pause.as_millis());
                tokio::time::sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl Retrieve for Retriever {
    async fn fetch(&self, spec: &TableSpec) -> Result<RawDocument> {
        self.pace().await;

        match self.mode {
            RetrievalMode::ForceDirect => self.direct.fetch(spec).await,
            RetrievalMode::ForceBrowser => self.browser.fetch(spec).await,
            RetrievalMode::Auto => match self.direct.fetch(spec).await {
                Ok(doc) => Ok(doc),
                Err(err) => {
                    warn!("Direct fetch failed for {}: {}", spec.id, err);
                    warn!("Falling back to browser retrieval");
                    self.browser.fetch(spec).await
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_auto() {
        assert_eq!(RetrievalMode::default(), RetrievalMode::Auto);
    }

    #[tokio::test]
    async fn test_first_fetch_is_not_paced() {
        let config = crate::config::Config::default_config().fetch;
        let retriever = Retriever::new(RetrievalMode::Auto, &config).unwrap();

        let started = Instant::now();
        retriever.pace().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_fetch_waits_out_the_delay() {
        let mut config = crate::config::Config::default_config().fetch;
        config.delay_ms = 2000;
        let retriever = Retriever::new(RetrievalMode::Auto, &config).unwrap();

        retriever.pace().await;
        let before = Instant::now();
        retriever.pace().await;
        assert!(before.elapsed() >= Duration::from_millis(2000));
    }
}
