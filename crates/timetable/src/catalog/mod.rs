/// Session catalog sources
mod cache;
mod error;

pub use cache::{CacheStats, CatalogCache};
pub use error::CatalogError;

use crate::planner::SessionRecord;
use rand::Rng;
use reqwest::Client;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Supplies the full list of scheduled sessions.
pub trait CatalogProvider: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<SessionRecord>, CatalogError>> + Send;
}

/// Reads the catalog from a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileCatalogProvider {
    path: PathBuf,
}

impl FileCatalogProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for FileCatalogProvider {
    async fn fetch(&self) -> Result<Vec<SessionRecord>, CatalogError> {
        debug!(path = %self.path.display(), "Reading catalog file");
        let content = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<SessionRecord> = serde_json::from_str(&content)?;
        info!(path = %self.path.display(), records = records.len(), "Loaded catalog");
        Ok(records)
    }
}

/// Downloads the catalog as JSON over HTTP, retrying transient failures.
#[derive(Debug, Clone)]
pub struct HttpCatalogProvider {
    client: Client,
    url: Url,
    max_attempts: u32,
    retry_base: Duration,
}

impl HttpCatalogProvider {
    pub fn new(url: Url, max_attempts: u32) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            url,
            max_attempts: max_attempts.max(1),
            retry_base: Duration::from_millis(250),
        })
    }

    async fn fetch_once(&self) -> Result<Vec<SessionRecord>, CatalogError> {
        let response = self.client.get(self.url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Vec<SessionRecord>>().await?)
    }

    /// Calculates retry delay with exponential backoff and jitter.
    fn retry_delay(&self, attempt: u32) -> Duration {
        let base = self.retry_base.as_millis() as u64;
        // Exponential backoff: base * 2^min(attempt-1, 5)
        let exponential = base * 2u64.pow(attempt.saturating_sub(1).min(5));
        let capped = exponential.min(5_000);
        // Add jitter: 0-20% of the delay
        let jitter = rand::thread_rng().gen_range(0..=(capped / 5));
        Duration::from_millis(capped + jitter)
    }
}

impl CatalogProvider for HttpCatalogProvider {
    async fn fetch(&self) -> Result<Vec<SessionRecord>, CatalogError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(records) => {
                    info!(url = %self.url, records = records.len(), attempt, "Downloaded catalog");
                    return Ok(records);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        url = %self.url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Catalog fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    return Err(CatalogError::Unavailable {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Serves a fixed, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogProvider {
    records: Vec<SessionRecord>,
}

impl StaticCatalogProvider {
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self { records }
    }
}

impl CatalogProvider for StaticCatalogProvider {
    async fn fetch(&self) -> Result<Vec<SessionRecord>, CatalogError> {
        Ok(self.records.clone())
    }
}

/// The provider chosen by configuration.
#[derive(Debug, Clone)]
pub enum AnyCatalogProvider {
    File(FileCatalogProvider),
    Http(HttpCatalogProvider),
    Static(StaticCatalogProvider),
}

impl CatalogProvider for AnyCatalogProvider {
    async fn fetch(&self) -> Result<Vec<SessionRecord>, CatalogError> {
        match self {
            AnyCatalogProvider::File(p) => p.fetch().await,
            AnyCatalogProvider::Http(p) => p.fetch().await,
            AnyCatalogProvider::Static(p) => p.fetch().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_provider_reads_json_array() {
        let path = std::env::temp_dir().join(format!(
            "timetable-catalog-{}.json",
            rand::thread_rng().gen::<u32>()
        ));
        tokio::fs::write(
            &path,
            r#"[{"subject":"Math","teacher":"A","class":"C1","day":"Monday","time_slot":"09:00 to 10:30"},{"subject":"Phy"}]"#,
        )
        .await
        .unwrap();

        let records = FileCatalogProvider::new(&path).fetch().await.unwrap();
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].day, None);
    }

    #[tokio::test]
    async fn test_file_provider_reports_missing_file() {
        let result = FileCatalogProvider::new("/nonexistent/timetable.json")
            .fetch()
            .await;
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[tokio::test]
    async fn test_file_provider_reports_bad_json() {
        let path = std::env::temp_dir().join(format!(
            "timetable-catalog-{}.json",
            rand::thread_rng().gen::<u32>()
        ));
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = FileCatalogProvider::new(&path).fetch().await;
        tokio::fs::remove_file(&path).await.ok();

        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn test_retry_delay_backoff() {
        let provider =
            HttpCatalogProvider::new(Url::parse("http://localhost/timetable.json").unwrap(), 3)
                .unwrap();

        let d1 = provider.retry_delay(1);
        let d2 = provider.retry_delay(2);
        let d3 = provider.retry_delay(3);

        // Each should be roughly double (with jitter)
        assert!(d2 > d1);
        assert!(d3 > d2);
    }
}
