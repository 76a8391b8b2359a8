// src/ingest/types.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-success status {0}")]
    Status(u16),
}

/// Raw page content for a URL. Any failure is an `Err`, never a panic.
#[async_trait::async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
    fn name(&self) -> &'static str;
}

/// Candidate headline strings in document order, unnormalized and unfiltered.
pub trait HeadlineExtractor: Send + Sync {
    fn extract(&self, raw: &str) -> Vec<String>;
}
