// src/ingest/providers/http.rs
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use rand::Rng;

use crate::config::HttpConfig;
use crate::ingest::types::{FetchError, SourceFetcher};

/// reqwest-backed fetcher with a randomized politeness delay before each
/// request. The delay blocks the (sequential) pipeline on purpose.
pub struct HttpFetcher {
    client: reqwest::Client,
    min_delay: Duration,
    max_delay: Duration,
}

impl HttpFetcher {
    pub fn from_config(cfg: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building http client")?;
        let (lo, hi) = if cfg.min_delay_ms <= cfg.max_delay_ms {
            (cfg.min_delay_ms, cfg.max_delay_ms)
        } else {
            (cfg.max_delay_ms, cfg.min_delay_ms)
        };
        Ok(Self {
            client,
            min_delay: Duration::from_millis(lo),
            max_delay: Duration::from_millis(hi),
        })
    }

    fn politeness_delay(&self) -> Duration {
        let lo = self.min_delay.as_millis() as u64;
        let hi = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let wait = self.politeness_delay();
        tracing::debug!(wait_ms = wait.as_millis() as u64, url, "politeness delay");
        tokio::time::sleep(wait).await;

        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, url, "http error");
                counter!("ingest_fetch_errors_total").increment(1);
                return Err(e.into());
            }
        };
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url, "non-success status");
            counter!("ingest_fetch_errors_total").increment(1);
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_stays_within_bounds() {
        let cfg = HttpConfig {
            min_delay_ms: 10,
            max_delay_ms: 20,
            ..HttpConfig::default()
        };
        let f = HttpFetcher::from_config(&cfg).unwrap();
        for _ in 0..50 {
            let d = f.politeness_delay();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error_not_a_panic() {
        let cfg = HttpConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            timeout_secs: 2,
            ..HttpConfig::default()
        };
        let f = HttpFetcher::from_config(&cfg).unwrap();
        let res = f.fetch("http://127.0.0.1:9/search?q=Bitcoin").await;
        assert!(res.is_err());
    }
}
