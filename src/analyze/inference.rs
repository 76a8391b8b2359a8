//! Hosted FinBERT classifier (text-classification inference endpoint).
//!
//! Response shape: `[[{"label": "positive", "score": 0.93}, ...]]`; the
//! top-scoring label wins. Input is truncated to `max_input_chars`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ClassifierConfig;
use crate::sentiment::Classifier;

const PROBE_TEXT: &str = "Stocks edge higher as investors weigh central bank comments.";

pub struct InferenceClassifier {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    max_input_chars: usize,
}

#[derive(Debug, Serialize)]
struct Req<'a> {
    inputs: &'a str,
    options: ReqOptions,
}

#[derive(Debug, Serialize)]
struct ReqOptions {
    wait_for_model: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Resp {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceClassifier {
    /// Build the client; fails when the API token is not set.
    pub fn from_config(cfg: &ClassifierConfig) -> Result<Self> {
        let token = std::env::var(&cfg.token_env)
            .map_err(|_| anyhow!("Missing {} env var for inference classifier", cfg.token_env))?;
        anyhow::ensure!(!token.trim().is_empty(), "{} is empty", cfg.token_env);

        let http = reqwest::Client::builder()
            .user_agent(concat!("market-sentiment-tracker/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building inference http client")?;

        Ok(Self {
            http,
            endpoint: cfg.endpoint.clone(),
            token,
            max_input_chars: cfg.max_input_chars.max(1),
        })
    }

    /// One round-trip at start-up so a broken endpoint fails the run early.
    pub async fn probe(&self) -> Result<()> {
        let label = self.classify(PROBE_TEXT).await.context("inference probe")?;
        info!(endpoint = %self.endpoint, label = %label, "inference classifier ready");
        Ok(())
    }
}

#[async_trait]
impl Classifier for InferenceClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        let input = truncate_chars(text, self.max_input_chars);
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&Req {
                inputs: input,
                options: ReqOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await
            .context("inference request")?
            .error_for_status()
            .context("inference status")?;

        let body: Resp = resp.json().await.context("inference response json")?;
        let label = top_label(body).ok_or_else(|| anyhow!("inference returned no labels"))?;
        debug!(label = %label, "inference label");
        Ok(label)
    }

    fn name(&self) -> &'static str {
        "inference"
    }
}

fn top_label(resp: Resp) -> Option<String> {
    let scores = match resp {
        Resp::Batched(mut v) => {
            if v.is_empty() {
                return None;
            }
            v.swap_remove(0)
        }
        Resp::Flat(v) => v,
    };
    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|ls| ls.label.to_lowercase())
}

/// Cut at a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
