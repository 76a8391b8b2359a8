//! # Scoring Adapter
//! Maps a classifier's categorical label to a numeric polarity, plus the
//! `Classifier` contract the pipeline consumes.

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const POSITIVE: f64 = 1.0;
pub const NEUTRAL: f64 = 0.0;
pub const NEGATIVE: f64 = -1.0;

/// Closed set of labels the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Total: anything other than `positive`/`negative` is neutral.
    pub fn from_label(label: &str) -> Self {
        match label {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    pub fn polarity(&self) -> f64 {
        match self {
            SentimentLabel::Positive => POSITIVE,
            SentimentLabel::Neutral => NEUTRAL,
            SentimentLabel::Negative => NEGATIVE,
        }
    }
}

/// Polarity for a raw classifier label. Never fails.
pub fn score(label: &str) -> f64 {
    SentimentLabel::from_label(label).polarity()
}

/// Text → label. Implementations truncate over-length input themselves.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}
