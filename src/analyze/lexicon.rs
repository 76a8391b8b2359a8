//! Word-lexicon classifier: sums per-word scores with a short negation window.
//!
//! Sum > 0 → `positive`, sum < 0 → `negative`, otherwise `neutral`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::sentiment::{Classifier, SentimentLabel};

const EMBEDDED_LEXICON: &str = include_str!("../../sentiment_lexicon.json");

#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    lexicon: HashMap<String, i32>,
}

impl LexiconClassifier {
    /// Lexicon shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_LEXICON).context("parsing embedded sentiment lexicon")
    }

    /// Load a `{ "word": score }` JSON lexicon from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing lexicon {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, i32> = serde_json::from_str(raw)?;
        let lexicon = parsed
            .into_iter()
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v))
            .filter(|(k, _)| !k.is_empty())
            .collect::<HashMap<_, _>>();
        anyhow::ensure!(!lexicon.is_empty(), "sentiment lexicon is empty");
        Ok(Self { lexicon })
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *self.lexicon.get(w).unwrap_or(&0)
    }

    /// Returns (score, token count). A negator in the previous 1..=3 tokens
    /// flips the sign of the word's score.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        (score, tokens.len())
    }

    pub fn label_for(&self, text: &str) -> SentimentLabel {
        match self.score_text(text).0 {
            s if s > 0 => SentimentLabel::Positive,
            s if s < 0 => SentimentLabel::Negative,
            _ => SentimentLabel::Neutral,
        }
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        Ok(self.label_for(text).as_str().to_string())
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric tokens plus apostrophes, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
            | "fails"
            | "failed"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clf() -> LexiconClassifier {
        LexiconClassifier::embedded().unwrap()
    }

    #[test]
    fn embedded_lexicon_loads() {
        assert!(!clf().lexicon.is_empty());
    }

    #[test]
    fn bullish_and_bearish_headlines() {
        let c = clf();
        assert_eq!(
            c.label_for("Bitcoin surges to record high as ETF inflows climb"),
            SentimentLabel::Positive
        );
        assert_eq!(
            c.label_for("Solana tumbles after exchange hack sparks selloff"),
            SentimentLabel::Negative
        );
        assert_eq!(
            c.label_for("Fed minutes due on Wednesday afternoon"),
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn negation_flips_sign() {
        let c = clf();
        let (plain, _) = c.score_text("shares rally");
        let (negated, _) = c.score_text("shares did not rally");
        assert!(plain > 0);
        assert!(negated < 0);
    }

    #[test]
    fn empty_lexicon_is_rejected() {
        assert!(LexiconClassifier::from_json("{}").is_err());
        assert!(LexiconClassifier::from_json("not json").is_err());
    }

    #[tokio::test]
    async fn classify_returns_plain_label() {
        let out = clf().classify("Gold prices plunge").await.unwrap();
        assert_eq!(out, "negative");
    }
}
