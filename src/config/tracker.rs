// src/config/tracker.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::AssetClass;

pub const ENV_CONFIG_PATH: &str = "MARKET_SENTIMENT_CONFIG";
pub const DEFAULT_TOML_PATH: &str = "config/market_sentiment.toml";
pub const DEFAULT_JSON_PATH: &str = "config/market_sentiment.json";

const DEFAULT_BLOCKLIST: &[&str] = &[
    "policy",
    "terms",
    "privacy",
    "copyright",
    "subscribe",
    "login",
    "sign up",
    "contact",
    "advertisement",
    "cookies",
    "all rights reserved",
    "jobs",
    "career",
];

fn default_window_hours() -> u32 {
    24 * 5
}
fn default_db_path() -> PathBuf {
    PathBuf::from("market_sentiment.db")
}
fn default_cap() -> usize {
    7
}
fn default_min_chars() -> usize {
    20
}
fn default_blocklist() -> Vec<String> {
    DEFAULT_BLOCKLIST.iter().map(|s| s.to_string()).collect()
}

/// Everything the run needs, loaded once at start-up and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_window_hours")]
    pub validity_window_hours: u32,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_cap")]
    pub max_headlines_per_source: usize,
    #[serde(default = "default_min_chars")]
    pub min_headline_chars: usize,
    /// Case-insensitive boilerplate substrings; stored lower-cased.
    #[serde(default = "default_blocklist")]
    pub blocklist: Vec<String>,
    #[serde(default = "AssetGroup::default_crypto")]
    pub crypto: AssetGroup,
    #[serde(default = "AssetGroup::default_traditional")]
    pub traditional: AssetGroup,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            validity_window_hours: default_window_hours(),
            db_path: default_db_path(),
            max_headlines_per_source: default_cap(),
            min_headline_chars: default_min_chars(),
            blocklist: default_blocklist(),
            crypto: AssetGroup::default_crypto(),
            traditional: AssetGroup::default_traditional(),
            http: HttpConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Assets of one class and the search endpoints queried for each of them.
/// The asset name is appended verbatim to every source template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetGroup {
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl AssetGroup {
    pub fn default_crypto() -> Self {
        Self {
            assets: ["Bitcoin", "Ethereum", "Solana", "Cardano", "Tron"]
                .map(String::from)
                .to_vec(),
            sources: vec![
                "https://cointelegraph.com/search?query=".into(),
                "https://www.coindesk.com/search?s=".into(),
            ],
        }
    }

    pub fn default_traditional() -> Self {
        Self {
            assets: [
                "S&P 500",
                "Gold",
                "Nasdaq",
                "MSCI Emerging Markets",
                "MSCI World",
                "Dow",
                "EUR/USD",
                "GBP/USD",
                "USD/JPY",
            ]
            .map(String::from)
            .to_vec(),
            sources: vec![
                "https://www.marketwatch.com/search?q=".into(),
                "https://news.search.yahoo.com/search?p=".into(),
            ],
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_min_delay_ms() -> u64 {
    3_000
}
fn default_max_delay_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Politeness delay before every fetch is drawn uniformly from
    /// `[min_delay_ms, max_delay_ms]`.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    #[default]
    Lexicon,
    Inference,
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models/ProsusAI/finbert".to_string()
}
fn default_token_env() -> String {
    "HF_API_TOKEN".to_string()
}
fn default_max_input_chars() -> usize {
    512
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub kind: ClassifierKind,
    /// Lexicon JSON to use instead of the embedded one.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the env var holding the inference API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::default(),
            lexicon_path: None,
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl TrackerConfig {
    /// Asset groups in processing order: crypto first, then traditional.
    pub fn groups(&self) -> [(AssetClass, &AssetGroup); 2] {
        [
            (AssetClass::Crypto, &self.crypto),
            (AssetClass::Stock, &self.traditional),
        ]
    }

    /// Clean lists and reject values the pipeline cannot run with.
    pub fn sanitize(mut self) -> Result<Self> {
        if self.validity_window_hours == 0 {
            bail!("validity_window_hours must be > 0");
        }
        if self.max_headlines_per_source == 0 {
            bail!("max_headlines_per_source must be > 0");
        }
        if self.http.min_delay_ms > self.http.max_delay_ms {
            std::mem::swap(&mut self.http.min_delay_ms, &mut self.http.max_delay_ms);
        }
        self.blocklist = clean_list(self.blocklist.iter().map(|s| s.to_lowercase()));
        self.crypto.assets = clean_list(self.crypto.assets);
        self.traditional.assets = clean_list(self.traditional.assets);
        self.crypto.sources = clean_list(self.crypto.sources);
        self.traditional.sources = clean_list(self.traditional.sources);
        Ok(self)
    }
}

/// Load from an explicit path. TOML or JSON, picked by extension.
pub fn load_config_from(path: &Path) -> Result<TrackerConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg = match ext.as_str() {
        "json" => serde_json::from_str::<TrackerConfig>(&content)
            .with_context(|| format!("parsing {}", path.display()))?,
        _ => toml::from_str::<TrackerConfig>(&content)
            .with_context(|| format!("parsing {}", path.display()))?,
    };
    cfg.sanitize()
}

/// Load using env var + fallbacks:
/// 1) $MARKET_SENTIMENT_CONFIG
/// 2) config/market_sentiment.toml
/// 3) config/market_sentiment.json
/// 4) built-in defaults
pub fn load_config_default() -> Result<TrackerConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_JSON_PATH);
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    TrackerConfig::default().sanitize()
}

/// Trim, drop empties, dedup while keeping first-seen order.
fn clean_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for it in items {
        let t = it.as_ref().trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = TrackerConfig::default().sanitize().unwrap();
        assert_eq!(cfg.validity_window_hours, 120);
        assert_eq!(cfg.max_headlines_per_source, 7);
        assert_eq!(cfg.min_headline_chars, 20);
        assert_eq!(cfg.blocklist.len(), 13);
        assert_eq!(cfg.crypto.assets.len(), 5);
        assert_eq!(cfg.traditional.assets.len(), 9);
        assert_eq!(cfg.classifier.kind, ClassifierKind::Lexicon);
    }

    #[test]
    fn sanitize_cleans_lists_and_swaps_delay_bounds() {
        let mut cfg = TrackerConfig::default();
        cfg.blocklist = vec![" Promo ".into(), "promo".into(), "".into()];
        cfg.crypto.assets = vec!["Bitcoin".into(), " Bitcoin ".into()];
        cfg.http.min_delay_ms = 900;
        cfg.http.max_delay_ms = 100;
        let cfg = cfg.sanitize().unwrap();
        assert_eq!(cfg.blocklist, vec!["promo".to_string()]);
        assert_eq!(cfg.crypto.assets, vec!["Bitcoin".to_string()]);
        assert_eq!((cfg.http.min_delay_ms, cfg.http.max_delay_ms), (100, 900));
    }

    #[test]
    fn zero_window_is_rejected() {
        let cfg = TrackerConfig {
            validity_window_hours: 0,
            ..TrackerConfig::default()
        };
        assert!(cfg.sanitize().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: TrackerConfig = toml::from_str(
            r#"
validity_window_hours = 24

[crypto]
assets = ["Bitcoin"]
sources = ["https://example.test/q="]
"#,
        )
        .unwrap();
        assert_eq!(cfg.validity_window_hours, 24);
        assert_eq!(cfg.crypto.assets, vec!["Bitcoin".to_string()]);
        assert_eq!(cfg.traditional, AssetGroup::default_traditional());
        assert_eq!(cfg.http.timeout_secs, 10);
    }
}
