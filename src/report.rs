//! # Report Aggregator
//! Pure mapping from per-asset aggregates to POSITIVE / NEUTRAL / NEGATIVE,
//! plus the plain-text table printed at the end of a run.
//!
//! Assets without samples in the window are reported as "no data" and never
//! classified.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{AssetAggregate, AssetClass};

/// Mean above this is POSITIVE.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Mean below this is NEGATIVE.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Positive,
    Neutral,
    Negative,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Positive => "POSITIVE",
            Classification::Neutral => "NEUTRAL",
            Classification::Negative => "NEGATIVE",
        }
    }
}

/// Strict thresholds: exactly ±0.2 stays NEUTRAL.
pub fn classify(mean_polarity: f64) -> Classification {
    if mean_polarity > POSITIVE_THRESHOLD {
        Classification::Positive
    } else if mean_polarity < NEGATIVE_THRESHOLD {
        Classification::Negative
    } else {
        Classification::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub asset: String,
    pub asset_class: AssetClass,
    pub sample_count: u64,
    pub mean_polarity: f64,
    /// `None` when the asset has no samples in the window.
    pub classification: Option<Classification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub window_hours: u32,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
}

/// Rows keep the order in which assets were processed.
pub fn build_report(aggregates: Vec<AssetAggregate>, window_hours: u32) -> SentimentReport {
    let rows = aggregates
        .into_iter()
        .map(|a| ReportRow {
            classification: (a.sample_count > 0).then(|| classify(a.mean_polarity)),
            asset: a.asset,
            asset_class: a.asset_class,
            sample_count: a.sample_count,
            mean_polarity: a.mean_polarity,
        })
        .collect();
    SentimentReport {
        window_hours,
        generated_at: Utc::now(),
        rows,
    }
}

impl SentimentReport {
    pub fn has_data(&self) -> bool {
        self.rows.iter().any(|r| r.sample_count > 0)
    }

    pub fn row(&self, asset: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.asset == asset)
    }

    /// Human-readable table; a single notice when nothing is in the window.
    pub fn render_table(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "SENTIMENT REPORT (last {} hours)", self.window_hours);
        let _ = writeln!(out, "{rule}");

        if !self.has_data() {
            let _ = writeln!(out, "No recent headlines found in the store.");
            let _ = writeln!(out, "Try again later or check connectivity to the sources.");
            let _ = writeln!(out, "{rule}");
            return out;
        }

        let _ = writeln!(
            out,
            "{:<22} | {:<6} | {:<7} | SENTIMENT",
            "ASSET", "CLASS", "SAMPLES"
        );
        let _ = writeln!(out, "{}", "-".repeat(60));
        for r in &self.rows {
            match r.classification {
                Some(c) => {
                    let _ = writeln!(
                        out,
                        "{:<22} | {:<6} | {:<7} | {:>7.4} ({})",
                        r.asset,
                        r.asset_class.as_str(),
                        r.sample_count,
                        r.mean_polarity,
                        c.as_str()
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "{:<22} | {:<6} | {:<7} | ---",
                        r.asset,
                        r.asset_class.as_str(),
                        0
                    );
                }
            }
        }
        let _ = writeln!(out, "{rule}");
        out
    }
}
