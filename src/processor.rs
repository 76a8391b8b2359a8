//! # Asset Processor
//! Per-asset orchestration: fetch → extract → filter/cap → dedup → score →
//! persist, then the windowed aggregate.
//!
//! Strictly sequential: one asset, one source, one candidate at a time. A
//! failing source contributes zero candidates and never aborts the run.

use chrono::Utc;
use metrics::counter;
use tracing::{debug, error, info, warn};

use crate::config::{AssetGroup, TrackerConfig};
use crate::dedup::{self, Novelty};
use crate::ingest::types::{HeadlineExtractor, SourceFetcher};
use crate::ingest::{ensure_metrics_described, select_headlines, HeadlineFilter};
use crate::report::{build_report, SentimentReport};
use crate::sentiment::{score, Classifier};
use crate::store::{AssetAggregate, AssetClass, ContentStore, HeadlineRecord, StoreError};

/// Counters for one (asset, source) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceOutcome {
    pub fetch_failed: bool,
    pub candidates: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub errors: usize,
}

impl SourceOutcome {
    fn failed() -> Self {
        Self {
            fetch_failed: true,
            ..Self::default()
        }
    }
}

pub struct AssetProcessor<'a> {
    config: &'a TrackerConfig,
    store: &'a ContentStore,
    fetcher: &'a dyn SourceFetcher,
    extractor: &'a dyn HeadlineExtractor,
    classifier: &'a dyn Classifier,
    filter: HeadlineFilter,
}

impl<'a> AssetProcessor<'a> {
    pub fn new(
        config: &'a TrackerConfig,
        store: &'a ContentStore,
        fetcher: &'a dyn SourceFetcher,
        extractor: &'a dyn HeadlineExtractor,
        classifier: &'a dyn Classifier,
    ) -> Self {
        ensure_metrics_described();
        let filter = HeadlineFilter::new(config.min_headline_chars, &config.blocklist);
        Self {
            config,
            store,
            fetcher,
            extractor,
            classifier,
            filter,
        }
    }

    /// Process every configured group (crypto, then traditional) and build
    /// the final report.
    pub async fn run(&self) -> Result<SentimentReport, StoreError> {
        let mut aggregates = Vec::new();
        for (class, group) in self.config.groups() {
            info!(asset_class = %class, assets = group.assets.len(), "processing asset group");
            aggregates.extend(self.process_group(class, group).await?);
        }
        Ok(build_report(aggregates, self.config.validity_window_hours))
    }

    pub async fn process_group(
        &self,
        class: AssetClass,
        group: &AssetGroup,
    ) -> Result<Vec<AssetAggregate>, StoreError> {
        let mut out = Vec::with_capacity(group.assets.len());
        for asset in &group.assets {
            out.push(self.process_asset(asset, class, &group.sources).await?);
        }
        Ok(out)
    }

    /// Ingest all sources for `asset`, then aggregate over the validity window.
    /// Only the final aggregate query can fail the asset.
    pub async fn process_asset(
        &self,
        asset: &str,
        class: AssetClass,
        sources: &[String],
    ) -> Result<AssetAggregate, StoreError> {
        info!(asset, "processing asset");
        let mut total = SourceOutcome::default();
        let mut failed_sources = 0usize;

        for source in sources {
            let o = self.ingest_source(asset, class, source).await;
            if o.fetch_failed {
                failed_sources += 1;
            }
            total.candidates += o.candidates;
            total.inserted += o.inserted;
            total.duplicates += o.duplicates;
            total.errors += o.errors;
        }

        let (mean_polarity, sample_count) = self
            .store
            .aggregate(asset, self.config.validity_window_hours)?;

        info!(
            asset,
            sources = sources.len(),
            failed_sources,
            candidates = total.candidates,
            inserted = total.inserted,
            duplicates = total.duplicates,
            errors = total.errors,
            sample_count,
            mean_polarity,
            "asset processed"
        );

        Ok(AssetAggregate {
            asset: asset.to_string(),
            asset_class: class,
            mean_polarity,
            sample_count,
        })
    }

    /// One (asset, source) pair. Never fails: every error is logged and
    /// counted, and the pair simply contributes fewer records.
    pub async fn ingest_source(&self, asset: &str, class: AssetClass, source: &str) -> SourceOutcome {
        // Plain concatenation; asset names are expected to be query-safe.
        let url = format!("{source}{asset}");
        debug!(asset, source, url = %url, "fetching source");

        let raw = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(asset, source, error = %e, "source unavailable; treating as zero candidates");
                return SourceOutcome::failed();
            }
        };

        let selected = select_headlines(
            self.extractor.extract(&raw),
            &self.filter,
            self.config.max_headlines_per_source,
        );
        if selected.is_empty() {
            info!(asset, source, "no valid headlines");
            return SourceOutcome::default();
        }

        let mut outcome = SourceOutcome {
            candidates: selected.len(),
            ..SourceOutcome::default()
        };
        counter!("ingest_candidates_total").increment(selected.len() as u64);

        for text in selected {
            let fp = match dedup::check(self.store, &text) {
                Ok(Novelty::Novel(fp)) => fp,
                Ok(Novelty::Seen(fp)) => {
                    debug!(asset, fingerprint = %fp, "already stored");
                    counter!("ingest_duplicates_total").increment(1);
                    outcome.duplicates += 1;
                    continue;
                }
                Err(e) => {
                    error!(asset, source, error = %e, "store lookup failed");
                    outcome.errors += 1;
                    continue;
                }
            };

            let label = match self.classifier.classify(&text).await {
                Ok(label) => label,
                Err(e) => {
                    warn!(asset, classifier = self.classifier.name(), error = %e, "classification failed; headline left for next run");
                    counter!("ingest_classify_errors_total").increment(1);
                    outcome.errors += 1;
                    continue;
                }
            };
            let polarity = score(&label);

            let record = HeadlineRecord {
                fingerprint: fp,
                observed_at: Utc::now(),
                asset: asset.to_string(),
                source: source.to_string(),
                text,
                polarity,
                asset_class: class,
            };

            match self.store.insert(&record) {
                Ok(()) => {
                    info!(asset, polarity, headline = %preview(&record.text, 50), "new headline");
                    counter!("ingest_inserted_total").increment(1);
                    outcome.inserted += 1;
                }
                Err(StoreError::Conflict(fp)) => {
                    debug!(asset, fingerprint = %fp, "concurrent duplicate discarded");
                    outcome.duplicates += 1;
                }
                Err(e) => {
                    error!(asset, source, error = %e, "insert failed");
                    outcome.errors += 1;
                }
            }
        }

        outcome
    }
}

fn preview(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
