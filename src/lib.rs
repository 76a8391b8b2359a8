// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod dedup;
pub mod processor;
pub mod report;
pub mod sentiment;
pub mod store;

// Concrete classifiers (lexicon, hosted FinBERT) + factory
pub mod analyze;

// Candidate normalization/filtering and the Fetcher/Extractor collaborators
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::config::TrackerConfig;
pub use crate::dedup::{fingerprint, Fingerprint};
pub use crate::processor::AssetProcessor;
pub use crate::report::{build_report, Classification, SentimentReport};
pub use crate::sentiment::{score, Classifier};
pub use crate::store::{AssetAggregate, AssetClass, ContentStore, HeadlineRecord, StoreError};
