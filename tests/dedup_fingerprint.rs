// tests/dedup_fingerprint.rs
use std::collections::HashSet;

use chrono::Utc;
use market_sentiment_tracker::dedup::{check, Novelty};
use market_sentiment_tracker::{fingerprint, AssetClass, ContentStore, HeadlineRecord};

#[test]
fn same_text_same_fingerprint() {
    let t = "Cardano founder outlines roadmap for next upgrade";
    assert_eq!(fingerprint(t), fingerprint(t));
}

#[test]
fn distinct_texts_distinct_fingerprints() {
    let texts = [
        "Tron volumes climb on stablecoin transfers",
        "Tron volumes climb on stablecoin transfers.",
        "tron volumes climb on stablecoin transfers",
        "Tron volumes  climb on stablecoin transfers",
        "Tron volume climbs on stablecoin transfers",
    ];
    let fps: HashSet<_> = texts.iter().map(|t| fingerprint(t)).collect();
    assert_eq!(fps.len(), texts.len());
}

#[test]
fn check_flips_from_novel_to_seen_after_insert() {
    let store = ContentStore::open_in_memory().unwrap();
    let text = "MSCI World index closes at all-time high";

    let first = check(&store, text).unwrap();
    assert!(first.is_novel());

    store
        .insert(&HeadlineRecord {
            fingerprint: first.fingerprint().clone(),
            observed_at: Utc::now(),
            asset: "MSCI World".into(),
            source: "https://example.test/q=".into(),
            text: text.into(),
            polarity: 1.0,
            asset_class: AssetClass::Stock,
        })
        .unwrap();

    // Raw (untrimmed, multi-line) form maps to the same stored record.
    let again = check(&store, "\n MSCI World index closes at all-time high \n").unwrap();
    assert_eq!(again, Novelty::Seen(first.fingerprint().clone()));
}
