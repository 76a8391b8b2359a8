// src/ingest/mod.rs
pub mod providers;
pub mod types;

use metrics::describe_counter;
use once_cell::sync::OnceCell;

/// One-time metrics registration so series carry descriptions.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_candidates_total",
            "Candidates kept after validity filter and per-source cap."
        );
        describe_counter!(
            "ingest_inserted_total",
            "New headline records written to the store."
        );
        describe_counter!(
            "ingest_duplicates_total",
            "Candidates skipped because their fingerprint was already stored."
        );
        describe_counter!(
            "ingest_fetch_errors_total",
            "Fetch failures, treated as zero candidates."
        );
        describe_counter!(
            "ingest_classify_errors_total",
            "Per-headline classification failures."
        );
    });
}

/// Normalize text: trim, then each newline becomes a single space.
pub fn normalize_text(s: &str) -> String {
    s.trim().replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Candidate filter applied after normalization.
#[derive(Debug, Clone)]
pub struct HeadlineFilter {
    pub min_chars: usize,
    /// Lower-cased boilerplate substrings.
    pub blocklist: Vec<String>,
}

impl HeadlineFilter {
    pub fn new(min_chars: usize, blocklist: &[String]) -> Self {
        Self {
            min_chars,
            blocklist: blocklist.iter().map(|b| b.to_lowercase()).collect(),
        }
    }

    /// Rejects short text and text containing any blocked substring
    /// (case-insensitive). Expects already normalized input.
    pub fn is_valid(&self, text: &str) -> bool {
        if text.chars().count() < self.min_chars {
            return false;
        }
        let lower = text.to_lowercase();
        !self.blocklist.iter().any(|b| lower.contains(b.as_str()))
    }
}

/// Normalize, filter, collapse identical texts, then keep the first `cap`
/// in extraction order.
pub fn select_headlines<I, S>(raw: I, filter: &HeadlineFilter, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<String> = Vec::with_capacity(cap);
    for r in raw {
        if kept.len() >= cap {
            break;
        }
        let text = normalize_text(r.as_ref());
        if !filter.is_valid(&text) || kept.contains(&text) {
            continue;
        }
        kept.push(text);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> HeadlineFilter {
        HeadlineFilter::new(20, &["subscribe".to_string(), "All Rights Reserved".to_string()])
    }

    #[test]
    fn normalize_trims_and_replaces_newlines() {
        assert_eq!(normalize_text("  Gold\nslips\r\nlower \n"), "Gold slips lower");
        assert_eq!(normalize_text("a\n\nb"), "a  b");
    }

    #[test]
    fn blocklist_is_case_insensitive() {
        let f = filter();
        assert!(!f.is_valid("2025 Example Media. ALL RIGHTS RESERVED."));
        assert!(f.is_valid("Ether options expiry looms over the market"));
    }

    #[test]
    fn duplicates_do_not_consume_cap_slots() {
        let f = filter();
        let raw = vec![
            "Bitcoin climbs as traders eye CPI print",
            "Bitcoin climbs as traders eye CPI print",
            "  Bitcoin climbs as traders eye CPI print\n",
            "Ethereum developers schedule next hard fork",
        ];
        let out = select_headlines(raw, &f, 2);
        assert_eq!(
            out,
            vec![
                "Bitcoin climbs as traders eye CPI print".to_string(),
                "Ethereum developers schedule next hard fork".to_string(),
            ]
        );
    }
}
