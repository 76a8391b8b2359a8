//! # Deduplicator
//! Stable fingerprint for a headline and the novelty check against the store.
//!
//! Two headlines are the same iff their normalized text is byte-identical.
//! No fuzzy or near-duplicate matching: a rephrased headline is a new one.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ingest::normalize_text;
use crate::store::{ContentStore, StoreError};

/// Hex-encoded SHA-256 of the normalized headline text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an already computed digest (e.g. read back from the store).
    pub(crate) fn from_hex(hex: String) -> Self {
        Self(hex)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint of `text` after normalization; raw and normalized forms agree.
pub fn fingerprint(text: &str) -> Fingerprint {
    let normalized = normalize_text(text);
    let digest = Sha256::digest(normalized.as_bytes());
    Fingerprint(format!("{digest:x}"))
}

/// Outcome of consulting the store for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Novelty {
    /// Never stored before; must be scored and inserted.
    Novel(Fingerprint),
    /// Already stored by an earlier run, source or asset.
    Seen(Fingerprint),
}

impl Novelty {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            Novelty::Novel(fp) | Novelty::Seen(fp) => fp,
        }
    }

    pub fn is_novel(&self) -> bool {
        matches!(self, Novelty::Novel(_))
    }
}

/// Fingerprint `text` and decide whether the store has seen it.
pub fn check(store: &ContentStore, text: &str) -> Result<Novelty, StoreError> {
    let fp = fingerprint(text);
    if store.exists(&fp)? {
        Ok(Novelty::Seen(fp))
    } else {
        Ok(Novelty::Novel(fp))
    }
}
