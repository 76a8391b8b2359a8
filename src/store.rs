//! # Content Store
//! Durable, insert-only table of classified headlines keyed by fingerprint.
//!
//! Backed by a single SQLite file. Records are never updated or deleted; the
//! validity window is applied at query time only, so re-running against the
//! same file is idempotent for already-seen text.

use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, ErrorCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::dedup::Fingerprint;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS headlines (
        fingerprint TEXT PRIMARY KEY,
        observed_at INTEGER NOT NULL,
        asset       TEXT NOT NULL,
        source      TEXT NOT NULL,
        text        TEXT NOT NULL,
        polarity    REAL NOT NULL,
        asset_class TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_headlines_asset_time ON headlines(asset, observed_at);
";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this fingerprint already exists; the existing row is kept.
    #[error("headline {0} already stored")]
    Conflict(Fingerprint),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("stored timestamp {0} is out of range")]
    CorruptTimestamp(i64),
}

/// Coarse asset grouping attached to each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetClass {
    Crypto,
    Stock,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "CRYPTO",
            AssetClass::Stock => "STOCK",
        }
    }

    fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("CRYPTO") {
            AssetClass::Crypto
        } else {
            AssetClass::Stock
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted unit. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineRecord {
    pub fingerprint: Fingerprint,
    pub observed_at: DateTime<Utc>,
    pub asset: String,
    pub source: String,
    pub text: String,
    pub polarity: f64,
    pub asset_class: AssetClass,
}

/// Windowed mean for one asset, recomputed on every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAggregate {
    pub asset: String,
    pub asset_class: AssetClass,
    pub mean_polarity: f64,
    pub sample_count: u64,
}

/// SQLite-backed headline table. One connection is held for the whole run.
#[derive(Debug)]
pub struct ContentStore {
    conn: Mutex<Connection>,
}

impl ContentStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "content store opened");
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Ephemeral store, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create the table and index if absent. Safe to call on every run.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("content store mutex poisoned");
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// True iff a record with this fingerprint has ever been inserted.
    pub fn exists(&self, fp: &Fingerprint) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("content store mutex poisoned");
        let mut stmt = conn.prepare_cached("SELECT 1 FROM headlines WHERE fingerprint = ?1")?;
        Ok(stmt.exists(params![fp.as_str()])?)
    }

    /// Insert a new record. Fails with [`StoreError::Conflict`] if the
    /// fingerprint is already present; the stored row is never overwritten.
    pub fn insert(&self, record: &HeadlineRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock().expect("content store mutex poisoned");
        let res = conn.execute(
            "INSERT INTO headlines (fingerprint, observed_at, asset, source, text, polarity, asset_class)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.fingerprint.as_str(),
                record.observed_at.timestamp(),
                record.asset,
                record.source,
                record.text,
                record.polarity,
                record.asset_class.as_str(),
            ],
        );
        match res {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Conflict(record.fingerprint.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic insert-if-absent. Returns whether the row was written.
    ///
    /// Check-then-insert (`exists` + `insert`) is only race-free while a
    /// single worker owns the store; concurrent ingestion must use this.
    pub fn insert_if_absent(&self, record: &HeadlineRecord) -> Result<bool, StoreError> {
        let conn = self.conn.lock().expect("content store mutex poisoned");
        let changed = conn.execute(
            "INSERT OR IGNORE INTO headlines (fingerprint, observed_at, asset, source, text, polarity, asset_class)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.fingerprint.as_str(),
                record.observed_at.timestamp(),
                record.asset,
                record.source,
                record.text,
                record.polarity,
                record.asset_class.as_str(),
            ],
        )?;
        Ok(changed == 1)
    }

    /// Mean polarity and sample count for `asset` over the trailing window.
    pub fn aggregate(&self, asset: &str, window_hours: u32) -> Result<(f64, u64), StoreError> {
        self.aggregate_at(asset, window_hours, Utc::now())
    }

    /// Same as [`aggregate`](Self::aggregate) with an explicit `now`.
    /// Boundary: `observed_at >= now - window_hours` is included.
    pub fn aggregate_at(
        &self,
        asset: &str,
        window_hours: u32,
        now: DateTime<Utc>,
    ) -> Result<(f64, u64), StoreError> {
        let cutoff = (now - Duration::hours(i64::from(window_hours))).timestamp();
        let conn = self.conn.lock().expect("content store mutex poisoned");
        let (mean, count): (Option<f64>, i64) = conn.query_row(
            "SELECT AVG(polarity), COUNT(*) FROM headlines WHERE asset = ?1 AND observed_at >= ?2",
            params![asset, cutoff],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        debug!(asset, window_hours, cutoff, count, "aggregate computed");
        match mean {
            Some(m) if count > 0 => Ok((m, count as u64)),
            _ => Ok((0.0, 0)),
        }
    }

    /// Total number of stored records.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().expect("content store mutex poisoned");
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM headlines", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// All records attributed to `asset`, oldest first.
    pub fn records_for(&self, asset: &str) -> Result<Vec<HeadlineRecord>, StoreError> {
        let conn = self.conn.lock().expect("content store mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT fingerprint, observed_at, asset, source, text, polarity, asset_class
             FROM headlines WHERE asset = ?1 ORDER BY observed_at, fingerprint",
        )?;
        let rows = stmt.query_map(params![asset], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (fp, ts, asset, source, text, polarity, class) = row?;
            let observed_at =
                DateTime::from_timestamp(ts, 0).ok_or(StoreError::CorruptTimestamp(ts))?;
            out.push(HeadlineRecord {
                fingerprint: Fingerprint::from_hex(fp),
                observed_at,
                asset,
                source,
                text,
                polarity,
                asset_class: AssetClass::parse(&class),
            });
        }
        Ok(out)
    }

    /// Release the connection. Dropping the store does the same on early exit.
    pub fn close(self) -> Result<(), StoreError> {
        let conn = self
            .conn
            .into_inner()
            .expect("content store mutex poisoned");
        conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::fingerprint;

    fn record(text: &str, asset: &str, at: DateTime<Utc>, polarity: f64) -> HeadlineRecord {
        HeadlineRecord {
            fingerprint: fingerprint(text),
            observed_at: at,
            asset: asset.into(),
            source: "https://example.test/search?q=".into(),
            text: text.into(),
            polarity,
            asset_class: AssetClass::Crypto,
        }
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = ContentStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store.initialize().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn duplicate_insert_is_rejected_and_first_record_kept() {
        let store = ContentStore::open_in_memory().unwrap();
        let now = Utc::now();
        let first = record("Bitcoin rallies past resistance level", "Bitcoin", now, 1.0);
        store.insert(&first).unwrap();

        let mut second = first.clone();
        second.polarity = -1.0;
        second.asset = "Ethereum".into();
        let err = store.insert(&second).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref fp) if *fp == first.fingerprint));

        let kept = store.records_for("Bitcoin").unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].polarity, 1.0);
        assert!(store.records_for("Ethereum").unwrap().is_empty());
    }

    #[test]
    fn insert_if_absent_reports_whether_written() {
        let store = ContentStore::open_in_memory().unwrap();
        let r = record("Solana network upgrade goes live today", "Solana", Utc::now(), 0.0);
        assert!(store.insert_if_absent(&r).unwrap());
        assert!(!store.insert_if_absent(&r).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn aggregate_is_scoped_to_asset() {
        let store = ContentStore::open_in_memory().unwrap();
        let now = Utc::now();
        store
            .insert(&record("Bitcoin miners post record quarterly revenue", "Bitcoin", now, 1.0))
            .unwrap();
        store
            .insert(&record("Ethereum fees collapse after network upgrade", "Ethereum", now, -1.0))
            .unwrap();
        assert_eq!(store.aggregate_at("Bitcoin", 24, now).unwrap(), (1.0, 1));
        assert_eq!(store.aggregate_at("Cardano", 24, now).unwrap(), (0.0, 0));
    }
}
