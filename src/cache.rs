// Time-bounded cache for the last table snapshot fetched from the spreadsheet.
// Freshness is checked on read; there is no background expiry.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tables::TableSet;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 600 }
    }
}

// The persisted blob: the table set plus when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSnapshot {
    pub data: TableSet,
    // Unix milliseconds
    pub timestamp: i64,
}

impl CachedSnapshot {
    pub fn is_expired(&self, now: DateTime<Utc>, ttl_seconds: u64) -> bool {
        let ttl_millis = i64::try_from(ttl_seconds)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        now.timestamp_millis().saturating_sub(self.timestamp) > ttl_millis
    }
}

#[derive(Debug, Default)]
pub struct CacheStats {
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub expired_count: AtomicUsize,
    pub write_count: AtomicUsize,
    pub error_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheStatsReport {
    pub hit_count: usize,
    pub miss_count: usize,
    pub expired_count: usize,
    pub write_count: usize,
    pub error_count: usize,
}

// Where the single cached blob lives.
pub trait CacheStore: Send + Sync + 'static {
    fn load(&self) -> Result<Option<CachedSnapshot>, CacheError>;

    fn save(&self, entry: &CachedSnapshot) -> Result<(), CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<CachedSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self) -> Result<Option<CachedSnapshot>, CacheError> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, entry: &CachedSnapshot) -> Result<(), CacheError> {
        *self.slot.lock() = Some(entry.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.slot.lock().take();
        Ok(())
    }
}

// JSON file on disk, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStore for FileStore {
    fn load(&self) -> Result<Option<CachedSnapshot>, CacheError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, entry: &CachedSnapshot) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(entry)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct SnapshotCache {
    store: Box<dyn CacheStore>,
    config: CacheConfig,
    stats: CacheStats,
}

impl SnapshotCache {
    pub fn new(store: impl CacheStore, config: CacheConfig) -> Self {
        Self {
            store: Box::new(store),
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(MemoryStore::new(), config)
    }

    pub fn on_disk(path: impl Into<PathBuf>, config: CacheConfig) -> Self {
        Self::new(FileStore::new(path), config)
    }

    pub fn get(&self) -> Option<TableSet> {
        self.get_at(Utc::now())
    }

    /// Cached tables if still fresh at `now`. Expired or unreadable blobs
    /// are discarded.
    pub fn get_at(&self, now: DateTime<Utc>) -> Option<TableSet> {
        let entry = match self.store.load() {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
                return None;
            }
            Err(e) => {
                warn!("Discarding unreadable table cache: {}", e);
                self.stats.error_count.fetch_add(1, Ordering::SeqCst);
                self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
                self.discard();
                return None;
            }
        };

        if entry.is_expired(now, self.config.ttl_seconds) {
            debug!("Table cache expired (fetched at {} ms)", entry.timestamp);
            self.stats.expired_count.fetch_add(1, Ordering::SeqCst);
            self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
            self.discard();
            return None;
        }

        self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
        Some(entry.data)
    }

    pub fn put(&self, tables: &TableSet) -> bool {
        self.put_at(tables, Utc::now())
    }

    /// Store a snapshot stamped with `fetched_at`. Returns false if the
    /// store rejected it.
    pub fn put_at(&self, tables: &TableSet, fetched_at: DateTime<Utc>) -> bool {
        let entry = CachedSnapshot {
            data: tables.clone(),
            timestamp: fetched_at.timestamp_millis(),
        };
        match self.store.save(&entry) {
            Ok(()) => {
                self.stats.write_count.fetch_add(1, Ordering::SeqCst);
                true
            }
            Err(e) => {
                warn!("Cache failed: {}", e);
                self.stats.error_count.fetch_add(1, Ordering::SeqCst);
                false
            }
        }
    }

    pub fn invalidate(&self) {
        self.discard();
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            expired_count: self.stats.expired_count.load(Ordering::SeqCst),
            write_count: self.stats.write_count.load(Ordering::SeqCst),
            error_count: self.stats.error_count.load(Ordering::SeqCst),
        }
    }

    fn discard(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear table cache: {}", e);
            self.stats.error_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
