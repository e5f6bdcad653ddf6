// Session loader: decides where the table snapshot for a session comes from.
//
// Order: built-in dataset when unconfigured, then the cache, then the
// spreadsheet. A failed fetch still yields a usable snapshot plus a warning.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::SnapshotCache;
use crate::defaults::default_tables;
use crate::sheets::{fetch_all, GoogleSheetsSource, SheetsConfig, SourceError, TableSource};
use crate::tables::TableSet;

pub const FETCH_FAILED_MESSAGE: &str =
    "Erro ao conectar com Google Sheets. Verifique a configuração.";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// No spreadsheet configured, built-in dataset in use.
    Fallback,
    Cached,
    Fresh,
    /// Fetch failed; the built-in dataset is in use and the message should
    /// be shown as a banner.
    Degraded(String),
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Fallback => write!(f, "fallback"),
            LoadStatus::Cached => write!(f, "cached"),
            LoadStatus::Fresh => write!(f, "fresh"),
            LoadStatus::Degraded(message) => write!(f, "degraded: {}", message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub tables: Arc<TableSet>,
    pub status: LoadStatus,
}

impl LoadOutcome {
    /// Banner text, if any.
    pub fn warning(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Degraded(message) => Some(message),
            _ => None,
        }
    }
}

pub struct TableLoader {
    source: Option<Box<dyn TableSource>>,
    cache: SnapshotCache,
}

impl TableLoader {
    pub fn new(source: Option<Box<dyn TableSource>>, cache: SnapshotCache) -> Self {
        Self { source, cache }
    }

    /// Loader over the configured spreadsheet; without a sheet id it only
    /// ever serves the built-in dataset.
    pub fn from_config(config: SheetsConfig, cache: SnapshotCache) -> Self {
        let source = match GoogleSheetsSource::new(config) {
            Ok(source) => Some(Box::new(source) as Box<dyn TableSource>),
            Err(SourceError::NotConfigured) => None,
            Err(e) => {
                warn!("Spreadsheet source unavailable: {}", e);
                None
            }
        };
        Self::new(source, cache)
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    pub async fn load(&self) -> LoadOutcome {
        let source = match &self.source {
            Some(source) => source.as_ref(),
            None => {
                info!("No spreadsheet configured, using built-in dataset");
                return LoadOutcome {
                    tables: Arc::new(default_tables()),
                    status: LoadStatus::Fallback,
                };
            }
        };

        if let Some(tables) = self.cache.get() {
            info!("Using cached tables");
            return LoadOutcome {
                tables: Arc::new(tables),
                status: LoadStatus::Cached,
            };
        }

        match fetch_all(source).await {
            Ok(tables) => {
                info!(
                    "Loaded tables: {} calendar, {} pricing, {} beds, {} suites rows",
                    tables.calendar.len(),
                    tables.pricing.len(),
                    tables.beds.len(),
                    tables.suites.len()
                );
                self.cache.put(&tables);
                LoadOutcome {
                    tables: Arc::new(tables),
                    status: LoadStatus::Fresh,
                }
            }
            Err(e) => {
                warn!("Loading tables failed: {}", e);
                LoadOutcome {
                    tables: Arc::new(default_tables()),
                    status: LoadStatus::Degraded(FETCH_FAILED_MESSAGE.to_string()),
                }
            }
        }
    }
}
