// Data source adapter: fetches the six spreadsheet tabs as CSV over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::try_join_all;
use thiserror::Error;
use tracing::{debug, warn};

use crate::tables::{parse_csv, Record, TableId, TableSet};

pub const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Configuration error: no spreadsheet configured")]
    NotConfigured,

    #[error("Network error fetching {table}: {message}")]
    Network { table: TableId, message: String },

    #[error("HTTP {status} fetching {table}")]
    HttpStatus { table: TableId, status: u16 },

    #[error("CSV error in {table}: {message}")]
    Csv { table: TableId, message: String },
}

// Sheet tab ids (the `gid` query parameter) of each table.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGids {
    pub calendar: String,
    pub pricing: String,
    pub rooms: String,
    pub beds: String,
    pub suites: String,
    pub extras: String,
}

impl Default for SheetGids {
    fn default() -> Self {
        Self {
            calendar: "0".to_string(),
            pricing: "53054799".to_string(),
            rooms: "109166723".to_string(),
            beds: "844940838".to_string(),
            suites: "1830778583".to_string(),
            extras: "1216063608".to_string(),
        }
    }
}

impl SheetGids {
    pub fn gid(&self, table: TableId) -> &str {
        match table {
            TableId::Calendar => &self.calendar,
            TableId::Pricing => &self.pricing,
            TableId::Rooms => &self.rooms,
            TableId::Beds => &self.beds,
            TableId::Suites => &self.suites,
            TableId::Extras => &self.extras,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

// One retry after a fixed one second pause
impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            initial_backoff_ms: 1000,
            max_backoff_ms: 1000,
            backoff_multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub sheet_id: Option<String>,
    pub base_url: String,
    pub gids: SheetGids,
    pub retry: RetryConfig,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            sheet_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            gids: SheetGids::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl SheetsConfig {
    pub fn with_sheet_id(sheet_id: impl Into<String>) -> Self {
        Self {
            sheet_id: Some(sheet_id.into()),
            ..Default::default()
        }
    }

    pub fn configured_sheet_id(&self) -> Option<&str> {
        self.sheet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.configured_sheet_id().is_some()
    }

    /// CSV export URL of one tab.
    pub fn table_url(&self, table: TableId) -> Result<String, SourceError> {
        let sheet_id = self.configured_sheet_id().ok_or(SourceError::NotConfigured)?;
        Ok(format!(
            "{}/{}/export?format=csv&gid={}",
            self.base_url.trim_end_matches('/'),
            sheet_id,
            self.gids.gid(table)
        ))
    }
}

/// Delay before retry number `retry_attempt` (zero based).
pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
    let base_backoff_ms = (config.initial_backoff_ms as f64
        * config.backoff_multiplier.powf(retry_attempt as f64))
    .min(config.max_backoff_ms as f64);

    if config.jitter_factor <= 0.0 {
        return Duration::from_millis(base_backoff_ms as u64);
    }

    let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
    let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

    Duration::from_millis(backoff_ms as u64)
}

#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_table(&self, table: TableId) -> Result<Vec<Record>, SourceError>;
}

/// Fetch all six tables concurrently. Any table failing fails the batch.
pub async fn fetch_all(source: &dyn TableSource) -> Result<TableSet, SourceError> {
    let tables = try_join_all(TableId::ALL.into_iter().map(|table| async move {
        source
            .fetch_table(table)
            .await
            .map(|records| (table, records))
    }))
    .await?;

    Ok(TableSet::from_records(tables))
}

// Published Google Sheets spreadsheet, one CSV export per tab.
pub struct GoogleSheetsSource {
    client: reqwest::Client,
    config: SheetsConfig,
}

impl GoogleSheetsSource {
    pub fn new(config: SheetsConfig) -> Result<Self, SourceError> {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: SheetsConfig) -> Result<Self, SourceError> {
        if !config.is_configured() {
            return Err(SourceError::NotConfigured);
        }
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    async fn fetch_once(&self, table: TableId) -> Result<Vec<Record>, SourceError> {
        let url = self.config.table_url(table)?;
        debug!("Fetching {} from {}", table, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network {
                table,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                table,
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| SourceError::Network {
            table,
            message: e.to_string(),
        })?;

        parse_csv(&text).map_err(|e| SourceError::Csv {
            table,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TableSource for GoogleSheetsSource {
    async fn fetch_table(&self, table: TableId) -> Result<Vec<Record>, SourceError> {
        let retry = &self.config.retry;
        let mut attempt = 0;
        loop {
            match self.fetch_once(table).await {
                Ok(records) => {
                    debug!("Fetched {} rows from {}", records.len(), table);
                    return Ok(records);
                }
                Err(SourceError::NotConfigured) => return Err(SourceError::NotConfigured),
                Err(e) if attempt < retry.max_retries => {
                    let backoff = calculate_backoff(attempt, retry);
                    warn!("Fetching {} failed ({}), retrying in {:?}", table, e, backoff);
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!("Fetching {} failed after {} attempt(s): {}", table, attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock_source::MockSource;
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> SheetsConfig {
        SheetsConfig {
            sheet_id: Some("sheet123".to_string()),
            base_url: base_url.to_string(),
            gids: SheetGids::default(),
            retry: RetryConfig {
                initial_backoff_ms: 10,
                max_backoff_ms: 10,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_table_url() {
        let config = SheetsConfig::with_sheet_id("abc");
        assert_eq!(
            config.table_url(TableId::Extras).unwrap(),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=1216063608"
        );
        assert_eq!(
            SheetsConfig::default().table_url(TableId::Calendar),
            Err(SourceError::NotConfigured)
        );
    }

    #[test]
    fn test_blank_sheet_id_is_unconfigured() {
        let config = SheetsConfig::with_sheet_id("   ");
        assert!(!config.is_configured());
        assert!(matches!(
            GoogleSheetsSource::new(config),
            Err(SourceError::NotConfigured)
        ));
    }

    #[test]
    fn test_default_backoff_is_fixed() {
        let retry = RetryConfig::default();
        assert_eq!(calculate_backoff(0, &retry), Duration::from_millis(1000));
        assert_eq!(calculate_backoff(3, &retry), Duration::from_millis(1000));
    }

    #[test]
    fn test_backoff_with_jitter_stays_in_range() {
        let retry = RetryConfig {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        };
        for _ in 0..50 {
            let backoff = calculate_backoff(2, &retry).as_millis();
            assert!((380..=420).contains(&backoff), "backoff {}ms out of range", backoff);
        }
    }

    #[tokio::test]
    async fn test_fetch_table_parses_csv() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheet123/export"))
            .and(query_param("format", "csv"))
            .and(query_param("gid", "1216063608"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("key,price\nearly_checkin,30\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = GoogleSheetsSource::new(test_config(&server.uri())).unwrap();
        let records = source.fetch_table(TableId::Extras).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["key"], "early_checkin");
        assert_eq!(records[0]["price"], "30");
    }

    #[tokio::test]
    async fn test_fetch_table_retries_once_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sheet123/export"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sheet123/export"))
            .respond_with(ResponseTemplate::new(200).set_body_string("room_id,date,status\n"))
            .expect(1)
            .mount(&server)
            .await;

        let source = GoogleSheetsSource::new(test_config(&server.uri())).unwrap();
        let records = source.fetch_table(TableId::Calendar).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_table_fails_after_one_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let source = GoogleSheetsSource::new(test_config(&server.uri())).unwrap();
        let result = source.fetch_table(TableId::Beds).await;
        assert_eq!(
            result,
            Err(SourceError::HttpStatus {
                table: TableId::Beds,
                status: 500
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_all_assembles_snapshot() {
        let source = MockSource::default()
            .with_table(TableId::Calendar, "room_id,date,status\njb,2025-03-10,blocked")
            .with_table(TableId::Beds, "room_id,date,bed_id,status\nq007,2025-03-11,C3-T,booked")
            .with_table(TableId::Extras, "key,price\nbase_price_suites,300");

        let tables = assert_ok!(fetch_all(&source).await);

        assert_eq!(source.calls(), 6);
        assert_eq!(tables.calendar.len(), 1);
        assert_eq!(tables.beds[0].bed_id, "C3-T");
        assert_eq!(tables.extra_price("base_price_suites"), Some(300.0));
        assert!(tables.pricing.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_fails_when_any_table_fails() {
        let source = MockSource::default()
            .with_table(TableId::Extras, "key,price\nearly_checkin,30")
            .failing(TableId::Suites);

        let error = assert_err!(fetch_all(&source).await);
        assert!(matches!(
            error,
            SourceError::Network {
                table: TableId::Suites,
                ..
            }
        ));
    }
}
