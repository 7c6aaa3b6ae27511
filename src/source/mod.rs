//! Tournament record sources.
//!
//! The engine only needs "fetch every row"; row counts are a cheap extra some
//! sources can answer without transferring the table. All filtering happens
//! in the engine.

mod jsonl;
mod rest;

pub use jsonl::JsonlSource;
pub use rest::{parse_content_range, RestConfig, RestSource, DEFAULT_PAGE_SIZE};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AppConfig, SourceKind};
use crate::models::TournamentRecord;
use crate::storage::{StorageConfig, StorageError};

/// Errors that can occur while querying a record source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Response did not include a row count")]
    MissingCount,

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Query capability over the tournament table.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &str;

    /// Every tournament row.
    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, SourceError>;

    /// Number of rows, without fetching them where possible.
    async fn count(&self) -> Result<usize, SourceError>;
}

/// Fixed in-memory rows.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<TournamentRecord>,
    unavailable: bool,
}

impl MemorySource {
    pub fn new(records: Vec<TournamentRecord>) -> Self {
        Self {
            records,
            unavailable: false,
        }
    }

    /// A source whose every query fails.
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            unavailable: true,
        }
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.unavailable {
            return Err(SourceError::Unavailable("memory source offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, SourceError> {
        self.check()?;
        Ok(self.records.clone())
    }

    async fn count(&self) -> Result<usize, SourceError> {
        self.check()?;
        Ok(self.records.len())
    }
}

/// Build the record source described by the application config.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn RecordSource>, SourceError> {
    match config.source.kind {
        SourceKind::Jsonl => {
            let storage = StorageConfig::new(config.data_dir.clone());
            Ok(Arc::new(JsonlSource::new(&storage)))
        }
        SourceKind::Rest => {
            let base_url = config.source.base_url.as_deref().ok_or_else(|| {
                SourceError::InvalidUrl("source.base_url is required for rest sources".to_string())
            })?;
            let base_url =
                url::Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
            let api_key = std::env::var(&config.source.api_key_env).ok();
            let rest = RestSource::new(RestConfig {
                base_url,
                table: config.source.table.clone(),
                api_key,
                timeout: Duration::from_secs(config.source.timeout_seconds),
                page_size: config.source.page_size,
            })?;
            Ok(Arc::new(rest))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankSlot;

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new(vec![TournamentRecord::new("Quake 3", "Duel", 1, 2001)
            .with_player(RankSlot::First, "Zero4")]);

        assert_eq!(source.count().await.unwrap(), 1);
        assert_eq!(source.fetch_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_memory_source() {
        let source = MemorySource::unavailable();

        assert!(matches!(
            source.fetch_all().await,
            Err(SourceError::Unavailable(_))
        ));
        assert!(source.count().await.is_err());
    }

    #[test]
    fn test_from_config_jsonl() {
        let config = AppConfig::default();
        let source = from_config(&config).unwrap();
        assert_eq!(source.name(), "jsonl");
    }

    #[test]
    fn test_from_config_rest_requires_url() {
        let mut config = AppConfig::default();
        config.source.kind = SourceKind::Rest;
        assert!(matches!(
            from_config(&config),
            Err(SourceError::InvalidUrl(_))
        ));

        config.source.base_url = Some("https://example.supabase.co".to_string());
        let source = from_config(&config).unwrap();
        assert_eq!(source.name(), "rest");
    }
}
