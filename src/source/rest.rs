//! PostgREST-style table endpoint (e.g. a Supabase project).
//!
//! Servers cap how many rows one response may carry, so the table is read in
//! pages with `Range` headers until the `Content-Range` total is reached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_RANGE, RANGE};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::models::TournamentRecord;

use super::{RecordSource, SourceError};

/// Rows requested per page. Supabase's default response cap.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Configuration for a REST table source.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: Url,

    /// Table name
    pub table: String,

    /// Sent as `apikey` and bearer token
    pub api_key: Option<String>,

    pub timeout: Duration,

    /// Rows per request
    pub page_size: usize,
}

/// Reads the tournament table over HTTP.
pub struct RestSource {
    client: Client,
    table_url: Url,
    page_size: usize,
}

/// One page of undecoded rows.
struct Page {
    rows: Vec<Value>,
    total: Option<usize>,
}

impl RestSource {
    pub fn new(config: RestConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| SourceError::Unavailable("API key is not a valid header".to_string()))?;
            headers.insert(HeaderName::from_static("apikey"), value);
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| SourceError::Unavailable("API key is not a valid header".to_string()))?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            table_url: table_url(&config.base_url, &config.table)?,
            page_size: config.page_size.max(1),
        })
    }

    fn select_all_url(&self) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut().append_pair("select", "*");
        url
    }

    async fn fetch_page(&self, offset: usize) -> Result<Page, SourceError> {
        let last = offset + self.page_size - 1;
        let response = self
            .client
            .get(self.select_all_url())
            .header("Range-Unit", "items")
            .header(RANGE, format!("{}-{}", offset, last))
            .header("Prefer", "count=exact")
            .send()
            .await?;

        // Asking past the end of the table
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(Page {
                rows: Vec::new(),
                total: None,
            });
        }

        let response = check_status(response)?;
        let total = content_range_total(&response);
        let rows: Vec<Value> = response.json().await?;
        Ok(Page { rows, total })
    }
}

/// `{base}/rest/v1/{table}`, tolerating a base URL with or without a trailing slash.
fn table_url(base: &Url, table: &str) -> Result<Url, SourceError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("rest/v1/{}", table))
        .map_err(|e| SourceError::InvalidUrl(e.to_string()))
}

/// Total row count from a `Content-Range` header such as `0-24/3573`.
pub fn parse_content_range(value: &str) -> Option<usize> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

fn content_range_total(response: &Response) -> Option<usize> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_content_range)
}

fn check_status(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }
    Ok(response)
}

#[async_trait]
impl RecordSource for RestSource {
    fn name(&self) -> &str {
        "rest"
    }

    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, SourceError> {
        info!("Fetching tournaments from {}", self.table_url);

        let mut records = Vec::new();
        let mut offset = 0;
        let mut skipped = 0;

        loop {
            let page = self.fetch_page(offset).await?;
            let received = page.rows.len();

            for (i, row) in page.rows.into_iter().enumerate() {
                match serde_json::from_value::<TournamentRecord>(row) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warn!("Failed to parse row {} from {}: {}", offset + i + 1, self.table_url, e);
                        skipped += 1;
                    }
                }
            }
            offset += received;

            let done = match page.total {
                Some(total) => offset >= total,
                None => received < self.page_size,
            };
            if received == 0 || done {
                break;
            }
            debug!("Fetched {} rows so far", offset);
        }

        debug!(
            "Fetched {} tournament rows ({} skipped)",
            records.len(),
            skipped
        );
        Ok(records)
    }

    /// Rows in the table as reported by the server, including any that
    /// `fetch_all` would skip as unparseable.
    async fn count(&self) -> Result<usize, SourceError> {
        let response = self
            .client
            .head(self.select_all_url())
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = check_status(response)?;

        content_range_total(&response).ok_or(SourceError::MissingCount)
    }
}
