/// Authenticated token-holder indexer (Covalent `token_holders_v2`)
///
/// Structured JSON, so no extraction: the count is the pagination total.
/// Without an API key the strategy fails immediately and makes no request.
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::HolderStrategy;
use crate::holders::client::HttpClient;
use crate::holders::errors::SourceError;
use crate::holders::types::{PlausibilityBounds, ProviderTag, TokenTarget};
use crate::logger::{self, LogTag};

pub const TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_INDEXER_BASE_URL: &str = "https://api.covalenthq.com/v1";

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct HoldersEnvelope {
    data: Option<HoldersData>,
    #[serde(default)]
    error: bool,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HoldersData {
    pagination: Option<Pagination>,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total_count: Option<i64>,
}

pub struct IndexerStrategy {
    http: HttpClient,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
    bounds: PlausibilityBounds,
    timeout: Duration,
}

impl IndexerStrategy {
    pub fn new(
        http: HttpClient,
        base_url: impl Into<String>,
        api_key: Option<String>,
        bounds: PlausibilityBounds,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            page_size: DEFAULT_PAGE_SIZE,
            bounds,
            timeout,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn holders_url(&self, token: &TokenTarget) -> String {
        format!(
            "{}/{}/tokens/{}/token_holders_v2/?page-size={}",
            self.base_url.trim_end_matches('/'),
            token.chain,
            token.address,
            self.page_size
        )
    }

    fn count_from_body(&self, body: &str) -> Result<u64, SourceError> {
        let envelope: HoldersEnvelope = serde_json::from_str(body)
            .map_err(|e| SourceError::Malformed(format!("indexer body: {}", e)))?;

        if envelope.error {
            return Err(SourceError::Malformed(
                envelope
                    .error_message
                    .unwrap_or_else(|| "indexer reported an error".to_string()),
            ));
        }

        let data = envelope
            .data
            .ok_or_else(|| SourceError::Malformed("missing data".to_string()))?;

        let total = match data.pagination.and_then(|p| p.total_count) {
            Some(total) => total as i128,
            None if data.items.len() < self.page_size as usize => {
                logger::debug(
                    LogTag::Sources,
                    &format!(
                        "Indexer returned no total_count, using item count {}",
                        data.items.len()
                    ),
                );
                data.items.len() as i128
            }
            None => {
                return Err(SourceError::Malformed(
                    "no total_count and item list fills a whole page".to_string(),
                ))
            }
        };

        self.bounds
            .accept(total)
            .ok_or(SourceError::OutOfRange(total))
    }
}

#[async_trait]
impl HolderStrategy for IndexerStrategy {
    fn name(&self) -> &'static str {
        "indexer"
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::Indexer
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, token: &TokenTarget) -> Result<u64, SourceError> {
        let Some(api_key) = &self.api_key else {
            return Err(SourceError::MissingCredentials("indexer"));
        };

        let url = self.holders_url(token);
        let response = self
            .http
            .client()
            .get(&url)
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                endpoint: url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        self.count_from_body(&body)
    }
}
