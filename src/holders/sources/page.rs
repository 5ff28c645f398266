/// Direct block-explorer page fetch
///
/// GETs the token page with a browser identity and runs the extractor over
/// the HTML. Cheapest source, and the one most likely to be blocked.
use async_trait::async_trait;
use std::time::Duration;

use super::HolderStrategy;
use crate::holders::client::HttpClient;
use crate::holders::errors::SourceError;
use crate::holders::extractor::HolderExtractor;
use crate::holders::types::{ProviderTag, TokenTarget};

/// Request timeout - explorer pages are heavy, 15s is usually enough
pub const TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_PAGE_TEMPLATE: &str = "https://basescan.org/token/{address}";

pub struct ExplorerPageStrategy {
    http: HttpClient,
    url_template: String,
    extractor: HolderExtractor,
    timeout: Duration,
}

impl ExplorerPageStrategy {
    pub fn new(
        http: HttpClient,
        url_template: impl Into<String>,
        extractor: HolderExtractor,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            url_template: url_template.into(),
            extractor,
            timeout,
        }
    }

    pub fn page_url(&self, token: &TokenTarget) -> String {
        render_page_url(&self.url_template, token)
    }

    /// Fetch the raw page body
    pub async fn fetch_page(&self, token: &TokenTarget) -> Result<String, SourceError> {
        let url = self.page_url(token);
        let response = self
            .http
            .browser_get(&url)
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

        Ok(response.text().await?)
    }

    pub fn extractor(&self) -> &HolderExtractor {
        &self.extractor
    }
}

/// Substitute `{address}` and `{chain}` into a URL template
pub fn render_page_url(template: &str, token: &TokenTarget) -> String {
    template
        .replace("{address}", &token.address)
        .replace("{chain}", &token.chain)
}

#[async_trait]
impl HolderStrategy for ExplorerPageStrategy {
    fn name(&self) -> &'static str {
        "page"
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::ExplorerPage
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, token: &TokenTarget) -> Result<u64, SourceError> {
        let html = self.fetch_page(token).await?;
        self.extractor.extract(&html).ok_or(SourceError::NoMatch)
    }
}
