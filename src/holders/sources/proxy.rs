/// Explorer page fetched through a public CORS relay
///
/// Same extraction as the direct page strategy, but the request leaves from
/// the relay's network. Relays either return the page as-is or wrap it in
/// `{"contents": "..."}`; both are accepted.
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::page::render_page_url;
use super::HolderStrategy;
use crate::holders::client::HttpClient;
use crate::holders::errors::SourceError;
use crate::holders::extractor::HolderExtractor;
use crate::holders::types::{ProviderTag, TokenTarget};

pub const TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_RELAY_TEMPLATE: &str = "https://api.allorigins.win/raw?url={url}";

#[derive(Debug, Deserialize)]
struct WrappedPage {
    contents: String,
}

pub struct ProxyRelayStrategy {
    http: HttpClient,
    relay_template: String,
    page_template: String,
    extractor: HolderExtractor,
    timeout: Duration,
}

impl ProxyRelayStrategy {
    pub fn new(
        http: HttpClient,
        relay_template: impl Into<String>,
        page_template: impl Into<String>,
        extractor: HolderExtractor,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            relay_template: relay_template.into(),
            page_template: page_template.into(),
            extractor,
            timeout,
        }
    }

    /// Relay URL with the target page percent-encoded into `{url}`
    pub fn relay_url(&self, token: &TokenTarget) -> String {
        let page = render_page_url(&self.page_template, token);
        let encoded: String = url::form_urlencoded::byte_serialize(page.as_bytes()).collect();
        self.relay_template.replace("{url}", &encoded)
    }
}

/// Pull the page out of a relay response body
pub fn unwrap_relay_body(body: &str) -> String {
    let trimmed = body.trim_start();
    if trimmed.starts_with('{') {
        if let Ok(wrapped) = serde_json::from_str::<WrappedPage>(trimmed) {
            return wrapped.contents;
        }
    }
    body.to_string()
}

#[async_trait]
impl HolderStrategy for ProxyRelayStrategy {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::ProxyRelay
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, token: &TokenTarget) -> Result<u64, SourceError> {
        let url = self.relay_url(token);
        let response = self
            .http
            .client()
            .get(&url)
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
        let html = unwrap_relay_body(&body);
        self.extractor.extract(&html).ok_or(SourceError::NoMatch)
    }
}
