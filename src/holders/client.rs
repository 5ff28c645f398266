/// Shared outbound HTTP client
///
/// One reqwest client per process with connection pooling. Each caller
/// still sets its own per-request timeout; the client-level timeout is only
/// an upper bound.
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

use crate::constants::BROWSER_USER_AGENT;

/// Upper bound for any single outbound request
pub const CLIENT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, String> {
        Self::with_user_agent(timeout_secs, BROWSER_USER_AGENT)
    }

    pub fn with_user_agent(timeout_secs: u64, user_agent: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET with the headers a mobile browser would send to an explorer page
    pub fn browser_get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).headers(browser_headers())
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.google.com/"));
    headers
}
