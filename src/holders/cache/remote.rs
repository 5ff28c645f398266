/// Shared remote tier backed by an edge-config style key/value store
///
/// Read:  `GET {read_url}/item/{key}` with an optional bearer token.
///        404 or a `null` body means the tier is empty.
/// Write: `PATCH {write_url}` with an upsert item list. Without a write URL
///        the tier is read-only and writes report `CacheError::ReadOnly`.
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::CacheTier;
use crate::holders::client::HttpClient;
use crate::holders::errors::CacheError;
use crate::holders::types::HolderCountRecord;

#[derive(Debug, Clone)]
pub struct RemoteTier {
    http: HttpClient,
    read_url: String,
    key: String,
    read_token: Option<String>,
    write_url: Option<String>,
    write_token: Option<String>,
}

impl RemoteTier {
    pub fn new(http: HttpClient, read_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            http,
            read_url: read_url.into(),
            key: key.into(),
            read_token: None,
            write_url: None,
            write_token: None,
        }
    }

    pub fn with_read_token(mut self, token: Option<String>) -> Self {
        self.read_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_writer(mut self, write_url: Option<String>, write_token: Option<String>) -> Self {
        self.write_url = write_url.filter(|u| !u.is_empty());
        self.write_token = write_token.filter(|t| !t.is_empty());
        self
    }

    pub fn is_writable(&self) -> bool {
        self.write_url.is_some()
    }

    fn item_url(&self) -> String {
        format!("{}/item/{}", self.read_url.trim_end_matches('/'), self.key)
    }
}

#[async_trait]
impl CacheTier for RemoteTier {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn read(&self) -> Result<Option<HolderCountRecord>, CacheError> {
        let mut request = self.http.client().get(self.item_url());
        if let Some(token) = &self.read_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CacheError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&body)? {
            Value::Null => Ok(None),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    async fn write(&self, record: &HolderCountRecord) -> Result<(), CacheError> {
        let Some(write_url) = &self.write_url else {
            return Err(CacheError::ReadOnly);
        };

        let body = json!({
            "items": [{
                "operation": "upsert",
                "key": self.key,
                "value": record,
            }]
        });

        let mut request = self.http.client().patch(write_url).json(&body);
        if let Some(token) = &self.write_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(CacheError::HttpStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
