/// Soft-failure types for strategies and cache tiers
///
/// None of these ever reach the caller of the orchestrator. They exist so
/// that logs and diagnostics can say precisely why a source or tier was
/// skipped.
use thiserror::Error;

/// Why a single source strategy produced no count
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("No holder count found in payload")]
    NoMatch,

    #[error("Implausible holder count: {0}")]
    OutOfRange(i128),

    #[error("Missing credentials for {0}")]
    MissingCredentials(&'static str),

    #[error("Strategy disabled")]
    Disabled,
}

impl SourceError {
    /// Transient failures are worth retrying on a later pass
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::Timeout { .. } | SourceError::Network(_) | SourceError::HttpStatus { .. }
        )
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout { timeout_ms: 0 }
        } else if let Some(status) = err.status() {
            SourceError::HttpStatus {
                endpoint: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

/// Why a cache tier read or write did not happen
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from remote store")]
    HttpStatus { status: u16 },

    #[error("Tier operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Tier is read-only")]
    ReadOnly,
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CacheError::HttpStatus {
                status: status.as_u16(),
            },
            None => CacheError::Network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SourceError::Timeout { timeout_ms: 15_000 }.is_transient());
        assert!(SourceError::HttpStatus {
            endpoint: "https://basescan.org".to_string(),
            status: 403
        }
        .is_transient());
        assert!(!SourceError::NoMatch.is_transient());
        assert!(!SourceError::MissingCredentials("indexer").is_transient());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SourceError::Timeout { timeout_ms: 8000 }.to_string(),
            "Timed out after 8000ms"
        );
        assert_eq!(CacheError::ReadOnly.to_string(), "Tier is read-only");
    }
}
