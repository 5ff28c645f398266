/// Core holder count types
///
/// A `HolderCountRecord` is one validated reading. Records are immutable:
/// a new reading is a new record, and cache tiers simply keep the last one
/// written to them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_MAX_PLAUSIBLE_COUNT, MIN_PLAUSIBLE_COUNT};

// ============================================================================
// TRACKED TOKEN
// ============================================================================

/// The token whose holders are being counted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTarget {
    /// Contract address (0x-prefixed hex)
    pub address: String,
    /// Indexer chain slug, e.g. `base-mainnet`
    pub chain: String,
}

impl TokenTarget {
    pub fn new(address: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            chain: chain.into(),
        }
    }

    /// Key used by shared stores for this token's record
    pub fn cache_key(&self) -> String {
        format!("holder-count-{}", self.address)
    }
}

// ============================================================================
// PROVENANCE
// ============================================================================

/// Coarse provenance of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolderSource {
    Live,
    Cached,
    Fallback,
}

impl HolderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolderSource::Live => "live",
            HolderSource::Cached => "cached",
            HolderSource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for HolderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which provider produced a reading (diagnostics only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    ExplorerPage,
    ProxyRelay,
    Indexer,
    RpcLogs,
    Manual,
    Bootstrap,
}

impl ProviderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::ExplorerPage => "explorer_page",
            ProviderTag::ProxyRelay => "proxy_relay",
            ProviderTag::Indexer => "indexer",
            ProviderTag::RpcLogs => "rpc_logs",
            ProviderTag::Manual => "manual",
            ProviderTag::Bootstrap => "bootstrap",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One validated holder count reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderCountRecord {
    pub count: u64,
    /// When the value was established, not when it was read back
    pub timestamp: DateTime<Utc>,
    pub source: HolderSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderTag>,
}

impl HolderCountRecord {
    /// A freshly obtained reading
    pub fn live(count: u64, timestamp: DateTime<Utc>, provider: ProviderTag) -> Self {
        Self {
            count,
            timestamp,
            source: HolderSource::Live,
            provider: Some(provider),
        }
    }

    /// Whether this record is newer than `other`
    pub fn is_newer_than(&self, other: &HolderCountRecord) -> bool {
        self.timestamp > other.timestamp
    }
}

// ============================================================================
// PLAUSIBILITY
// ============================================================================

/// Domain plausibility window: `MIN_PLAUSIBLE_COUNT <= count < max_exclusive`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlausibilityBounds {
    pub max_exclusive: u64,
}

impl PlausibilityBounds {
    pub fn new(max_exclusive: u64) -> Self {
        Self { max_exclusive }
    }

    pub fn contains(&self, count: u64) -> bool {
        count >= MIN_PLAUSIBLE_COUNT && count < self.max_exclusive
    }

    /// Accept a signed value (as parsed from loose text)
    pub fn accept(&self, value: i128) -> Option<u64> {
        if value < MIN_PLAUSIBLE_COUNT as i128 {
            return None;
        }
        let count = u64::try_from(value).ok()?;
        self.contains(count).then_some(count)
    }
}

impl Default for PlausibilityBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PLAUSIBLE_COUNT)
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

/// What the inbound endpoint returns; never an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderCountResponse {
    pub holders: u64,
    pub source: HolderSource,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HolderCountResponse {
    pub fn from_record(record: &HolderCountRecord, source: HolderSource) -> Self {
        Self {
            holders: record.count,
            source,
            last_updated: record.timestamp,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}
