/// Tiered holder count cache
///
/// Three backends with different durability hold at most one record each:
/// - memory: fastest, lost on restart
/// - file: survives restart, local to this instance
/// - remote: survives restart, shared across instances
///
/// Tiers are dumb holders. All policy lives here: reads gather every
/// reachable tier and keep the newest record by timestamp (not by tier
/// order); writes go to every tier, best effort. A failing tier is treated
/// as empty and never fails the request, and so is a tier holding a count
/// outside the plausibility bounds.
pub mod file;
pub mod memory;
pub mod remote;

pub use file::FileTier;
pub use memory::MemoryTier;
pub use remote::RemoteTier;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::errors::CacheError;
use super::types::{HolderCountRecord, PlausibilityBounds};
use crate::logger::{self, LogTag};

/// Read/write contract shared by every backend
#[async_trait]
pub trait CacheTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn read(&self) -> Result<Option<HolderCountRecord>, CacheError>;

    /// Replace the stored record as a whole (last write wins)
    async fn write(&self, record: &HolderCountRecord) -> Result<(), CacheError>;
}

/// Result of one tier read
#[derive(Debug, Clone, Serialize)]
pub struct TierSnapshot {
    pub tier: &'static str,
    pub record: Option<HolderCountRecord>,
    pub error: Option<String>,
}

/// Outcome of a best-effort write to every tier
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<&'static str>,
    pub skipped: Vec<(&'static str, String)>,
}

impl WriteReport {
    pub fn all_written(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct TieredCache {
    tiers: Vec<Arc<dyn CacheTier>>,
    io_timeout: Duration,
    bounds: PlausibilityBounds,
}

impl TieredCache {
    pub fn new(tiers: Vec<Arc<dyn CacheTier>>, io_timeout: Duration) -> Self {
        Self {
            tiers,
            io_timeout,
            bounds: PlausibilityBounds::default(),
        }
    }

    /// Records outside `bounds` are dropped on read
    pub fn with_bounds(mut self, bounds: PlausibilityBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Newest record across all reachable tiers
    pub async fn resolve(&self) -> Option<HolderCountRecord> {
        let snapshots = self.snapshot().await;
        newest(snapshots.into_iter().filter_map(|s| s.record))
    }

    /// Read every tier concurrently, keeping per-tier errors
    pub async fn snapshot(&self) -> Vec<TierSnapshot> {
        let reads = self.tiers.iter().map(|tier| async move {
            let result = bounded(self.io_timeout, tier.read()).await;
            match result {
                Ok(Some(record)) if !self.bounds.contains(record.count) => {
                    logger::warning(
                        LogTag::Cache,
                        &format!(
                            "Tier '{}' holds implausible count {}, treating as empty",
                            tier.name(),
                            record.count
                        ),
                    );
                    TierSnapshot {
                        tier: tier.name(),
                        record: None,
                        error: Some(format!("implausible holder count {}", record.count)),
                    }
                }
                Ok(record) => TierSnapshot {
                    tier: tier.name(),
                    record,
                    error: None,
                },
                Err(e) => {
                    logger::warning(
                        LogTag::Cache,
                        &format!("Tier '{}' unreadable, treating as empty: {}", tier.name(), e),
                    );
                    TierSnapshot {
                        tier: tier.name(),
                        record: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        });

        join_all(reads).await
    }

    /// Write `record` to every tier; one failure never blocks the others
    pub async fn write_all(&self, record: &HolderCountRecord) -> WriteReport {
        let writes = self.tiers.iter().map(|tier| async move {
            (tier.name(), bounded(self.io_timeout, tier.write(record)).await)
        });

        let mut report = WriteReport::default();
        for (name, result) in join_all(writes).await {
            match result {
                Ok(()) => report.written.push(name),
                Err(CacheError::ReadOnly) => {
                    logger::debug(LogTag::Cache, &format!("Tier '{}' is read-only, write skipped", name));
                    report.skipped.push((name, CacheError::ReadOnly.to_string()));
                }
                Err(e) => {
                    logger::warning(LogTag::Cache, &format!("Write to tier '{}' failed: {}", name, e));
                    report.skipped.push((name, e.to_string()));
                }
            }
        }

        logger::debug(
            LogTag::Cache,
            &format!(
                "Stored holder count {} in tiers {:?}",
                record.count, report.written
            ),
        );

        report
    }
}

/// Latest timestamp wins; on a tie the earlier tier is kept
pub fn newest<I>(records: I) -> Option<HolderCountRecord>
where
    I: IntoIterator<Item = HolderCountRecord>,
{
    records.into_iter().reduce(|best, candidate| {
        if candidate.is_newer_than(&best) {
            candidate
        } else {
            best
        }
    })
}

async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, CacheError>
where
    F: Future<Output = Result<T, CacheError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}
