/// Ordered live-value providers
///
/// Each strategy is one independent way of asking the outside world for
/// the holder count. The chain walks them in order and stops at the first
/// plausible answer. Every failure (timeout, bad status, malformed body,
/// extraction miss, implausible number) is soft: it is logged and the next
/// strategy runs. Adding, removing or reordering providers is a change to
/// the list, not to the control flow.
pub mod indexer;
pub mod page;
pub mod proxy;
pub mod rpc_logs;

pub use indexer::IndexerStrategy;
pub use page::ExplorerPageStrategy;
pub use proxy::ProxyRelayStrategy;
pub use rpc_logs::RpcLogsStrategy;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::errors::SourceError;
use super::types::{PlausibilityBounds, ProviderTag, TokenTarget};
use crate::logger::{self, LogTag};

/// One way of obtaining a live holder count
#[async_trait]
pub trait HolderStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn provider(&self) -> ProviderTag;

    /// Hard budget for one attempt, enforced by the chain
    fn timeout(&self) -> Duration;

    async fn attempt(&self, token: &TokenTarget) -> Result<u64, SourceError>;
}

/// A validated count and who produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveReading {
    pub count: u64,
    pub provider: ProviderTag,
    pub strategy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyFailure {
    pub strategy: &'static str,
    pub error: String,
    pub elapsed_ms: u64,
    #[serde(skip)]
    pub kind: SourceError,
}

/// Result of one pass over the chain
#[derive(Debug, Clone, Default)]
pub struct ChainOutcome {
    pub reading: Option<LiveReading>,
    pub failures: Vec<StrategyFailure>,
}

impl ChainOutcome {
    /// One line describing why no live value was obtained
    pub fn failure_summary(&self) -> String {
        if self.failures.is_empty() {
            return "no live source configured".to_string();
        }
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.strategy, f.error))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub struct SourceChain {
    strategies: Vec<Arc<dyn HolderStrategy>>,
    bounds: PlausibilityBounds,
}

impl SourceChain {
    pub fn new(strategies: Vec<Arc<dyn HolderStrategy>>, bounds: PlausibilityBounds) -> Self {
        Self { strategies, bounds }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Try strategies in order until one yields a plausible count
    pub async fn run(&self, token: &TokenTarget) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();

        for strategy in &self.strategies {
            let started = Instant::now();
            let budget = strategy.timeout();

            let result = match tokio::time::timeout(budget, strategy.attempt(token)).await {
                Ok(Err(SourceError::Timeout { .. })) | Err(_) => Err(SourceError::Timeout {
                    timeout_ms: budget.as_millis() as u64,
                }),
                Ok(result) => result,
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let error = match result {
                Ok(count) if self.bounds.contains(count) => {
                    logger::info(
                        LogTag::Sources,
                        &format!(
                            "Strategy '{}' returned {} holders in {}ms",
                            strategy.name(),
                            count,
                            elapsed_ms
                        ),
                    );
                    outcome.reading = Some(LiveReading {
                        count,
                        provider: strategy.provider(),
                        strategy: strategy.name(),
                    });
                    return outcome;
                }
                Ok(count) => SourceError::OutOfRange(count as i128),
                Err(e) => e,
            };

            logger::warning(
                LogTag::Sources,
                &format!(
                    "Strategy '{}' failed after {}ms: {}",
                    strategy.name(),
                    elapsed_ms,
                    error
                ),
            );
            outcome.failures.push(StrategyFailure {
                strategy: strategy.name(),
                error: error.to_string(),
                elapsed_ms,
                kind: error,
            });
        }

        outcome
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted strategies shared by the chain and orchestrator tests

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub enum Script {
        Count(u64),
        Fail(SourceError),
        Hang,
    }

    pub struct ScriptedStrategy {
        pub name: &'static str,
        pub script: Script,
        pub timeout: Duration,
        pub calls: AtomicUsize,
    }

    impl ScriptedStrategy {
        pub fn new(name: &'static str, script: Script) -> Arc<Self> {
            Arc::new(Self {
                name,
                script,
                timeout: Duration::from_millis(100),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HolderStrategy for ScriptedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn provider(&self) -> ProviderTag {
            ProviderTag::Indexer
        }

        fn timeout(&self) -> Duration {
            self.timeout
        }

        async fn attempt(&self, _token: &TokenTarget) -> Result<u64, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Count(n) => Ok(*n),
                Script::Fail(e) => Err(e.clone()),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Err(SourceError::NoMatch)
                }
            }
        }
    }
}
