/// Holder count acquisition
///
/// The pieces, bottom-up:
/// - `extractor`: pulls a plausible count out of arbitrary page text
/// - `rate_limiter`: spaces out source chain passes
/// - `cache`: memory, file and remote tiers read newest-wins
/// - `sources`: ordered live strategies (page, proxy, indexer, rpc_logs)
/// - `service`: the orchestrator that always answers
///
/// `build_service` wires them from a [`Config`].
pub mod cache;
pub mod client;
pub mod errors;
pub mod extractor;
pub mod format;
pub mod rate_limiter;
pub mod refresher;
pub mod service;
pub mod sources;
pub mod types;

pub use errors::{CacheError, SourceError};
pub use extractor::HolderExtractor;
pub use format::format_holder_count;
pub use rate_limiter::AttemptRateLimiter;
pub use refresher::start_holder_refresher;
pub use service::{DiagnosticsReport, HolderCountService, ServiceStatus};
pub use types::{
    HolderCountRecord, HolderCountResponse, HolderSource, PlausibilityBounds, ProviderTag,
    TokenTarget,
};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::logger::{self, LogTag};
use crate::paths;
use cache::{CacheTier, FileTier, MemoryTier, RemoteTier, TieredCache};
use client::{HttpClient, CLIENT_TIMEOUT_SECS};
use sources::rpc_logs::ScanBudget;
use sources::{
    ExplorerPageStrategy, HolderStrategy, IndexerStrategy, ProxyRelayStrategy, RpcLogsStrategy,
    SourceChain,
};

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Build the extractor from `holders.patterns`, falling back to the built-in list
pub fn build_extractor(config: &Config) -> Result<HolderExtractor, String> {
    let bounds = PlausibilityBounds::new(config.holders.max_plausible_count);
    if config.holders.patterns.is_empty() {
        return Ok(HolderExtractor::new(bounds));
    }

    let patterns: Vec<&str> = config.holders.patterns.iter().map(String::as_str).collect();
    HolderExtractor::with_patterns(&patterns, bounds)
        .map_err(|e| format!("Invalid holders.patterns entry: {}", e))
}

/// Build the enabled cache tiers in read order
pub fn build_tiers(config: &Config, http: &HttpClient) -> Vec<Arc<dyn CacheTier>> {
    let token = TokenTarget::new(&config.token.address, &config.token.chain);
    let mut tiers: Vec<Arc<dyn CacheTier>> = Vec::new();

    if config.cache.memory.enabled {
        tiers.push(Arc::new(MemoryTier::new()));
    }

    if config.cache.file.enabled {
        let path = non_empty(&config.cache.file.path)
            .map(PathBuf::from)
            .unwrap_or_else(paths::get_holder_cache_path);
        tiers.push(Arc::new(FileTier::new(path)));
    }

    let remote = &config.cache.remote;
    if remote.enabled {
        match non_empty(&remote.read_url) {
            Some(read_url) => {
                let key = non_empty(&remote.key).unwrap_or_else(|| token.cache_key());
                let tier = RemoteTier::new(http.clone(), read_url, key)
                    .with_read_token(non_empty(&remote.read_token))
                    .with_writer(non_empty(&remote.write_url), non_empty(&remote.write_token));
                if !tier.is_writable() {
                    logger::info(LogTag::Cache, "Remote tier has no write URL, running read-only");
                }
                tiers.push(Arc::new(tier));
            }
            None => logger::warning(LogTag::Cache, "Remote tier enabled without read_url, skipping"),
        }
    }

    tiers
}

fn page_strategy(
    config: &Config,
    http: &HttpClient,
    extractor: &HolderExtractor,
) -> Arc<ExplorerPageStrategy> {
    let page = &config.sources.page;
    Arc::new(ExplorerPageStrategy::new(
        http.clone(),
        page.url_template.clone(),
        extractor.clone(),
        Duration::from_secs(page.timeout_secs),
    ))
}

/// Build the strategies named in `sources.order` that are enabled
pub fn build_strategies(
    config: &Config,
    http: &HttpClient,
    extractor: &HolderExtractor,
) -> Vec<Arc<dyn HolderStrategy>> {
    let bounds = PlausibilityBounds::new(config.holders.max_plausible_count);
    let sources = &config.sources;
    let mut strategies: Vec<Arc<dyn HolderStrategy>> = Vec::new();

    for name in &sources.order {
        match name.as_str() {
            "page" if sources.page.enabled => {
                strategies.push(page_strategy(config, http, extractor));
            }
            "proxy" if sources.proxy.enabled => {
                strategies.push(Arc::new(ProxyRelayStrategy::new(
                    http.clone(),
                    sources.proxy.relay_template.clone(),
                    sources.page.url_template.clone(),
                    extractor.clone(),
                    Duration::from_secs(sources.proxy.timeout_secs),
                )));
            }
            "indexer" if sources.indexer.enabled => {
                let indexer = IndexerStrategy::new(
                    http.clone(),
                    sources.indexer.base_url.clone(),
                    non_empty(&sources.indexer.api_key),
                    bounds,
                    Duration::from_secs(sources.indexer.timeout_secs),
                )
                .with_page_size(sources.indexer.page_size);
                if !indexer.has_credentials() {
                    logger::warning(
                        LogTag::Sources,
                        "Indexer strategy has no API key and will be skipped at runtime",
                    );
                }
                strategies.push(Arc::new(indexer));
            }
            "rpc_logs" if sources.rpc_logs.enabled => {
                let rpc = &sources.rpc_logs;
                let budget = ScanBudget {
                    from_block: rpc.from_block,
                    block_chunk_size: rpc.block_chunk_size,
                    max_chunks: rpc.max_chunks,
                };
                strategies.push(Arc::new(RpcLogsStrategy::new(
                    http.clone(),
                    non_empty(&rpc.rpc_url),
                    budget,
                    bounds,
                    Duration::from_secs(rpc.timeout_secs),
                )));
            }
            other => logger::debug(
                LogTag::Sources,
                &format!("Strategy '{}' disabled, not added to the chain", other),
            ),
        }
    }

    strategies
}

/// Wire a complete orchestrator from configuration
pub fn build_service(config: &Config) -> Result<HolderCountService, String> {
    config.validate()?;

    let http = HttpClient::new(CLIENT_TIMEOUT_SECS)?;
    let bounds = PlausibilityBounds::new(config.holders.max_plausible_count);
    let token = TokenTarget::new(&config.token.address, &config.token.chain);
    let extractor = build_extractor(config)?;

    let tiers = build_tiers(config, &http);
    if tiers.is_empty() {
        logger::warning(LogTag::Cache, "No cache tiers enabled, every request hits the sources");
    }
    let cache = TieredCache::new(tiers, Duration::from_secs(config.cache.io_timeout_secs));

    let strategies = build_strategies(config, &http, &extractor);
    if strategies.is_empty() {
        logger::warning(LogTag::Sources, "No source strategies enabled, serving cache only");
    }
    let chain = SourceChain::new(strategies, bounds);

    let limiter = AttemptRateLimiter::new(Duration::from_secs(
        config.holders.min_attempt_interval_secs,
    ));

    logger::info(
        LogTag::Holders,
        &format!(
            "Holder service ready for {} on {} (strategies: [{}], tiers: [{}])",
            token.address,
            token.chain,
            chain.names().join(", "),
            cache.tier_names().join(", ")
        ),
    );

    Ok(HolderCountService::new(
        token,
        cache,
        chain,
        limiter,
        bounds,
        config.holders.bootstrap_count,
    )
    .with_single_flight(config.holders.single_flight)
    .with_page_probe(Some(page_strategy(config, &http, &extractor))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.cache.file.path = dir
            .path()
            .join("holder_count.json")
            .to_string_lossy()
            .to_string();
        config
    }

    #[test]
    fn test_default_chain_order() {
        let dir = tempfile::tempdir().unwrap();
        let service = build_service(&local_config(&dir)).unwrap();
        // rpc_logs is off by default
        assert_eq!(service.chain().names(), vec!["page", "proxy", "indexer"]);
        assert_eq!(service.cache().tier_names(), vec!["memory", "file"]);
        assert_eq!(service.bootstrap().count, 1427);
    }

    #[test]
    fn test_order_and_toggles_respected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(&dir);
        config.sources.order = vec!["indexer".into(), "rpc_logs".into(), "page".into()];
        config.sources.rpc_logs.enabled = true;
        config.sources.page.enabled = false;
        config.cache.memory.enabled = false;

        let service = build_service(&config).unwrap();
        assert_eq!(service.chain().names(), vec!["indexer", "rpc_logs"]);
        assert_eq!(service.cache().tier_names(), vec!["file"]);
    }

    #[test]
    fn test_remote_tier_added_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = local_config(&dir);
        config.cache.remote.enabled = true;
        config.cache.remote.read_url = "https://edge-config.example.com/ecfg_1".to_string();

        let service = build_service(&config).unwrap();
        assert_eq!(service.cache().tier_names(), vec!["memory", "file", "remote"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.sources.order = vec!["telepathy".to_string()];
        assert!(build_service(&config).is_err());
    }

    #[test]
    fn test_custom_patterns() {
        let mut config = Config::default();
        config.holders.patterns = vec![r"(\d+) wallets".to_string()];
        let extractor = build_extractor(&config).unwrap();
        assert_eq!(extractor.extract("held by 812 wallets"), Some(812));
        assert_eq!(extractor.extract("Holders: 2,003"), None);

        config.holders.patterns = vec!["(unclosed".to_string()];
        assert!(build_extractor(&config).is_err());
    }
}
