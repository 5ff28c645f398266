/// Configuration schemas - all config structures defined once with defaults
///
/// Every section is declared through `config_struct!`, so a config file
/// only needs the keys it wants to change.
use crate::config_struct;
use crate::constants::{
    BOOTSTRAP_HOLDER_COUNT, DEFAULT_MAX_PLAUSIBLE_COUNT, DEFAULT_MIN_ATTEMPT_INTERVAL_SECS,
    TOKEN_ADDRESS, TOKEN_CHAIN,
};
use crate::holders::sources::{indexer, page, proxy, rpc_logs};

/// Strategy names accepted in `sources.order`
pub const KNOWN_STRATEGIES: &[&str] = &["page", "proxy", "indexer", "rpc_logs"];

// ============================================================================
// TRACKED TOKEN
// ============================================================================

config_struct! {
    pub struct TokenConfig {
        /// Contract address (0x-prefixed)
        address: String = TOKEN_ADDRESS.to_string(),
        /// Indexer chain slug
        chain: String = TOKEN_CHAIN.to_string(),
    }
}

// ============================================================================
// HOLDER COUNT POLICY
// ============================================================================

config_struct! {
    /// Orchestrator policy
    pub struct HoldersConfig {
        /// Exclusive upper bound; counts at or above are extraction noise
        max_plausible_count: u64 = DEFAULT_MAX_PLAUSIBLE_COUNT,

        /// Minimum spacing between two source chain passes
        min_attempt_interval_secs: u64 = DEFAULT_MIN_ATTEMPT_INTERVAL_SECS,

        /// Served when no tier has ever held a record
        bootstrap_count: u64 = BOOTSTRAP_HOLDER_COUNT,

        /// Background refresh period, 0 disables
        refresh_interval_secs: u64 = 0,

        /// Serialize concurrent source passes
        single_flight: bool = false,

        /// Replace the built-in extraction patterns (empty keeps them)
        patterns: Vec<String> = Vec::new(),
    }
}

// ============================================================================
// SOURCES
// ============================================================================

config_struct! {
    pub struct PageSourceConfig {
        enabled: bool = true,
        /// `{address}` and `{chain}` are substituted
        url_template: String = page::DEFAULT_PAGE_TEMPLATE.to_string(),
        timeout_secs: u64 = page::TIMEOUT_SECS,
    }
}

config_struct! {
    pub struct ProxySourceConfig {
        enabled: bool = true,
        /// `{url}` receives the percent-encoded explorer page URL
        relay_template: String = proxy::DEFAULT_RELAY_TEMPLATE.to_string(),
        timeout_secs: u64 = proxy::TIMEOUT_SECS,
    }
}

config_struct! {
    pub struct IndexerSourceConfig {
        enabled: bool = true,
        base_url: String = indexer::DEFAULT_INDEXER_BASE_URL.to_string(),
        /// Empty means no credentials; the strategy then fails without a request
        api_key: String = String::new(),
        page_size: u32 = indexer::DEFAULT_PAGE_SIZE,
        timeout_secs: u64 = indexer::TIMEOUT_SECS,
    }
}

config_struct! {
    pub struct RpcLogsSourceConfig {
        enabled: bool = false,
        rpc_url: String = String::new(),
        /// Token deployment block
        from_block: u64 = 0,
        block_chunk_size: u64 = rpc_logs::DEFAULT_BLOCK_CHUNK_SIZE,
        max_chunks: u32 = rpc_logs::DEFAULT_MAX_CHUNKS,
        timeout_secs: u64 = rpc_logs::TIMEOUT_SECS,
    }
}

config_struct! {
    pub struct SourcesConfig {
        /// Strategy order; unknown names are rejected by `Config::validate`
        order: Vec<String> = KNOWN_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        page: PageSourceConfig = PageSourceConfig::default(),
        proxy: ProxySourceConfig = ProxySourceConfig::default(),
        indexer: IndexerSourceConfig = IndexerSourceConfig::default(),
        rpc_logs: RpcLogsSourceConfig = RpcLogsSourceConfig::default(),
    }
}

// ============================================================================
// CACHE TIERS
// ============================================================================

config_struct! {
    pub struct MemoryCacheConfig {
        enabled: bool = true,
    }
}

config_struct! {
    pub struct FileCacheConfig {
        enabled: bool = true,
        /// Empty uses `<data dir>/holder_count.json`
        path: String = String::new(),
    }
}

config_struct! {
    pub struct RemoteCacheConfig {
        enabled: bool = false,
        /// Store base URL; reads hit `{read_url}/item/{key}`
        read_url: String = String::new(),
        read_token: String = String::new(),
        /// Empty makes the tier read-only
        write_url: String = String::new(),
        write_token: String = String::new(),
        /// Empty uses `holder-count-<address>`
        key: String = String::new(),
    }
}

config_struct! {
    pub struct CacheConfig {
        /// Upper bound on a single tier read or write
        io_timeout_secs: u64 = 5,
        memory: MemoryCacheConfig = MemoryCacheConfig::default(),
        file: FileCacheConfig = FileCacheConfig::default(),
        remote: RemoteCacheConfig = RemoteCacheConfig::default(),
    }
}

// ============================================================================
// WEBSERVER
// ============================================================================

config_struct! {
    pub struct WebserverConfig {
        enabled: bool = true,
        host: String = "127.0.0.1".to_string(),
        port: u16 = 8080,
        /// Bearer token for admin routes; empty disables them
        admin_token: String = String::new(),
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    pub struct Config {
        token: TokenConfig = TokenConfig::default(),
        holders: HoldersConfig = HoldersConfig::default(),
        sources: SourcesConfig = SourcesConfig::default(),
        cache: CacheConfig = CacheConfig::default(),
        webserver: WebserverConfig = WebserverConfig::default(),
    }
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl WebserverConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        Ok(())
    }

    /// Get the full bind address (host:port)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn admin_enabled(&self) -> bool {
        !self.admin_token.trim().is_empty()
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.token.address.trim().is_empty() {
            return Err("token.address cannot be empty".to_string());
        }

        if self.holders.max_plausible_count <= 1 {
            return Err("holders.max_plausible_count must be greater than 1".to_string());
        }

        if !(1..self.holders.max_plausible_count).contains(&self.holders.bootstrap_count) {
            return Err(format!(
                "holders.bootstrap_count {} is outside 1..{}",
                self.holders.bootstrap_count, self.holders.max_plausible_count
            ));
        }

        for name in &self.sources.order {
            if !KNOWN_STRATEGIES.contains(&name.as_str()) {
                return Err(format!(
                    "Unknown strategy '{}' in sources.order (expected one of {:?})",
                    name, KNOWN_STRATEGIES
                ));
            }
        }

        let timeouts = [
            ("sources.page.timeout_secs", self.sources.page.timeout_secs),
            ("sources.proxy.timeout_secs", self.sources.proxy.timeout_secs),
            ("sources.indexer.timeout_secs", self.sources.indexer.timeout_secs),
            ("sources.rpc_logs.timeout_secs", self.sources.rpc_logs.timeout_secs),
            ("cache.io_timeout_secs", self.cache.io_timeout_secs),
        ];
        if let Some((key, _)) = timeouts.iter().find(|(_, secs)| *secs == 0) {
            return Err(format!("{} must be greater than 0", key));
        }

        if self.cache.remote.enabled && self.cache.remote.read_url.trim().is_empty() {
            return Err("cache.remote.read_url is required when the remote tier is enabled".to_string());
        }

        self.webserver.validate()
    }
}
