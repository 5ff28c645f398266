use super::schemas::Config;
/// Configuration utilities - loading, reloading, and access helpers
///
/// - Loading configuration from disk (missing file means defaults)
/// - Environment overrides for secrets
/// - Hot-reloading at runtime
/// - Thread-safe access helpers
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

use crate::logger::{self, LogTag};

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Environment variables that override config values
pub const ENV_INDEXER_API_KEY: &str = "HOLDERWATCH_INDEXER_API_KEY";
pub const ENV_INDEXER_API_KEY_LEGACY: &str = "COVALENT_API_KEY";
pub const ENV_REMOTE_READ_TOKEN: &str = "HOLDERWATCH_REMOTE_READ_TOKEN";
pub const ENV_REMOTE_WRITE_TOKEN: &str = "HOLDERWATCH_REMOTE_WRITE_TOKEN";
pub const ENV_ADMIN_TOKEN: &str = "HOLDERWATCH_ADMIN_TOKEN";
pub const ENV_RPC_URL: &str = "HOLDERWATCH_RPC_URL";

/// Parse a TOML document into a validated config, applying env overrides
pub fn parse_config_str(contents: &str) -> Result<Config, String> {
    let mut config =
        toml::from_str::<Config>(contents).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Read a config file; a missing file yields defaults
pub fn read_config_file(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path.display()),
        );
        return parse_config_str("");
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
    parse_config_str(&contents).map_err(|e| format!("{} ({})", e, path.display()))
}

/// Load configuration from a file and install it as the global config.
/// Loading again replaces the previous value.
pub fn load_config_from_path(path: &Path) -> Result<(), String> {
    let config = read_config_file(path)?;
    install_config(config)?;
    logger::info(
        LogTag::Config,
        &format!("Configuration loaded from {}", path.display()),
    );
    Ok(())
}

/// Reload configuration from disk; the file must exist
pub fn reload_config_from_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Config file '{}' not found", path.display()));
    }
    let config = read_config_file(path)?;
    install_config(config)
}

fn install_config(config: Config) -> Result<(), String> {
    let lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    let mut current = lock
        .write()
        .map_err(|e| format!("Failed to acquire config write lock: {}", e))?;
    *current = config;
    Ok(())
}

/// Overlay secrets from the environment. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(ENV_INDEXER_API_KEY).or_else(|| get(ENV_INDEXER_API_KEY_LEGACY)) {
        config.sources.indexer.api_key = key;
    }
    if let Some(token) = get(ENV_REMOTE_READ_TOKEN) {
        config.cache.remote.read_token = token;
    }
    if let Some(token) = get(ENV_REMOTE_WRITE_TOKEN) {
        config.cache.remote.write_token = token;
    }
    if let Some(token) = get(ENV_ADMIN_TOKEN) {
        config.webserver.admin_token = token;
    }
    if let Some(url) = get(ENV_RPC_URL) {
        config.sources.rpc_logs.rpc_url = url;
    }
}

/// Execute a function with read access to the configuration
///
/// Before any load this sees the defaults.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let lock = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    let config = lock.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&config)
}

/// Get a clone of the entire configuration, for use across await points
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

pub fn is_config_initialized() -> bool {
    CONFIG.get().is_some()
}
