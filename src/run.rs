/// Service lifecycle
///
/// Load config, build the holder service, start the refresher and the
/// webserver, then wait for Ctrl+C and shut both down.
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::{
    arguments,
    config::{self, Config},
    holders::{self, start_holder_refresher, HolderCountService},
    logger::{self, LogTag},
    paths,
};

/// Read the config file (or `--config` override) and apply CLI overrides
pub fn load_runtime_config() -> Result<Config, String> {
    let config_path = arguments::get_config_path_override().unwrap_or_else(paths::get_config_path);
    config::load_config_from_path(&config_path)?;

    let mut config = config::get_config_clone();

    if let Some(port) = arguments::get_port_override() {
        logger::info(LogTag::System, &format!("CLI override: Using port {}", port));
        config.webserver.port = port;
    }

    if let Some(host) = arguments::get_host_override() {
        logger::info(LogTag::System, &format!("CLI override: Using host {}", host));
        if host == "0.0.0.0" {
            logger::warning(
                LogTag::System,
                "Binding to 0.0.0.0 allows remote access - ensure firewall is configured",
            );
        }
        config.webserver.host = host;
    }

    config.validate()?;
    Ok(config)
}

/// Run until Ctrl+C
pub async fn run_server() -> Result<(), String> {
    paths::ensure_all_directories()?;

    let config = load_runtime_config()?;
    let service = Arc::new(holders::build_service(&config)?);
    let shutdown = Arc::new(Notify::new());

    let refresher = spawn_refresher(&service, &config, &shutdown);

    let server = spawn_webserver(&service, &config);

    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::error(
            LogTag::System,
            &format!("Failed to listen for shutdown signal: {}", e),
        );
    }
    logger::info(LogTag::System, "Shutdown requested");

    shutdown.notify_waiters();
    #[cfg(feature = "web")]
    crate::webserver::shutdown();

    if let Some(handle) = refresher {
        match handle.await {
            Ok(cycles) => logger::debug(
                LogTag::System,
                &format!("Refresher stopped after {} cycles", cycles),
            ),
            Err(e) => logger::warning(LogTag::System, &format!("Refresher task failed: {}", e)),
        }
    }

    if let Some(handle) = server {
        match handle.await {
            Ok(Err(e)) => logger::error(LogTag::Webserver, &e),
            Err(e) => logger::error(LogTag::Webserver, &format!("Webserver task failed: {}", e)),
            Ok(Ok(())) => {}
        }
    }

    logger::info(LogTag::System, "HolderWatch stopped");
    logger::flush();
    Ok(())
}

fn spawn_refresher(
    service: &Arc<HolderCountService>,
    config: &Config,
    shutdown: &Arc<Notify>,
) -> Option<tokio::task::JoinHandle<u64>> {
    let interval = config.holders.refresh_interval_secs;
    if interval == 0 {
        logger::debug(LogTag::System, "Background refresh disabled");
        return None;
    }

    logger::info(
        LogTag::System,
        &format!("Background refresh every {}s", interval),
    );
    Some(tokio::spawn(start_holder_refresher(
        Arc::clone(service),
        Duration::from_secs(interval),
        Arc::clone(shutdown),
    )))
}

#[cfg(feature = "web")]
fn spawn_webserver(
    service: &Arc<HolderCountService>,
    config: &Config,
) -> Option<tokio::task::JoinHandle<Result<(), String>>> {
    use crate::webserver::{start_server, state::AppState};

    if !config.webserver.enabled {
        logger::info(LogTag::System, "Webserver disabled in config");
        return None;
    }

    let state = Arc::new(AppState::new(Arc::clone(service), &config.webserver));
    let webserver_config = config.webserver.clone();
    Some(tokio::spawn(async move {
        start_server(state, &webserver_config).await
    }))
}

#[cfg(not(feature = "web"))]
fn spawn_webserver(
    _service: &Arc<HolderCountService>,
    _config: &Config,
) -> Option<tokio::task::JoinHandle<Result<(), String>>> {
    logger::warning(LogTag::System, "Built without the web feature, no HTTP surface");
    None
}
