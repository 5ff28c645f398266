use anyhow::{Context, Result};
use holderwatch::{
    arguments::{get_enabled_debug_modes, patterns, print_help},
    logger::{self, LogTag},
};

/// Main entry point for HolderWatch
///
/// Serves the holder count API until Ctrl+C.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if patterns::is_help_requested() {
        print_help();
        return Ok(());
    }

    if patterns::is_version_requested() {
        println!("holderwatch {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Logger needs the logs directory to create its file
    holderwatch::paths::ensure_all_directories()
        .map_err(anyhow::Error::msg)
        .context("Failed to create required directories")?;

    logger::init();
    logger::info(
        LogTag::System,
        &format!("HolderWatch {} starting up...", env!("CARGO_PKG_VERSION")),
    );

    let debug_modes = get_enabled_debug_modes();
    if !debug_modes.is_empty() {
        logger::info(
            LogTag::System,
            &format!("Debug modes enabled: {}", debug_modes.join(", ")),
        );
    }

    if let Err(e) = holderwatch::run::run_server().await {
        logger::error(LogTag::System, &format!("HolderWatch failed: {}", e));
        logger::flush();
        return Err(anyhow::Error::msg(e));
    }

    Ok(())
}
