/// Background holder count refresh
///
/// Calls the orchestrator on a fixed interval so the cache stays warm even
/// when no request arrives. Goes through the rate limiter like any caller.
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use super::service::HolderCountService;
use crate::logger::{self, LogTag};
use crate::utils::check_shutdown_or_delay;

/// Run until `shutdown` fires. An interval of zero returns immediately.
pub async fn start_holder_refresher(
    service: Arc<HolderCountService>,
    interval: Duration,
    shutdown: Arc<Notify>,
) -> u64 {
    if interval.is_zero() {
        logger::debug(LogTag::Holders, "Background refresh disabled");
        return 0;
    }

    logger::info(
        LogTag::Holders,
        &format!("Starting holder count refresh every {}s", interval.as_secs()),
    );

    let mut cycles = 0u64;
    loop {
        let response = service.resolve().await;
        cycles += 1;
        logger::debug(
            LogTag::Holders,
            &format!(
                "Refresh cycle {}: {} holders ({})",
                cycles, response.holders, response.source
            ),
        );

        if check_shutdown_or_delay(&shutdown, interval).await {
            logger::info(LogTag::Holders, "Holder count refresh shutting down");
            break;
        }
    }
    cycles
}
