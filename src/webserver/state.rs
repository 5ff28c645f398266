/// Shared application state for the webserver
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::WebserverConfig;
use crate::holders::HolderCountService;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HolderCountService>,

    /// Bearer token for admin routes; `None` disables them
    pub admin_token: Option<String>,

    /// Server startup time
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: Arc<HolderCountService>, config: &WebserverConfig) -> Self {
        Self {
            service,
            admin_token: config
                .admin_enabled()
                .then(|| config.admin_token.trim().to_string()),
            startup_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}
