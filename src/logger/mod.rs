//! Structured logging for HolderWatch
//!
//! Level functions take a [`LogTag`] and a message:
//!
//! ```rust
//! use holderwatch::logger::{self, LogTag};
//!
//! logger::info(LogTag::Holders, "Serving live count 2003");
//! logger::debug(LogTag::Sources, "page: HTTP 200"); // Only with --debug-sources
//! logger::verbose(LogTag::Cache, "file tier bytes: ..."); // Only with --verbose
//! ```
//!
//! Call [`init`] once at startup. It reads `--debug-<tag>`, `--verbose`
//! and `--quiet` from the command line and opens the daily log file.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, set_logger_config, update_logger_config, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Must run before services start; logging before it uses defaults and
/// writes to the console only.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown even with `--quiet`)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (normal operation)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when `--debug-<tag>` is passed for this tag.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level
///
/// Only shown with `--verbose` or `--verbose-<tag>`.
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Flush pending file writes; call during shutdown
pub fn flush() {
    file::flush_file_logging();
}
