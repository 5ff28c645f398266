//! Centralized path resolution for HolderWatch
//!
//! All file and directory paths are resolved through this module so the
//! server and the debug tools agree on where data lives.
//!
//! ## Path Strategy
//!
//! - **macOS**: `~/Library/Application Support/HolderWatch/`
//! - **Windows**: `%LOCALAPPDATA%\HolderWatch\`
//! - **Linux**: `$XDG_DATA_HOME/HolderWatch/` (fallback `~/.local/share/HolderWatch/`)
//!
//! `HOLDERWATCH_HOME` overrides the base directory.
//!
//! ## Directory Structure
//!
//! ```text
//! ~/HolderWatch/
//! ├── data/
//! │ ├── config.toml
//! │ └── holder_count.json
//! └── logs/
//!   └── holderwatch_*.log
//! ```

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

// =============================================================================
// BASE DIRECTORY RESOLUTION
// =============================================================================

/// Tracks whether initialization logging has been done
static INITIALIZED: AtomicBool = AtomicBool::new(false);

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(|| {
  let base_dir = resolve_base_directory();
  INITIALIZED.store(true, Ordering::SeqCst);
  base_dir
});

fn resolve_base_directory() -> PathBuf {
  const APP_DIR: &str = "HolderWatch";

  if let Ok(custom) = std::env::var("HOLDERWATCH_HOME") {
    if !custom.trim().is_empty() {
      return PathBuf::from(custom);
    }
  }

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(dir) = dirs::data_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

// =============================================================================
// PRIMARY DIRECTORY ACCESSORS
// =============================================================================

pub fn get_base_directory() -> PathBuf {
  BASE_DIRECTORY.clone()
}

/// Config and the durable local cache tier
pub fn get_data_directory() -> PathBuf {
  BASE_DIRECTORY.join("data")
}

/// Daily log files
pub fn get_logs_directory() -> PathBuf {
  BASE_DIRECTORY.join("logs")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
  get_data_directory().join("config.toml")
}

/// Default location of the file cache tier
pub fn get_holder_cache_path() -> PathBuf {
  get_data_directory().join("holder_count.json")
}

// =============================================================================
// DIRECTORY CREATION
// =============================================================================

/// Ensures all required directories exist
///
/// Should be called early in startup, before the logger opens its file.
pub fn ensure_all_directories() -> Result<(), String> {
  if !is_initialized() {
    eprintln!("Base directory: {}", get_base_directory().display());
  }

  let dirs_to_create = vec![
    ("base", get_base_directory()),
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;

      eprintln!("Created directory: {}", dir.display());
    }
  }

  Ok(())
}

/// Checks if the base directory has been initialized
pub fn is_initialized() -> bool {
  INITIALIZED.load(Ordering::SeqCst)
}

// =============================================================================
// TESTS
// =============================================================================
