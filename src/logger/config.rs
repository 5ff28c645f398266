/// Logger configuration built from command-line flags
///
/// `--quiet` lowers the threshold to warnings, `--verbose` raises it to
/// verbose for every tag. `--debug-<tag>` and `--verbose-<tag>` open a
/// single tag.
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

use super::levels::LogLevel;
use super::tags::LogTag;
use crate::arguments::get_cmd_args;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    /// Tags with debug output enabled
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled
    pub verbose_tags: HashSet<String>,
    /// When non-empty, only these tags are logged (errors always pass)
    pub enabled_tags: HashSet<String>,
    /// `--verbose`: debug and verbose output for every tag
    pub verbose_all: bool,
    pub file_logging: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            enabled_tags: HashSet::new(),
            verbose_all: false,
            file_logging: true,
        }
    }
}

impl LoggerConfig {
    /// Build from an argument list
    pub fn from_args(args: &[String]) -> Self {
        let mut config = LoggerConfig::default();

        for arg in args {
            if arg == "--quiet" || arg == "-q" {
                config.min_level = LogLevel::Warning;
            } else if arg == "--verbose" || arg == "-v" {
                config.min_level = LogLevel::Verbose;
                config.verbose_all = true;
            } else if arg == "--no-log-file" {
                config.file_logging = false;
            } else if let Some(tag) = arg.strip_prefix("--debug-") {
                config.debug_tags.insert(tag.to_lowercase());
            } else if let Some(tag) = arg.strip_prefix("--verbose-") {
                config.verbose_tags.insert(tag.to_lowercase());
                config.debug_tags.insert(tag.to_lowercase());
            }
        }

        // per-tag flags need the threshold to let those levels through
        if config.min_level == LogLevel::Info {
            if !config.verbose_tags.is_empty() {
                config.min_level = LogLevel::Verbose;
            } else if !config.debug_tags.is_empty() {
                config.min_level = LogLevel::Debug;
            }
        }

        config
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut current) => *current = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

pub fn update_logger_config<F>(update: F)
where
    F: FnOnce(&mut LoggerConfig),
{
    let mut config = get_logger_config();
    update(&mut config);
    set_logger_config(config);
}

/// Configure from the process arguments
pub fn init_from_args() {
    set_logger_config(LoggerConfig::from_args(&get_cmd_args()));
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = get_logger_config();
    config.verbose_all || config.debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    get_logger_config().verbose_tags.contains(&tag.to_debug_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::from_args(&args(&["holderwatch"]));
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.debug_tags.is_empty());
    }

    #[test]
    fn test_debug_flag_opens_tag() {
        let config = LoggerConfig::from_args(&args(&["holderwatch", "--debug-sources"]));
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.debug_tags.contains("sources"));
        assert!(!config.debug_tags.contains("cache"));
    }

    #[test]
    fn test_quiet_and_verbose() {
        let quiet = LoggerConfig::from_args(&args(&["holderwatch", "-q"]));
        assert_eq!(quiet.min_level, LogLevel::Warning);

        let verbose = LoggerConfig::from_args(&args(&["holderwatch", "--verbose-cache"]));
        assert_eq!(verbose.min_level, LogLevel::Verbose);
        assert!(verbose.verbose_tags.contains("cache"));
        assert!(verbose.debug_tags.contains("cache"));
        assert!(!verbose.verbose_all);
    }
}
