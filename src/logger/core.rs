/// Filtering and dispatch
use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Filtering rules:
/// 1. Errors are always shown
/// 2. Anything above the threshold is dropped
/// 3. Debug needs --debug-<tag> (or --verbose)
/// 4. Verbose needs --verbose or --verbose-<tag>
/// 5. If enabled_tags is non-empty, the tag must be in it
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    let config = get_logger_config();
    passes_filter(&config, tag, level, is_debug_enabled_for_tag(tag), is_verbose_enabled_for_tag(tag))
}

fn passes_filter(
    config: &LoggerConfig,
    tag: &LogTag,
    level: LogLevel,
    debug_enabled: bool,
    verbose_enabled: bool,
) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    if level > config.min_level {
        return false;
    }

    if level == LogLevel::Debug {
        return debug_enabled;
    }

    if level == LogLevel::Verbose {
        return config.verbose_all || verbose_enabled;
    }

    if !config.enabled_tags.is_empty() && !config.enabled_tags.contains(&tag.to_debug_key()) {
        return false;
    }

    true
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }

    super::format::format_and_log(tag, level.as_str(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_rules() {
        let config = LoggerConfig::from_args(&["holderwatch".to_string(), "--debug-cache".to_string()]);
        let cache = LogTag::Cache;
        let sources = LogTag::Sources;

        assert!(passes_filter(&config, &cache, LogLevel::Error, false, false));
        assert!(passes_filter(&config, &cache, LogLevel::Info, true, false));
        assert!(passes_filter(&config, &cache, LogLevel::Debug, true, false));
        assert!(!passes_filter(&config, &sources, LogLevel::Debug, false, false));
        assert!(!passes_filter(&config, &cache, LogLevel::Verbose, true, false));
    }

    #[test]
    fn test_quiet_drops_info() {
        let config = LoggerConfig::from_args(&["holderwatch".to_string(), "--quiet".to_string()]);
        assert!(!passes_filter(&config, &LogTag::Holders, LogLevel::Info, false, false));
        assert!(passes_filter(&config, &LogTag::Holders, LogLevel::Warning, false, false));
    }

    #[test]
    fn test_enabled_tags_restrict_info() {
        let mut config = LoggerConfig::default();
        config.enabled_tags.insert("holders".to_string());
        assert!(passes_filter(&config, &LogTag::Holders, LogLevel::Info, false, false));
        assert!(!passes_filter(&config, &LogTag::Cache, LogLevel::Info, false, false));
        assert!(passes_filter(&config, &LogTag::Cache, LogLevel::Error, false, false));
    }
}
