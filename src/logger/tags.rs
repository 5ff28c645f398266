/// Log tags identify the subsystem a line comes from
///
/// Each tag maps to a `--debug-<key>` / `--verbose-<key>` flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Holders,
    Sources,
    Cache,
    RateLimit,
    Config,
    Webserver,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used in `--debug-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Holders => "holders".to_string(),
            LogTag::Sources => "sources".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::RateLimit => "ratelimit".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Webserver => "webserver".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label written to the log file
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::System => "SYSTEM".to_string(),
            LogTag::Holders => "HOLDERS".to_string(),
            LogTag::Sources => "SOURCES".to_string(),
            LogTag::Cache => "CACHE".to_string(),
            LogTag::RateLimit => "RATELIMIT".to_string(),
            LogTag::Config => "CONFIG".to_string(),
            LogTag::Webserver => "WEBSERVER".to_string(),
            LogTag::Test => "TEST".to_string(),
            LogTag::Other(s) => s.to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_keys() {
        assert_eq!(LogTag::RateLimit.to_debug_key(), "ratelimit");
        assert_eq!(LogTag::Other("Probe".to_string()).to_debug_key(), "probe");
        assert_eq!(LogTag::Sources.to_plain_string(), "SOURCES");
    }
}
