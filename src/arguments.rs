/// Centralized argument handling for HolderWatch
///
/// - CMD_ARGS storage with thread-safe access
/// - Debug flag checks used by the logger
/// - Server flags (`--config`, `--port`, `--host`)
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
/// Used by binaries and tests to override the default env::args() collection
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => {
            // Fallback to env::args if mutex is poisoned
            env::args().collect()
        }
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    has_arg_in(&get_cmd_args(), arg)
}

/// Gets the value of a command-line argument that follows a flag
pub fn get_arg_value(flag: &str) -> Option<String> {
    arg_value_in(&get_cmd_args(), flag)
}

pub fn has_arg_in(args: &[String], arg: &str) -> bool {
    args.iter().any(|a| a == arg)
}

pub fn arg_value_in(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|v| !v.starts_with("--"))
        .cloned()
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// Debug flags understood by the logger, one per log tag
pub const DEBUG_FLAGS: &[(&str, &str)] = &[
    ("--debug-system", "System startup and shutdown"),
    ("--debug-holders", "Orchestrator decisions"),
    ("--debug-sources", "Source strategy attempts"),
    ("--debug-cache", "Cache tier reads and writes"),
    ("--debug-ratelimit", "Rate limiter decisions"),
    ("--debug-config", "Configuration loading"),
    ("--debug-webserver", "HTTP requests"),
];

pub fn is_debug_holders_enabled() -> bool {
    has_arg("--debug-holders")
}

pub fn is_debug_sources_enabled() -> bool {
    has_arg("--debug-sources")
}

pub fn is_debug_cache_enabled() -> bool {
    has_arg("--debug-cache")
}

pub fn is_debug_webserver_enabled() -> bool {
    has_arg("--debug-webserver")
}

/// Checks if any debug mode is enabled
pub fn is_any_debug_enabled() -> bool {
    !get_enabled_debug_modes().is_empty()
}

/// Gets a list of all enabled debug modes
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let args = get_cmd_args();
    DEBUG_FLAGS
        .iter()
        .filter(|(flag, _)| has_arg_in(&args, flag))
        .map(|(flag, _)| flag.trim_start_matches("--debug-"))
        .collect()
}

// =============================================================================
// SERVER FLAGS
// =============================================================================

/// `--config <path>` override for the config file location
pub fn get_config_path_override() -> Option<PathBuf> {
    get_arg_value("--config").map(PathBuf::from)
}

/// `--port <n>` override for the webserver port
pub fn get_port_override() -> Option<u16> {
    get_arg_value("--port").and_then(|p| p.parse().ok())
}

/// `--host <addr>` override for the webserver bind host
pub fn get_host_override() -> Option<String> {
    get_arg_value("--host")
}

// =============================================================================
// HELP SYSTEM
// =============================================================================

pub fn print_help() {
    println!("HolderWatch - token holder count service");
    println!();
    println!("USAGE:");
    println!("    holderwatch [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --config <path>           Config file (default: <data dir>/config.toml)");
    println!("    --host <addr>             Bind host override");
    println!("    --port <port>             Bind port override");
    println!("    --quiet, -q               Only warnings and errors");
    println!("    --verbose, -v             Verbose logging for every tag");
    println!("    --no-log-file             Console output only");
    println!("    --help, -h                Show this help message");
    println!("    --version, -V             Show version");
    println!();
    println!("DEBUG FLAGS:");
    for (flag, description) in DEBUG_FLAGS {
        println!("    {:<26}{}", flag, description);
    }
    println!();
    println!("EXAMPLES:");
    println!("    holderwatch --port 3000");
    println!("    holderwatch --config ./config.toml --debug-sources --debug-cache");
}

// =============================================================================
// COMMON ARGUMENT PATTERNS
// =============================================================================

pub mod patterns {
    use super::*;

    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }

    pub fn is_version_requested() -> bool {
        has_arg("--version") || has_arg("-V")
    }

    pub fn is_quiet_mode() -> bool {
        has_arg("--quiet") || has_arg("-q")
    }

    pub fn is_verbose_mode() -> bool {
        has_arg("--verbose") || has_arg("-v")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_has_arg_in() {
        let a = args(&["holderwatch", "--debug-cache"]);
        assert!(has_arg_in(&a, "--debug-cache"));
        assert!(!has_arg_in(&a, "--debug-sources"));
    }

    #[test]
    fn test_arg_value_in() {
        let a = args(&["holderwatch", "--port", "3000", "--config", "--quiet"]);
        assert_eq!(arg_value_in(&a, "--port"), Some("3000".to_string()));
        // a following flag is not a value
        assert_eq!(arg_value_in(&a, "--config"), None);
        assert_eq!(arg_value_in(&a, "--host"), None);
    }

    #[test]
    fn test_global_args() {
        set_cmd_args(args(&[
            "holderwatch",
            "--debug-sources",
            "--port",
            "9000",
            "--config",
            "/etc/holderwatch.toml",
        ]));

        assert_eq!(get_cmd_args().len(), 6);
        assert!(is_debug_sources_enabled());
        assert!(!is_debug_cache_enabled());
        assert!(is_any_debug_enabled());
        assert_eq!(get_enabled_debug_modes(), vec!["sources"]);
        assert_eq!(get_port_override(), Some(9000));
        assert_eq!(
            get_config_path_override(),
            Some(PathBuf::from("/etc/holderwatch.toml"))
        );
        assert!(!patterns::is_help_requested());
    }
}
