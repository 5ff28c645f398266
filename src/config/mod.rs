/// Configuration system
///
/// TOML file parsed into `config_struct!` sections, secrets overlaid from
/// the environment, held in a process-wide `RwLock`.
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    apply_env_overrides, get_config_clone, is_config_initialized, load_config_from_path,
    parse_config_str, read_config_file, reload_config_from_path, with_config,
};
