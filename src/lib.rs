pub mod arguments;
pub mod config;
pub mod constants;
pub mod holders;
pub mod logger;
pub mod paths;
pub mod run;
pub mod utils;

#[cfg(feature = "web")]
pub mod webserver;
