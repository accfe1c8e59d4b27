//! Layered run configuration: built-in defaults, then the TOML file, then command-line
//! flags, then `--set KEY=VALUE` overrides.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::{build_run_config, build_scoring_config};
