//! Parsing and validation of `socnet.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`] naming the schema libraries, the output directory, and the
//! consistency checks to run.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    find_project_root, load_config, load_config_file, load_config_from_str, validate_config,
    CONFIG_FILE,
};
pub use types::*;
