//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const CONFIG_FILE: &str = "socnet.toml";

/// Walks up from `start` to find the directory containing `socnet.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Loads and validates a `socnet.toml` configuration from a project directory.
///
/// Reads `<project_dir>/socnet.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    log::debug!("loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, &path.display().to_string())
}

/// Parses and validates a `socnet.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    parse_config(content, CONFIG_FILE)
}

fn parse_config(content: &str, origin: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        origin: origin.to_string(),
        message: e.message().to_string(),
    })?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and configuration values are consistent.
pub fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.trim().is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }
    if config.output.dir.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "output.dir must not be empty".to_string(),
        ));
    }
    for (section, paths) in [
        ("library.module", &config.library.module),
        ("library.bus", &config.library.bus),
    ] {
        if paths.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::ValidationError(format!(
                "{section} contains an empty path"
            )));
        }
    }
    Ok(())
}
