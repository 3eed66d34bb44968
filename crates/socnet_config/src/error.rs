//! Errors raised while reading `socnet.toml`.

use std::path::PathBuf;

/// A project configuration that could not be read, parsed, or accepted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file at `path` could not be read.
    #[error("cannot read {}: {source}", path.display())]
    IoError {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// `origin` is not valid TOML or does not match the configuration shape.
    #[error("{origin}: {message}")]
    ParseError {
        /// File path, or `socnet.toml` for in-memory content.
        origin: String,
        /// The TOML deserializer's message.
        message: String,
    },

    /// A required key such as `project.name` is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value is present but unusable.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_error_names_the_file_and_keeps_source() {
        let err = ConfigError::IoError {
            path: PathBuf::from("chip/socnet.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "cannot read chip/socnet.toml: no such file");
        assert!(err.source().is_some());
    }

    #[test]
    fn parse_error_is_prefixed_with_origin() {
        let err = ConfigError::ParseError {
            origin: "socnet.toml".to_string(),
            message: "expected `=`".to_string(),
        };
        assert_eq!(err.to_string(), "socnet.toml: expected `=`");
    }

    #[test]
    fn field_and_value_errors() {
        assert_eq!(
            ConfigError::MissingField("project.name".to_string()).to_string(),
            "missing required field: project.name"
        );
        assert_eq!(
            ConfigError::ValidationError("output.dir must not be empty".to_string()).to_string(),
            "invalid configuration: output.dir must not be empty"
        );
    }
}
