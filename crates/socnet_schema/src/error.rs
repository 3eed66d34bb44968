//! Error types for schema library loading.

use socnet_doc::DocError;
use std::path::PathBuf;

/// Errors that can occur while loading a schema library.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A schema file is not valid YAML.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The offending file (or `<memory>` for in-memory text).
        path: PathBuf,
        /// The underlying document error.
        #[source]
        source: DocError,
    },

    /// A schema file parsed but is not a `name -> schema` mapping.
    #[error("invalid schema library {path}: {reason}")]
    InvalidLibrary {
        /// The offending file.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },
}
