//! Error types for document access and YAML conversion.

use crate::node::NodeKind;

/// Errors produced while reading, navigating, or writing a [`Node`](crate::Node) tree.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The YAML text could not be parsed or emitted.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A node had a different shape than the accessor required.
    #[error("expected {expected} for {context}, found {found}")]
    WrongKind {
        /// What was being accessed (a key name, or `node` for a bare value).
        context: String,
        /// The kind the accessor needed.
        expected: NodeKind,
        /// The kind actually present.
        found: NodeKind,
    },

    /// A required mapping key was absent.
    #[error("missing key '{0}'")]
    MissingKey(String),

    /// A dotted key path was empty or had no usable segments.
    #[error("invalid key path '{0}'")]
    InvalidKeyPath(String),
}
