//! Fatal netlist processing errors.

use std::path::PathBuf;

/// Errors that abort netlist loading or a netlist pass.
///
/// Per-item problems that leave the rest of the netlist usable are reported
/// as warnings in [`PassOutput`](crate::PassOutput) instead.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// No netlist source was given to the loader.
    #[error("no netlist sources given")]
    NoSources,

    /// A mandatory section is missing or has the wrong shape.
    #[error("invalid netlist structure: {0}")]
    InvalidStructure(String),

    /// A source could not be parsed as a document.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// The source path or name.
        path: String,
        /// The parser's message.
        message: String,
    },

    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An uplink names a module, port, or direction that cannot be found.
    #[error("cannot resolve uplink of `{instance}.{port}`: {reason}")]
    UnknownReference {
        /// The instance carrying the uplink.
        instance: String,
        /// The instance port carrying the uplink.
        port: String,
        /// What was missing.
        reason: String,
    },

    /// A reused top-level port has an incompatible direction.
    #[error(
        "direction mismatch for uplink port `{port}` from instance `{instance}`: \
         expected {expected}, existing {existing}"
    )]
    IncompatibleDirection {
        /// The top-level port name.
        port: String,
        /// The instance whose uplink clashed.
        instance: String,
        /// The direction this uplink implies.
        expected: String,
        /// The direction already declared on the port.
        existing: String,
    },

    /// A reused top-level port has an incompatible width.
    #[error(
        "width mismatch for uplink port `{port}` from instance `{instance}`: \
         expected {expected} bits, existing {existing} bits"
    )]
    IncompatibleWidth {
        /// The top-level port name.
        port: String,
        /// The instance whose uplink clashed.
        instance: String,
        /// The width this uplink implies.
        expected: u32,
        /// The width already declared on the port.
        existing: u32,
    },
}
