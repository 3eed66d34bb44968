//! Module and bus schema lookup for netlist expansion.
//!
//! A netlist names modules and bus types; the passes in `socnet_netlist`
//! resolve those names through the [`SchemaProvider`] trait. The
//! [`SchemaLibrary`] implementation is loaded from YAML schema files
//! (`*.soc_mod` for modules, `*.soc_bus` for buses) or built in memory.

#![warn(missing_docs)]

pub mod bus;
pub mod error;
pub mod library;
pub mod module;
pub mod provider;

pub use bus::BusSchema;
pub use error::SchemaError;
pub use library::SchemaLibrary;
pub use module::{BusInterface, ModuleSchema, PortDecl};
pub use provider::{name_variants, SchemaProvider};
