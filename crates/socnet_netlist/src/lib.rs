//! Netlist expansion passes and consistency checks.
//!
//! A netlist is loaded from one or more YAML sources (merged in order),
//! validated, and then rewritten by two passes: bus expansion turns each bus
//! group into one net per bus signal, and link resolution turns the `link`
//! and `uplink` shorthands on instance ports into nets and top-level ports.
//! The resulting document can be checked for width and drive consistency.
//!
//! # Usage
//!
//! ```ignore
//! let loaded = load_netlist_files(&paths)?;
//! let out = process(loaded.document, &library)?;
//! let findings = check_netlist(&out.document, &library, &CheckOptions::default());
//! ```

#![warn(missing_docs)]

pub mod bus;
pub mod check;
pub mod codes;
pub mod error;
pub mod link;
pub mod loader;
pub mod net;
pub mod pass;
pub mod unconnected;

pub use bus::{bus_refs, expand_buses, BusRef};
pub use check::{
    check_netlist, check_port_direction_consistency, check_port_width_consistency,
    connection_role, connection_width, CheckOptions, DirectionStatus, DirectionTally,
};
pub use error::NetlistError;
pub use link::{resolve_links, DEFAULT_PORT_TYPE};
pub use loader::{
    load_netlist, load_netlist_files, load_netlist_from_strs, validate_structure, LoadedNetlist,
    NetlistSource,
};
pub use net::{attach, instance_module, net_connections, Attach, Connection, TOP_LEVEL};
pub use pass::PassOutput;
pub use unconnected::{unconnected_ports, UnconnectedPort, UnconnectedReport};

use socnet_doc::Node;
use socnet_schema::SchemaProvider;

/// Validates a merged netlist and runs bus expansion followed by link resolution.
///
/// Warnings from both passes are returned in pass order. Structural problems
/// and uplink conflicts abort with an error.
pub fn process(doc: Node, schemas: &dyn SchemaProvider) -> Result<PassOutput, NetlistError> {
    validate_structure(&doc)?;
    log::debug!("netlist structure valid; expanding buses");
    let out = expand_buses(doc, schemas)?.then(|doc| resolve_links(doc, schemas))?;
    log::info!(
        "netlist processed with {} warning(s)",
        out.diagnostics.len()
    );
    Ok(out)
}
