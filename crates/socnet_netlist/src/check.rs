//! Per-net width and direction consistency checks.
//!
//! Both checks are advisory: they report findings and never modify the
//! document. [`check_netlist`] runs them over every net and turns the
//! findings into diagnostics.

use crate::codes;
use crate::net::{instance_module, net_connections, Connection};
use crate::unconnected::unconnected_ports;
use socnet_common::{bit_ranges_cover, bit_select_width, port_width, Direction};
use socnet_diagnostics::Diagnostic;
use socnet_doc::Node;
use socnet_schema::SchemaProvider;

/// Drive classification of a net.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionStatus {
    /// Nothing on the net can drive it.
    Undriven,
    /// More than one connection contends to drive the net.
    Multidrive,
    /// Exactly one driver, or only bidirectional connections.
    Valid,
}

/// Counts of connection roles on one net, seen from the net.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionTally {
    /// Connections that only read the net.
    pub input: usize,
    /// Connections that drive the net.
    pub output: usize,
    /// Bidirectional connections.
    pub inout: usize,
    /// Connections whose direction is undeclared.
    pub unknown: usize,
}

impl DirectionTally {
    /// Adds one connection role.
    pub fn record(&mut self, role: Option<Direction>) {
        match role {
            Some(Direction::Input) => self.input += 1,
            Some(Direction::Output) => self.output += 1,
            Some(Direction::Inout) => self.inout += 1,
            None => self.unknown += 1,
        }
    }

    /// Classifies the net.
    ///
    /// Inouts count as drivers. No driver is undriven, more than one is
    /// multidrive.
    pub fn classify(&self) -> DirectionStatus {
        let drivers = self.output + self.inout;
        if drivers == 0 {
            DirectionStatus::Undriven
        } else if drivers > 1 {
            DirectionStatus::Multidrive
        } else {
            DirectionStatus::Valid
        }
    }
}

fn top_level_port<'a>(doc: &'a Node, port: &str) -> Option<&'a Node> {
    doc.get("port")?.get(port)
}

/// Declared type string of the port on this side of a connection.
fn declared_type<'a>(
    doc: &'a Node,
    schemas: &'a dyn SchemaProvider,
    conn: &Connection,
) -> Option<&'a str> {
    match conn {
        Connection::TopLevel { port, .. } => top_level_port(doc, port)?
            .get("type")
            .and_then(Node::scalar_text),
        Connection::Module { instance, port, .. } => schemas
            .module_schema(instance_module(doc, instance)?)?
            .port(port)?
            .type_name
            .as_deref(),
    }
}

/// Effective bit width of a connection, or 0 when it cannot be determined.
///
/// The declared port type gives the width; a bit-select on the connection
/// overrides it.
pub fn connection_width(doc: &Node, schemas: &dyn SchemaProvider, conn: &Connection) -> u32 {
    let declared = declared_type(doc, schemas, conn)
        .and_then(port_width)
        .unwrap_or(0);
    match conn.bits().and_then(bit_select_width) {
        Some(selected) if selected > 0 => selected,
        _ => declared,
    }
}

/// Role of a connection as seen from the net.
///
/// A module port keeps its declared direction. A top-level port is reversed:
/// a chip input drives the net, a chip output reads it.
pub fn connection_role(
    doc: &Node,
    schemas: &dyn SchemaProvider,
    conn: &Connection,
) -> Option<Direction> {
    match conn {
        Connection::TopLevel { port, .. } => top_level_port(doc, port)?
            .get("direction")
            .and_then(Node::scalar_text)
            .and_then(Direction::parse)
            .map(Direction::reversed),
        Connection::Module { instance, port, .. } => {
            schemas
                .module_schema(instance_module(doc, instance)?)?
                .port(port)?
                .direction
        }
    }
}

/// Returns `true` if all resolvable widths on a net agree.
///
/// Zero or one connection is trivially consistent, and connections whose
/// width is unknown are ignored. When some connections carry bit-selects
/// that together cover every bit of the widest full-width connection, the
/// net is consistent even though individual widths differ.
pub fn check_port_width_consistency(
    doc: &Node,
    schemas: &dyn SchemaProvider,
    connections: &[Connection],
) -> bool {
    if connections.len() <= 1 {
        return true;
    }
    let widths: Vec<u32> = connections
        .iter()
        .map(|c| connection_width(doc, schemas, c))
        .collect();
    widths_consistent(connections, &widths)
}

fn widths_consistent(connections: &[Connection], widths: &[u32]) -> bool {
    let selects: Vec<&str> = connections.iter().filter_map(Connection::bits).collect();
    if !selects.is_empty() {
        let target = connections
            .iter()
            .zip(widths)
            .filter(|(c, _)| c.bits().is_none())
            .map(|(_, &w)| w)
            .max()
            .unwrap_or(0);
        if target > 0 && bit_ranges_cover(&selects, target) {
            return true;
        }
    }

    let mut resolved = widths.iter().copied().filter(|&w| w > 0);
    match resolved.next() {
        Some(reference) => resolved.all(|w| w == reference),
        None => true,
    }
}

/// Classifies the drivers on a net.
pub fn check_port_direction_consistency(
    doc: &Node,
    schemas: &dyn SchemaProvider,
    connections: &[Connection],
) -> DirectionStatus {
    let mut tally = DirectionTally::default();
    for conn in connections {
        tally.record(connection_role(doc, schemas, conn));
    }
    tally.classify()
}

/// Which checks [`check_netlist`] runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// Check width consistency on every net.
    pub width: bool,
    /// Check drive consistency on every net.
    pub direction: bool,
    /// Report module ports that are on no net.
    pub unconnected: bool,
    /// Report findings as errors instead of warnings.
    pub strict: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            width: true,
            direction: true,
            unconnected: false,
            strict: false,
        }
    }
}

/// Runs the enabled checks over every net of an expanded netlist.
pub fn check_netlist(
    doc: &Node,
    schemas: &dyn SchemaProvider,
    options: &CheckOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let Some(nets) = doc.get("net").and_then(|n| n.as_mapping().ok()) {
        for (key, net) in nets {
            let Some(name) = key.scalar_text() else {
                continue;
            };
            let connections = net_connections(net);
            if connections.is_empty() {
                log::debug!("net `{name}` has no connections; skipping checks");
                continue;
            }

            if options.width && connections.len() > 1 {
                let widths: Vec<u32> = connections
                    .iter()
                    .map(|c| connection_width(doc, schemas, c))
                    .collect();
                if !widths_consistent(&connections, &widths) {
                    let notes: Vec<String> = connections
                        .iter()
                        .zip(&widths)
                        .map(|(c, &w)| match w {
                            0 => format!("{c}: width unknown"),
                            1 => format!("{c}: 1 bit"),
                            n => format!("{c}: {n} bits"),
                        })
                        .collect();
                    diagnostics.push(codes::warn_width_mismatch(name, &notes));
                }
            }

            if options.direction {
                match check_port_direction_consistency(doc, schemas, &connections) {
                    DirectionStatus::Valid => {}
                    DirectionStatus::Undriven => diagnostics.push(codes::warn_undriven(name)),
                    DirectionStatus::Multidrive => {
                        let drivers: Vec<String> = connections
                            .iter()
                            .filter(|c| {
                                connection_role(doc, schemas, c).is_some_and(Direction::can_drive)
                            })
                            .map(ToString::to_string)
                            .collect();
                        diagnostics.push(codes::warn_multidrive(name, &drivers));
                    }
                }
            }
        }
    }

    if options.unconnected {
        diagnostics.extend(
            unconnected_ports(doc, schemas)
                .iter()
                .map(|p| p.to_diagnostic()),
        );
    }

    log::info!("netlist check produced {} finding(s)", diagnostics.len());
    if options.strict {
        diagnostics.into_iter().map(Diagnostic::promoted).collect()
    } else {
        diagnostics
    }
}
