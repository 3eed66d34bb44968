//! Nets and the connections attached to them.
//!
//! A net is stored as a mapping of participant name to `{port, bits?}`.
//! The participant is an instance name, or [`TOP_LEVEL`] for the chip's own
//! top-level port.

use socnet_doc::{Mapping, MappingExt, Node};
use std::fmt;

/// Participant name used for a top-level port connection.
pub const TOP_LEVEL: &str = "top_level";

/// One side of a net.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Connection {
    /// A port on a module instance.
    Module {
        /// The instance name.
        instance: String,
        /// The module port name.
        port: String,
        /// Bit-select applied on this side (`[7:0]`).
        bits: Option<String>,
    },
    /// A top-level port of the netlist.
    TopLevel {
        /// The top-level port name.
        port: String,
        /// Bit-select applied on this side.
        bits: Option<String>,
    },
}

impl Connection {
    /// Creates a module-port connection without a bit-select.
    pub fn module(instance: &str, port: &str) -> Self {
        Connection::Module {
            instance: instance.to_string(),
            port: port.to_string(),
            bits: None,
        }
    }

    /// Creates a top-level port connection without a bit-select.
    pub fn top_level(port: &str) -> Self {
        Connection::TopLevel {
            port: port.to_string(),
            bits: None,
        }
    }

    /// Adds a bit-select.
    pub fn with_bits(mut self, select: &str) -> Self {
        match &mut self {
            Connection::Module { bits, .. } | Connection::TopLevel { bits, .. } => {
                *bits = Some(select.to_string());
            }
        }
        self
    }

    /// The port name on this side.
    pub fn port(&self) -> &str {
        match self {
            Connection::Module { port, .. } | Connection::TopLevel { port, .. } => port,
        }
    }

    /// The bit-select on this side, if any.
    pub fn bits(&self) -> Option<&str> {
        match self {
            Connection::Module { bits, .. } | Connection::TopLevel { bits, .. } => bits.as_deref(),
        }
    }

    /// The participant key this connection is stored under.
    pub fn participant(&self) -> &str {
        match self {
            Connection::Module { instance, .. } => instance,
            Connection::TopLevel { .. } => TOP_LEVEL,
        }
    }

    /// Reads a connection from a net entry. Returns `None` when the entry
    /// has no scalar `port`.
    pub fn from_entry(participant: &str, attrs: &Node) -> Option<Self> {
        let port = attrs.get("port").and_then(Node::scalar_text)?;
        let bits = attrs
            .get("bits")
            .and_then(Node::scalar_text)
            .map(str::to_string);
        let conn = if participant == TOP_LEVEL {
            Connection::TopLevel {
                port: port.to_string(),
                bits,
            }
        } else {
            Connection::Module {
                instance: participant.to_string(),
                port: port.to_string(),
                bits,
            }
        };
        Some(conn)
    }

    /// Builds the `{port, bits?}` entry stored in a net.
    pub fn to_entry(&self) -> Node {
        let mut attrs = Mapping::new();
        attrs.insert(Node::string("port"), Node::string(self.port()));
        if let Some(bits) = self.bits() {
            attrs.insert(Node::string("bits"), Node::string(bits));
        }
        Node::Mapping(attrs)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Module { instance, port, .. } => write!(f, "{instance}.{port}")?,
            Connection::TopLevel { port, .. } => write!(f, "{TOP_LEVEL}.{port}")?,
        }
        if let Some(bits) = self.bits() {
            write!(f, "{bits}")?;
        }
        Ok(())
    }
}

/// Result of attaching a connection to a net.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attach {
    /// The connection was added.
    Added,
    /// The same participant, port, and bit-select were already present.
    Duplicate,
    /// The participant is already on the net through another port or
    /// bit-select; the existing connection was kept.
    Conflict {
        /// Description of the connection already present.
        existing: String,
    },
}

/// Adds `conn` to the net mapping `net`, keeping the first connection per participant.
pub fn attach(net: &mut Mapping, conn: &Connection) -> Attach {
    if let Some(existing) = net.lookup(conn.participant()) {
        let existing_port = existing.get("port").and_then(Node::scalar_text);
        let existing_bits = existing.get("bits").and_then(Node::scalar_text);
        if existing_port == Some(conn.port()) && existing_bits == conn.bits() {
            return Attach::Duplicate;
        }
        let existing = match existing_bits {
            Some(bits) => format!("{}{bits}", existing_port.unwrap_or("?")),
            None => existing_port.unwrap_or("?").to_string(),
        };
        return Attach::Conflict { existing };
    }
    net.insert(Node::string(conn.participant()), conn.to_entry());
    Attach::Added
}

/// Lists the well-formed connections of a net, in participant order.
pub fn net_connections(net: &Node) -> Vec<Connection> {
    let Ok(map) = net.as_mapping() else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(participant, attrs)| {
            Connection::from_entry(participant.scalar_text()?, attrs)
        })
        .collect()
}

/// Returns the module name of `instance`, if the instance exists and names one.
pub fn instance_module<'a>(doc: &'a Node, instance: &str) -> Option<&'a str> {
    doc.get("instance")?
        .get(instance)?
        .get("module")
        .and_then(Node::scalar_text)
}
