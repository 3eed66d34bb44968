//! Netlist locations that identify where a diagnostic applies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The netlist coordinates of a diagnostic.
///
/// Netlist documents have no meaningful byte spans after merging, so a
/// location names the bus group, net, instance, and port involved instead.
/// Any subset may be set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The bus group being expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,
    /// The net involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
    /// The instance involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// The port involved (module port or top-level port).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl Location {
    /// A location that points nowhere in particular.
    pub fn none() -> Self {
        Self::default()
    }

    /// A location naming a bus group.
    pub fn bus(name: impl Into<String>) -> Self {
        Self::default().with_bus(name)
    }

    /// A location naming a net.
    pub fn net(name: impl Into<String>) -> Self {
        Self::default().with_net(name)
    }

    /// A location naming an instance.
    pub fn instance(name: impl Into<String>) -> Self {
        Self::default().with_instance(name)
    }

    /// A location naming a top-level port.
    pub fn port(name: impl Into<String>) -> Self {
        Self::default().with_port(name)
    }

    /// Sets the bus group.
    pub fn with_bus(mut self, name: impl Into<String>) -> Self {
        self.bus = Some(name.into());
        self
    }

    /// Sets the net.
    pub fn with_net(mut self, name: impl Into<String>) -> Self {
        self.net = Some(name.into());
        self
    }

    /// Sets the instance.
    pub fn with_instance(mut self, name: impl Into<String>) -> Self {
        self.instance = Some(name.into());
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, name: impl Into<String>) -> Self {
        self.port = Some(name.into());
        self
    }

    /// Returns `true` if no coordinate is set.
    pub fn is_empty(&self) -> bool {
        self.bus.is_none() && self.net.is_none() && self.instance.is_none() && self.port.is_none()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("bus", &self.bus),
            ("net", &self.net),
            ("instance", &self.instance),
            ("port", &self.port),
        ];
        let mut first = true;
        for (kind, value) in parts {
            if let Some(value) = value {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{kind} `{value}`")?;
                first = false;
            }
        }
        Ok(())
    }
}
