//! Module schemas: ports and bus interfaces.

use crate::provider::name_variants;
use indexmap::IndexMap;
use socnet_common::Direction;
use socnet_doc::Node;

/// A single declared module port.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortDecl {
    /// Normalized direction, `None` when absent or unrecognized.
    pub direction: Option<Direction>,
    /// The type string (`logic [7:0]`), `None` when absent.
    pub type_name: Option<String>,
}

impl PortDecl {
    /// Creates a port declaration.
    pub fn new(direction: Option<Direction>, type_name: Option<&str>) -> Self {
        Self {
            direction,
            type_name: type_name.map(str::to_string),
        }
    }

    /// The type string, or `""` when undeclared.
    pub fn type_str(&self) -> &str {
        self.type_name.as_deref().unwrap_or("")
    }
}

/// A bus interface a module exposes, mapping bus signals to its own ports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusInterface {
    /// The bus type this interface implements.
    pub bus: Option<String>,
    /// Free-form role such as `master` or `slave`.
    pub mode: Option<String>,
    /// Bus signal name to module port name.
    pub mapping: IndexMap<String, String>,
}

/// The schema of one module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModuleSchema {
    /// The module name.
    pub name: String,
    /// Declared ports in declaration order.
    pub port: IndexMap<String, PortDecl>,
    /// Declared bus interfaces in declaration order.
    pub bus: IndexMap<String, BusInterface>,
}

impl ModuleSchema {
    /// Creates an empty schema for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds a schema from its YAML form.
    ///
    /// Entries with the wrong shape are skipped with a log warning rather
    /// than rejecting the whole module.
    pub fn from_node(name: &str, node: &Node) -> Self {
        let mut schema = Self::new(name);

        if let Some(ports) = node.get("port").and_then(|p| p.as_mapping().ok()) {
            for (key, attrs) in ports {
                let Some(port_name) = key.scalar_text() else {
                    log::warn!("module `{name}`: skipping port with non-scalar name");
                    continue;
                };
                schema
                    .port
                    .insert(port_name.to_string(), port_from_node(name, port_name, attrs));
            }
        }

        if let Some(buses) = node.get("bus").and_then(|b| b.as_mapping().ok()) {
            for (key, attrs) in buses {
                let Some(iface) = key.scalar_text() else {
                    log::warn!("module `{name}`: skipping bus interface with non-scalar name");
                    continue;
                };
                schema
                    .bus
                    .insert(iface.to_string(), interface_from_node(attrs));
            }
        }

        schema
    }

    /// Adds a port declaration.
    pub fn with_port(mut self, name: &str, direction: Direction, type_name: &str) -> Self {
        self.port
            .insert(name.to_string(), PortDecl::new(Some(direction), Some(type_name)));
        self
    }

    /// Adds a bus interface.
    pub fn with_bus(mut self, name: &str, iface: BusInterface) -> Self {
        self.bus.insert(name.to_string(), iface);
        self
    }

    /// Returns the declaration of port `name`.
    pub fn port(&self, name: &str) -> Option<&PortDecl> {
        self.port.get(name)
    }

    /// Returns the first bus interface matching a `pad_` variant of `name`,
    /// with the key it was declared under.
    pub fn bus_interface(&self, name: &str) -> Option<(&str, &BusInterface)> {
        name_variants(name)
            .iter()
            .find_map(|v| self.bus.get_key_value(v.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the bus type from the first `pad_` variant of `name` that declares one.
    pub fn bus_type(&self, name: &str) -> Option<&str> {
        name_variants(name)
            .iter()
            .filter_map(|v| self.bus.get(v.as_str()))
            .find_map(|iface| iface.bus.as_deref())
    }

    /// Returns the module port that implements bus `signal` on interface `name`,
    /// searching the `pad_` variants of `name` in order.
    pub fn mapped_port(&self, name: &str, signal: &str) -> Option<&str> {
        name_variants(name)
            .iter()
            .filter_map(|v| self.bus.get(v.as_str()))
            .find_map(|iface| iface.mapping.get(signal))
            .map(String::as_str)
    }
}

impl BusInterface {
    /// Creates an interface of bus type `bus`.
    pub fn new(bus: &str) -> Self {
        Self {
            bus: Some(bus.to_string()),
            ..Self::default()
        }
    }

    /// Adds a signal mapping.
    pub fn map(mut self, signal: &str, port: &str) -> Self {
        self.mapping.insert(signal.to_string(), port.to_string());
        self
    }
}

fn port_from_node(module: &str, port: &str, attrs: &Node) -> PortDecl {
    let direction = match attrs.get("direction").and_then(Node::scalar_text) {
        Some(text) => {
            let parsed = Direction::parse(text);
            if parsed.is_none() {
                log::warn!("module `{module}` port `{port}`: unrecognized direction `{text}`");
            }
            parsed
        }
        None => None,
    };
    PortDecl {
        direction,
        type_name: attrs
            .get("type")
            .and_then(Node::scalar_text)
            .map(str::to_string),
    }
}

fn interface_from_node(attrs: &Node) -> BusInterface {
    let text = |key: &str| attrs.get(key).and_then(Node::scalar_text).map(str::to_string);
    let mut mapping = IndexMap::new();
    if let Some(map) = attrs.get("mapping").and_then(|m| m.as_mapping().ok()) {
        for (signal, port) in map {
            if let (Some(signal), Some(port)) = (signal.scalar_text(), port.scalar_text()) {
                mapping.insert(signal.to_string(), port.to_string());
            }
        }
    }
    BusInterface {
        bus: text("bus"),
        mode: text("mode"),
        mapping,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPU: &str = r#"
port:
  clk_i: {direction: in, type: logic}
  m_paddr: {direction: output, type: "logic [31:0]"}
  irq: {direction: bogus}
bus:
  apb_if:
    bus: apb
    mode: master
    mapping:
      paddr: m_paddr
  pad_uart:
    bus: uart
    mapping:
      tx: uart_tx
"#;

    fn cpu() -> ModuleSchema {
        ModuleSchema::from_node("cpu", &Node::from_yaml_str(CPU).unwrap())
    }

    #[test]
    fn ports_are_normalized() {
        let m = cpu();
        assert_eq!(m.port("clk_i").unwrap().direction, Some(Direction::Input));
        assert_eq!(m.port("m_paddr").unwrap().type_str(), "logic [31:0]");
        assert_eq!(m.port("irq").unwrap().direction, None);
        assert_eq!(m.port("irq").unwrap().type_str(), "");
    }

    #[test]
    fn interface_fields() {
        let m = cpu();
        let (key, iface) = m.bus_interface("apb_if").unwrap();
        assert_eq!(key, "apb_if");
        assert_eq!(iface.bus.as_deref(), Some("apb"));
        assert_eq!(iface.mode.as_deref(), Some("master"));
        assert_eq!(m.mapped_port("apb_if", "paddr"), Some("m_paddr"));
        assert_eq!(m.mapped_port("apb_if", "pwrite"), None);
    }

    #[test]
    fn pad_prefix_added() {
        let m = cpu();
        assert_eq!(m.bus_interface("uart").map(|(k, _)| k), Some("pad_uart"));
        assert_eq!(m.bus_type("uart"), Some("uart"));
        assert_eq!(m.mapped_port("uart", "tx"), Some("uart_tx"));
    }

    #[test]
    fn pad_prefix_stripped() {
        let m = cpu();
        assert_eq!(m.bus_type("pad_apb_if"), Some("apb"));
        assert_eq!(m.mapped_port("pad_apb_if", "paddr"), Some("m_paddr"));
    }

    #[test]
    fn bus_type_skips_variant_without_type() {
        let m = ModuleSchema::new("io")
            .with_bus("spi", BusInterface::default())
            .with_bus("pad_spi", BusInterface::new("spi").map("sck", "spi_sck"));
        assert_eq!(m.bus_interface("spi").map(|(k, _)| k), Some("spi"));
        assert_eq!(m.bus_type("spi"), Some("spi"));
        assert_eq!(m.mapped_port("spi", "sck"), Some("spi_sck"));
    }

    #[test]
    fn unknown_interface() {
        assert!(cpu().bus_interface("axi").is_none());
    }
}
