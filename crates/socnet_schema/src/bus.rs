//! Bus schemas: the signals a bus type carries.

use indexmap::IndexMap;
use socnet_doc::Node;

/// The schema of one bus type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BusSchema {
    /// The bus type name.
    pub name: String,
    /// Signal name to its (direction-independent) attributes, in declaration order.
    pub port: IndexMap<String, Node>,
}

impl BusSchema {
    /// Creates a bus schema with the given signal names and no attributes.
    pub fn with_signals<'a>(name: &str, signals: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            name: name.to_string(),
            port: signals
                .into_iter()
                .map(|s| (s.to_string(), Node::mapping()))
                .collect(),
        }
    }

    /// Builds a schema from its YAML form. A missing or malformed `port`
    /// section yields a schema with no signals.
    pub fn from_node(name: &str, node: &Node) -> Self {
        let mut port = IndexMap::new();
        match node.get("port").map(Node::as_mapping) {
            Some(Ok(signals)) => {
                for (key, attrs) in signals {
                    match key.scalar_text() {
                        Some(signal) => {
                            port.insert(signal.to_string(), attrs.clone());
                        }
                        None => log::warn!("bus `{name}`: skipping signal with non-scalar name"),
                    }
                }
            }
            Some(Err(e)) => log::warn!("bus `{name}`: ignoring `port` section: {e}"),
            None => log::debug!("bus `{name}` declares no signals"),
        }
        Self {
            name: name.to_string(),
            port,
        }
    }

    /// Iterates over signal names in declaration order.
    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.port.keys().map(String::as_str)
    }

    /// Returns `true` if the bus declares no signals.
    pub fn is_empty(&self) -> bool {
        self.port.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signals_in_declaration_order() {
        let node = Node::from_yaml_str("port:\n  pwrite: {}\n  paddr: {width: 32}\n").unwrap();
        let bus = BusSchema::from_node("apb", &node);
        assert_eq!(bus.signals().collect::<Vec<_>>(), vec!["pwrite", "paddr"]);
        assert_eq!(bus.port["paddr"].get_str("width").unwrap(), "32");
    }

    #[test]
    fn missing_port_section_is_empty() {
        let bus = BusSchema::from_node("apb", &Node::from_yaml_str("desc: x\n").unwrap());
        assert!(bus.is_empty());
        let bus = BusSchema::from_node("apb", &Node::from_yaml_str("port: [a, b]\n").unwrap());
        assert!(bus.is_empty());
    }

    #[test]
    fn with_signals_builder() {
        let bus = BusSchema::with_signals("apb", ["paddr", "pwrite"]);
        assert_eq!(bus.name, "apb");
        assert_eq!(bus.port.len(), 2);
    }
}
