//! Detection and reporting of module ports that are on no net.

use crate::codes;
use crate::net::{net_connections, Connection};
use socnet_common::Direction;
use socnet_diagnostics::Diagnostic;
use socnet_doc::{Mapping, MappingExt, Node};
use socnet_schema::SchemaProvider;
use std::collections::HashSet;

/// A declared module port that no net reaches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnconnectedPort {
    /// Instance owning the port.
    pub instance: String,
    /// Module of the instance.
    pub module: String,
    /// Port name.
    pub port: String,
    /// Declared direction, if any.
    pub direction: Option<Direction>,
    /// Declared type, if any.
    pub type_name: Option<String>,
}

impl UnconnectedPort {
    /// Converts this finding into a warning.
    pub fn to_diagnostic(&self) -> Diagnostic {
        codes::warn_unconnected_port(&self.instance, &self.module, &self.port)
    }
}

fn is_tied(instance: &Node, port: &str) -> bool {
    instance
        .get("port")
        .and_then(|p| p.as_mapping().ok())
        .and_then(|ports| ports.lookup(port))
        .is_some_and(|attrs| attrs.contains_key("tie"))
}

/// Lists module ports that appear on no net and carry no `tie` value.
///
/// Instances whose module is missing or unknown are skipped. Results follow
/// instance order, then the module's port declaration order.
pub fn unconnected_ports(doc: &Node, schemas: &dyn SchemaProvider) -> Vec<UnconnectedPort> {
    let mut connected: HashSet<(String, String)> = HashSet::new();
    if let Some(nets) = doc.get("net").and_then(|n| n.as_mapping().ok()) {
        for net in nets.values() {
            for conn in net_connections(net) {
                if let Connection::Module { instance, port, .. } = conn {
                    connected.insert((instance, port));
                }
            }
        }
    }

    let Some(instances) = doc.get("instance").and_then(|i| i.as_mapping().ok()) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for (key, instance) in instances {
        let Some(name) = key.scalar_text() else {
            continue;
        };
        let Some(module) = instance.get("module").and_then(Node::scalar_text) else {
            continue;
        };
        let Some(schema) = schemas.module_schema(module) else {
            log::debug!("skipping unconnected check for `{name}`: module `{module}` unknown");
            continue;
        };
        for (port, decl) in &schema.port {
            if connected.contains(&(name.to_string(), port.clone())) || is_tied(instance, port) {
                continue;
            }
            found.push(UnconnectedPort {
                instance: name.to_string(),
                module: module.to_string(),
                port: port.clone(),
                direction: decl.direction,
                type_name: decl.type_name.clone(),
            });
        }
    }
    found
}

/// Summary of unconnected ports, written as `<name>.nc.rpt`.
#[derive(Clone, Debug, Default)]
pub struct UnconnectedReport {
    ports: Vec<UnconnectedPort>,
}

impl UnconnectedReport {
    /// File extension of the report.
    pub const EXTENSION: &'static str = "nc.rpt";

    /// Builds a report from a list of findings.
    pub fn new(ports: Vec<UnconnectedPort>) -> Self {
        Self { ports }
    }

    /// Scans `doc` and builds a report.
    pub fn scan(doc: &Node, schemas: &dyn SchemaProvider) -> Self {
        Self::new(unconnected_ports(doc, schemas))
    }

    /// The findings in the report.
    pub fn ports(&self) -> &[UnconnectedPort] {
        &self.ports
    }

    /// Number of distinct instances with at least one unconnected port.
    pub fn instance_count(&self) -> usize {
        self.ports
            .iter()
            .map(|p| p.instance.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Report file name for a netlist called `name`.
    pub fn file_name(name: &str) -> String {
        format!("{name}.{}", Self::EXTENSION)
    }

    /// Builds the `summary` and `instance` sections of the report.
    pub fn to_node(&self) -> Node {
        let mut summary = Mapping::new();
        summary.insert(
            Node::string("total_instance"),
            Node::from(self.instance_count() as i64),
        );
        summary.insert(
            Node::string("total_port"),
            Node::from(self.ports.len() as i64),
        );

        let mut instances = Mapping::new();
        for p in &self.ports {
            let entry = instances
                .entry(Node::string(&p.instance))
                .or_insert_with(|| {
                    let mut inst = Mapping::new();
                    inst.insert(Node::string("module"), Node::string(&p.module));
                    inst.insert(Node::string("port"), Node::mapping());
                    Node::Mapping(inst)
                });
            let mut attrs = Mapping::new();
            attrs.insert(
                Node::string("type"),
                Node::string(p.type_name.as_deref().unwrap_or("")),
            );
            attrs.insert(
                Node::string("direction"),
                Node::string(p.direction.map(Direction::as_str).unwrap_or("")),
            );
            if let Ok(ports) = entry.entry_mapping("port") {
                ports.insert(Node::string(&p.port), Node::Mapping(attrs));
            }
        }

        let mut root = Mapping::new();
        root.insert(Node::string("summary"), Node::Mapping(summary));
        root.insert(Node::string("instance"), Node::Mapping(instances));
        Node::Mapping(root)
    }

    /// Renders the report as YAML under a comment header.
    pub fn to_yaml(&self, netlist: &str) -> Result<String, socnet_doc::DocError> {
        let body = self.to_node().to_yaml_string()?;
        Ok(format!(
            "# Unconnected port report for `{netlist}`\n# Ports listed here are on no net and carry no tie value.\n\n{body}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socnet_schema::{ModuleSchema, SchemaLibrary};

    fn library() -> SchemaLibrary {
        let mut lib = SchemaLibrary::new();
        lib.insert_module(
            ModuleSchema::new("uart")
                .with_port("clk", Direction::Input, "wire")
                .with_port("tx", Direction::Output, "wire")
                .with_port("irq", Direction::Output, "wire"),
        );
        lib
    }

    const DOC: &str = "\
instance:
  u0:
    module: uart
    port:
      irq: {tie: 0}
  u1: {module: uart}
  u2: {module: ghost}
net:
  clk: {u0: {port: clk}, u1: {port: clk}}
  tx: {top_level: {port: tx}}
";

    #[test]
    fn finds_ports_on_no_net() {
        let doc = Node::from_yaml_str(DOC).unwrap();
        let ports = unconnected_ports(&doc, &library());
        let names: Vec<_> = ports
            .iter()
            .map(|p| format!("{}.{}", p.instance, p.port))
            .collect();
        assert_eq!(names, vec!["u0.tx", "u1.tx", "u1.irq"]);
        assert_eq!(ports[0].direction, Some(Direction::Output));
        assert_eq!(ports[0].type_name.as_deref(), Some("wire"));
    }

    #[test]
    fn no_instances_means_nothing_to_report() {
        let doc = Node::from_yaml_str("net: {}\n").unwrap();
        assert!(unconnected_ports(&doc, &library()).is_empty());
    }

    #[test]
    fn diagnostic_points_at_port() {
        let doc = Node::from_yaml_str(DOC).unwrap();
        let d = unconnected_ports(&doc, &library())[0].to_diagnostic();
        assert_eq!(d.code, codes::W123);
        assert_eq!(d.location.instance.as_deref(), Some("u0"));
        assert_eq!(d.location.port.as_deref(), Some("tx"));
    }

    #[test]
    fn report_layout() {
        let doc = Node::from_yaml_str(DOC).unwrap();
        let report = UnconnectedReport::scan(&doc, &library());
        assert_eq!(report.instance_count(), 2);
        let node = report.to_node();
        assert_eq!(node.get_by_key_path("summary.total_port", ""), "3");
        assert_eq!(node.get_by_key_path("summary.total_instance", ""), "2");
        assert_eq!(node.get_by_key_path("instance.u1.module", ""), "uart");
        assert_eq!(
            node.get_by_key_path("instance.u1.port.irq.direction", ""),
            "output"
        );
        assert_eq!(UnconnectedReport::file_name("soc"), "soc.nc.rpt");
    }

    #[test]
    fn yaml_has_header() {
        let report = UnconnectedReport::default();
        let text = report.to_yaml("soc").unwrap();
        assert!(text.starts_with("# Unconnected port report for `soc`"));
        assert!(text.contains("total_port: 0"));
    }
}
