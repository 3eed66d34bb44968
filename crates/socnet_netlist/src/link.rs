//! Link and uplink resolution.
//!
//! An instance port carrying `link: <net>` joins that net. `link` values may
//! carry a bit-select (`data[7:0]`), which is stored on the connection.
//!
//! An instance port carrying `uplink: <name>` additionally exposes the port at
//! the chip boundary: a top-level port `<name>` is created (or reused) with the
//! module port's type and the reverse of its direction, and the net `<name>`
//! connects the instance port to the top-level port.

use crate::codes;
use crate::error::NetlistError;
use crate::net::{attach, instance_module, Attach, Connection};
use crate::pass::PassOutput;
use socnet_common::width::split_bit_select;
use socnet_common::{port_width, Direction};
use socnet_diagnostics::Diagnostic;
use socnet_doc::{Mapping, MappingExt, Node};
use socnet_schema::SchemaProvider;

/// Type given to a top-level port when the module port declares none.
pub const DEFAULT_PORT_TYPE: &str = "wire";

#[derive(Debug)]
enum Alias {
    Link(String),
    Uplink(String),
}

#[derive(Debug)]
struct PortAlias {
    instance: String,
    port: String,
    alias: Alias,
}

/// Resolves every `link` and `uplink` attribute into nets and top-level ports.
///
/// Malformed instance or port entries are skipped with a warning. An uplink
/// whose module, port, or direction cannot be found, or which conflicts with
/// an existing top-level port, is fatal.
pub fn resolve_links(mut doc: Node, schemas: &dyn SchemaProvider) -> Result<PassOutput, NetlistError> {
    let mut diagnostics = Vec::new();
    let aliases = collect_aliases(&doc, &mut diagnostics)?;

    for section in ["net", "port"] {
        doc.entry_mapping(section).map_err(|e| {
            NetlistError::InvalidStructure(format!("'{section}' section must be a map: {e}"))
        })?;
    }

    let (mut links, mut uplinks) = (0usize, 0usize);
    for a in &aliases {
        match &a.alias {
            Alias::Link(value) => {
                resolve_link(&mut doc, a, value, &mut diagnostics)?;
                links += 1;
            }
            Alias::Uplink(name) => {
                resolve_uplink(&mut doc, schemas, a, name, &mut diagnostics)?;
                uplinks += 1;
            }
        }
    }

    log::info!("resolved {links} link(s) and {uplinks} uplink(s)");
    Ok(PassOutput {
        document: doc,
        diagnostics,
    })
}

fn collect_aliases(doc: &Node, diagnostics: &mut Vec<Diagnostic>) -> Result<Vec<PortAlias>, NetlistError> {
    let instances = doc
        .get_mapping("instance")
        .map_err(|e| NetlistError::InvalidStructure(format!("'instance' section: {e}")))?;

    let mut aliases = Vec::new();
    for (key, inst) in instances {
        let Some(instance) = key.scalar_text() else {
            diagnostics.push(codes::warn_malformed_instance_entry(
                "?",
                "instance name is not a scalar",
            ));
            continue;
        };
        let ports = match inst.get("port") {
            None => continue,
            Some(Node::Mapping(ports)) => ports,
            Some(other) => {
                diagnostics.push(codes::warn_malformed_instance_entry(
                    instance,
                    &format!("'port' must be a map, found {}", other.kind()),
                ));
                continue;
            }
        };
        for (port_key, attrs) in ports {
            let Some(port) = port_key.scalar_text() else {
                diagnostics.push(codes::warn_malformed_instance_entry(
                    instance,
                    "port name is not a scalar",
                ));
                continue;
            };
            if !attrs.is_mapping() {
                if !attrs.is_null() {
                    diagnostics.push(codes::warn_malformed_instance_entry(
                        instance,
                        &format!("port `{port}` attributes must be a map"),
                    ));
                }
                continue;
            }
            for attr in ["link", "uplink"] {
                let Some(value) = attrs.get(attr) else {
                    continue;
                };
                let text = match value.scalar_text().map(str::trim) {
                    Some(text) if !text.is_empty() => text.to_string(),
                    _ => {
                        diagnostics.push(codes::warn_malformed_instance_entry(
                            instance,
                            &format!("`{attr}` of port `{port}` must be a non-empty name"),
                        ));
                        continue;
                    }
                };
                let alias = if attr == "link" {
                    Alias::Link(text)
                } else {
                    Alias::Uplink(text)
                };
                aliases.push(PortAlias {
                    instance: instance.to_string(),
                    port: port.to_string(),
                    alias,
                });
            }
        }
    }
    Ok(aliases)
}

fn net_section(doc: &mut Node) -> Result<&mut Mapping, NetlistError> {
    doc.entry_mapping("net")
        .map_err(|e| NetlistError::InvalidStructure(format!("'net' section must be a map: {e}")))
}

/// Attaches `conn` to net `net_name`, creating the net when needed.
fn join_net(
    doc: &mut Node,
    net_name: &str,
    conn: &Connection,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), NetlistError> {
    let nets = net_section(doc)?;
    let index = match nets.key_index(net_name) {
        Some(i) => i,
        None => {
            log::debug!("created net `{net_name}`");
            nets.insert_full(Node::string(net_name), Node::mapping()).0
        }
    };
    let Some((_, slot)) = nets.get_index_mut(index) else {
        return Ok(());
    };
    if slot.is_null() {
        *slot = Node::mapping();
    }
    let Node::Mapping(net) = slot else {
        diagnostics.push(
            codes::warn_malformed_instance_entry(
                conn.participant(),
                &format!("net `{net_name}` is not a map; connection to `{}` skipped", conn.port()),
            ),
        );
        return Ok(());
    };
    match attach(net, conn) {
        Attach::Added => log::debug!("connected {conn} to net `{net_name}`"),
        Attach::Duplicate => log::debug!("ignoring duplicate connection {conn} on net `{net_name}`"),
        Attach::Conflict { existing } => diagnostics.push(codes::warn_reattached(
            net_name,
            conn.participant(),
            &existing,
            conn.port(),
        )),
    }
    Ok(())
}

fn resolve_link(
    doc: &mut Node,
    a: &PortAlias,
    value: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), NetlistError> {
    let (net_name, bits) = split_bit_select(value);
    let mut conn = Connection::module(&a.instance, &a.port);
    if let Some(bits) = &bits {
        conn = conn.with_bits(bits);
    }
    join_net(doc, &net_name, &conn, diagnostics)
}

fn resolve_uplink(
    doc: &mut Node,
    schemas: &dyn SchemaProvider,
    a: &PortAlias,
    name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), NetlistError> {
    let unknown = |reason: String| NetlistError::UnknownReference {
        instance: a.instance.clone(),
        port: a.port.clone(),
        reason,
    };
    let module_name = instance_module(doc, &a.instance)
        .ok_or_else(|| unknown(format!("instance `{}` has no module", a.instance)))?;
    let module = schemas
        .module_schema(module_name)
        .ok_or_else(|| unknown(format!("module `{module_name}` not found")))?;
    let decl = module
        .port(&a.port)
        .ok_or_else(|| unknown(format!("port not found in module `{module_name}`")))?;
    let direction = decl
        .direction
        .ok_or_else(|| unknown(format!("port has no direction in module `{module_name}`")))?;
    let port_type = decl.type_name.as_deref().unwrap_or(DEFAULT_PORT_TYPE).to_string();
    let top_direction = direction.reversed();

    match doc.get("port").and_then(|p| p.get(name)) {
        Some(existing) => check_reused_port(existing, a, name, top_direction, &port_type)?,
        None => {
            let mut attrs = Mapping::new();
            attrs.insert(Node::string("direction"), Node::string(top_direction.as_str()));
            attrs.insert(Node::string("type"), Node::string(port_type.as_str()));
            attrs.insert(Node::string("connect"), Node::string(name));
            doc.entry_mapping("port")
                .map_err(|e| NetlistError::InvalidStructure(format!("'port' section must be a map: {e}")))?
                .insert(Node::string(name), Node::Mapping(attrs));
            log::debug!("created top-level port `{name}` ({top_direction}, {port_type})");
        }
    }

    join_net(doc, name, &Connection::module(&a.instance, &a.port), diagnostics)?;
    join_net(doc, name, &Connection::top_level(name), diagnostics)
}

fn check_reused_port(
    existing: &Node,
    a: &PortAlias,
    name: &str,
    top_direction: Direction,
    port_type: &str,
) -> Result<(), NetlistError> {
    let existing_text = existing
        .get("direction")
        .and_then(Node::scalar_text)
        .unwrap_or("");
    let existing_direction = Direction::parse(existing_text);
    let compatible = match existing_direction {
        Some(d) => top_direction.is_compatible_with(d),
        None => top_direction == Direction::Inout,
    };
    if !compatible {
        return Err(NetlistError::IncompatibleDirection {
            port: name.to_string(),
            instance: a.instance.clone(),
            expected: top_direction.to_string(),
            existing: existing_direction
                .map(|d| d.to_string())
                .unwrap_or_else(|| format!("'{existing_text}'")),
        });
    }

    let existing_type = existing.get("type").and_then(Node::scalar_text).unwrap_or("");
    if !existing_type.is_empty() && existing_type != port_type {
        if let (Some(expected), Some(found)) = (port_width(port_type), port_width(existing_type)) {
            if expected > 0 && found > 0 && expected != found {
                return Err(NetlistError::IncompatibleWidth {
                    port: name.to_string(),
                    instance: a.instance.clone(),
                    expected,
                    existing: found,
                });
            }
        }
    }
    log::debug!("uplink port `{name}` already exists and is compatible");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{W108, W109};
    use crate::net::{net_connections, TOP_LEVEL};
    use socnet_schema::{ModuleSchema, SchemaLibrary};

    fn library() -> SchemaLibrary {
        let mut lib = SchemaLibrary::new();
        lib.insert_module(
            ModuleSchema::new("drv")
                .with_port("dout", Direction::Output, "logic [7:0]")
                .with_port("din", Direction::Input, "logic [7:0]")
                .with_port("pad", Direction::Inout, "wire")
                .with_port("narrow", Direction::Output, "logic [3:0]"),
        );
        let mut bare = ModuleSchema::new("bare");
        bare.port.insert(
            "x".to_string(),
            socnet_schema::PortDecl::new(Some(Direction::Output), None),
        );
        bare.port
            .insert("nodir".to_string(), socnet_schema::PortDecl::new(None, Some("logic")));
        lib.insert_module(bare);
        lib
    }

    fn resolve(text: &str) -> Result<PassOutput, NetlistError> {
        resolve_links(Node::from_yaml_str(text).unwrap(), &library())
    }

    #[test]
    fn uplink_reverses_output() {
        let out = resolve("instance:\n  u0:\n    module: drv\n    port:\n      dout: {uplink: PAD_X}\n")
            .unwrap();
        let doc = &out.document;
        assert_eq!(doc.get_by_key_path("port.PAD_X.direction", ""), "input");
        assert_eq!(doc.get_by_key_path("port.PAD_X.type", ""), "logic [7:0]");
        assert_eq!(doc.get_by_key_path("port.PAD_X.connect", ""), "PAD_X");
        let conns = net_connections(doc.get_by_path("net.PAD_X").unwrap());
        assert_eq!(
            conns,
            vec![Connection::module("u0", "dout"), Connection::top_level("PAD_X")]
        );
    }

    #[test]
    fn uplink_direction_inversion() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      din: {uplink: A}\n      pad: {uplink: B}\n",
        )
        .unwrap();
        assert_eq!(out.document.get_by_key_path("port.A.direction", ""), "output");
        assert_eq!(out.document.get_by_key_path("port.B.direction", ""), "inout");
    }

    #[test]
    fn uplink_without_type_defaults_to_wire() {
        let out = resolve("instance:\n  u0:\n    module: bare\n    port:\n      x: {uplink: X}\n").unwrap();
        assert_eq!(out.document.get_by_key_path("port.X.type", ""), "wire");
    }

    #[test]
    fn shared_uplink_joins_one_net() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      din: {uplink: D}\n\
             \x20 u1:\n    module: drv\n    port:\n      din: {uplink: D}\n",
        )
        .unwrap();
        let conns = net_connections(out.document.get_by_path("net.D").unwrap());
        assert_eq!(conns.len(), 3);
        assert_eq!(conns[1].participant(), TOP_LEVEL);
        assert_eq!(conns[2], Connection::module("u1", "din"));
    }

    #[test]
    fn uplink_direction_conflict_is_fatal() {
        let err = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      dout: {uplink: P}\n      din: {uplink: P}\n",
        )
        .unwrap_err();
        match err {
            NetlistError::IncompatibleDirection {
                port,
                instance,
                expected,
                existing,
            } => {
                assert_eq!(port, "P");
                assert_eq!(instance, "u0");
                assert_eq!(expected, "output");
                assert_eq!(existing, "input");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inout_absorbs_direction() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      dout: {uplink: P}\n\
             port:\n  P: {direction: inout, type: 'logic [7:0]'}\n",
        )
        .unwrap();
        assert_eq!(out.document.get_by_key_path("port.P.direction", ""), "inout");
    }

    #[test]
    fn uplink_width_conflict_is_fatal() {
        let err = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      narrow: {uplink: P}\n\
             port:\n  P: {direction: input, type: 'logic [7:0]'}\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::IncompatibleWidth {
                expected: 4,
                existing: 8,
                ..
            }
        ));
    }

    #[test]
    fn differing_type_same_width_is_compatible() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      dout: {uplink: P}\n\
             port:\n  P: {direction: input, type: 'wire [7:0]'}\n",
        );
        assert!(out.is_ok());
    }

    #[test]
    fn uplink_unknown_references_are_fatal() {
        for text in [
            "instance:\n  u0:\n    module: ghost\n    port:\n      a: {uplink: A}\n",
            "instance:\n  u0:\n    module: drv\n    port:\n      nope: {uplink: A}\n",
            "instance:\n  u0:\n    module: bare\n    port:\n      nodir: {uplink: A}\n",
            "instance:\n  u0:\n    port:\n      a: {uplink: A}\n",
        ] {
            assert!(
                matches!(resolve(text), Err(NetlistError::UnknownReference { .. })),
                "{text}"
            );
        }
    }

    #[test]
    fn link_creates_plain_net() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      dout: {link: bus_d}\n\
             \x20 u1:\n    module: unknown_is_fine\n    port:\n      din: {link: bus_d}\n",
        )
        .unwrap();
        let conns = net_connections(out.document.get_by_path("net.bus_d").unwrap());
        assert_eq!(
            conns,
            vec![Connection::module("u0", "dout"), Connection::module("u1", "din")]
        );
        assert!(out.document.get_mapping("port").unwrap().is_empty());
    }

    #[test]
    fn link_with_bit_select() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      narrow: {link: 'data[7:4]'}\n",
        )
        .unwrap();
        assert_eq!(out.document.get_by_key_path("net.data.u0.bits", ""), "[7:4]");
        assert_eq!(out.document.get_by_key_path("net.data.u0.port", ""), "narrow");
    }

    #[test]
    fn duplicate_link_is_ignored() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      dout: {link: n}\n\
             net:\n  n:\n    u0: {port: dout}\n",
        )
        .unwrap();
        assert!(out.diagnostics.is_empty());
        assert_eq!(out.document.get_by_path("net.n").unwrap().len(), 1);
    }

    #[test]
    fn second_port_of_same_instance_warns() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port:\n      dout: {link: n}\n      din: {link: n}\n",
        )
        .unwrap();
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].code, W109);
        assert_eq!(out.document.get_by_key_path("net.n.u0.port", ""), "dout");
    }

    #[test]
    fn malformed_entries_warn() {
        let out = resolve(
            "instance:\n  u0:\n    module: drv\n    port: [a]\n\
             \x20 u1:\n    module: drv\n    port:\n      dout: {link: [x]}\n      din: flat\n",
        )
        .unwrap();
        assert_eq!(out.diagnostics.len(), 3);
        assert!(out.diagnostics.iter().all(|d| d.code == W108));
    }

    #[test]
    fn creates_net_and_port_sections() {
        let out = resolve("instance:\n  u0: {module: drv}\n").unwrap();
        assert!(out.document.get("net").unwrap().is_mapping());
        assert!(out.document.get("port").unwrap().is_mapping());
    }
}
