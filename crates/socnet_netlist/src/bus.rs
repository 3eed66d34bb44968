//! Bus expansion: rewriting bus-level connections into per-signal nets.
//!
//! Each entry of the `bus` section is a named group of instance interfaces
//! sharing one bus type. For every signal of that bus type the group yields
//! a net `<group>_<signal>` connecting the module port each instance maps the
//! signal to. The `bus` section is removed afterwards.

use crate::codes;
use crate::error::NetlistError;
use crate::net::{attach, instance_module, Attach, Connection};
use crate::pass::PassOutput;
use socnet_diagnostics::Diagnostic;
use socnet_doc::{Mapping, Node};
use socnet_schema::{name_variants, ModuleSchema, SchemaProvider};

/// An instance interface named in a bus group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusRef {
    /// The instance name.
    pub instance: String,
    /// The bus interface name on that instance's module.
    pub port: String,
}

/// A bus reference that passed validation.
struct Member<'s> {
    instance: String,
    port: String,
    module: &'s ModuleSchema,
}

/// Expands every bus group into nets and removes the `bus` section.
///
/// Problems with a single connection or group are reported as warnings and
/// skip only that item. A `bus`, `instance`, or `net` section with the wrong
/// shape is fatal.
pub fn expand_buses(mut doc: Node, schemas: &dyn SchemaProvider) -> Result<PassOutput, NetlistError> {
    let Some(bus_section) = doc.remove("bus") else {
        return Ok(PassOutput::new(doc));
    };
    let groups = match bus_section {
        Node::Null => return Ok(PassOutput::new(doc)),
        Node::Mapping(m) => m,
        _ => {
            return Err(NetlistError::InvalidStructure(
                "'bus' section must be a map".to_string(),
            ))
        }
    };

    let mut diagnostics = Vec::new();
    let mut new_nets: Vec<(String, Mapping)> = Vec::new();

    for (key, group) in &groups {
        let Some(group_name) = key.scalar_text() else {
            diagnostics.push(codes::warn_malformed_bus_item(
                "?",
                "bus group name is not a scalar",
            ));
            continue;
        };
        log::debug!("expanding bus group `{group_name}`");
        let refs = bus_refs(group_name, group, &mut diagnostics);
        new_nets.extend(expand_group(&doc, schemas, group_name, &refs, &mut diagnostics));
    }

    let net_section = doc
        .entry_mapping("net")
        .map_err(|e| NetlistError::InvalidStructure(format!("'net' section must be a map: {e}")))?;
    for (name, net) in new_nets {
        if net_section
            .insert(Node::string(name.as_str()), Node::Mapping(net))
            .is_some()
        {
            log::warn!("bus net `{name}` replaces an existing net of the same name");
        }
    }

    log::info!(
        "expanded {} bus group(s) with {} warning(s)",
        groups.len(),
        diagnostics.len()
    );
    Ok(PassOutput {
        document: doc,
        diagnostics,
    })
}

/// Reads the interface references of one bus group.
///
/// Accepts the map form `{instance: {port: iface}}` and the list form
/// `[{instance: name, port: iface}]`.
pub fn bus_refs(group_name: &str, group: &Node, diagnostics: &mut Vec<Diagnostic>) -> Vec<BusRef> {
    let mut refs = Vec::new();
    match group {
        Node::Mapping(entries) => {
            for (key, attrs) in entries {
                let Some(instance) = key.scalar_text() else {
                    diagnostics.push(codes::warn_malformed_bus_item(
                        group_name,
                        "instance name is not a scalar",
                    ));
                    continue;
                };
                match attrs.get("port").and_then(Node::scalar_text) {
                    Some(port) => refs.push(BusRef {
                        instance: instance.to_string(),
                        port: port.to_string(),
                    }),
                    None => diagnostics.push(codes::warn_malformed_bus_item(
                        group_name,
                        &format!("invalid port entry for instance `{instance}`"),
                    )),
                }
            }
        }
        Node::Sequence(items) => {
            for item in items {
                let instance = item.get("instance").and_then(Node::scalar_text);
                let port = item.get("port").and_then(Node::scalar_text);
                match (instance, port) {
                    (Some(instance), Some(port)) => refs.push(BusRef {
                        instance: instance.to_string(),
                        port: port.to_string(),
                    }),
                    (None, _) => diagnostics.push(codes::warn_malformed_bus_item(
                        group_name,
                        "invalid instance entry",
                    )),
                    (Some(instance), None) => diagnostics.push(codes::warn_malformed_bus_item(
                        group_name,
                        &format!("invalid port entry for instance `{instance}`"),
                    )),
                }
            }
        }
        other => diagnostics.push(codes::warn_malformed_bus_item(
            group_name,
            &format!("bus group must be a map or a list, found {}", other.kind()),
        )),
    }
    refs
}

/// Validates the references of one group and builds its nets.
fn expand_group(
    doc: &Node,
    schemas: &dyn SchemaProvider,
    group_name: &str,
    refs: &[BusRef],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(String, Mapping)> {
    let mut members: Vec<Member<'_>> = Vec::new();
    let mut bus_type: Option<&str> = None;

    for r in refs {
        let Some((module, current_type)) = validate_ref(doc, schemas, group_name, r, diagnostics)
        else {
            continue;
        };
        match bus_type {
            None => bus_type = Some(current_type),
            Some(expected) if expected != current_type => {
                diagnostics.push(codes::warn_mixed_bus_types(
                    group_name,
                    &r.instance,
                    expected,
                    current_type,
                ));
                continue;
            }
            Some(_) => {}
        }
        members.push(Member {
            instance: r.instance.clone(),
            port: r.port.clone(),
            module,
        });
    }

    let Some(bus_type) = bus_type else {
        diagnostics.push(codes::warn_empty_bus_group(group_name));
        return Vec::new();
    };
    let Some(bus) = schemas.bus_schema(bus_type).filter(|b| !b.is_empty()) else {
        diagnostics.push(codes::warn_bus_without_signals(group_name, bus_type));
        return Vec::new();
    };

    let mut nets = Vec::new();
    for signal in bus.signals() {
        let net_name = format!("{group_name}_{signal}");
        let mut net = Mapping::new();
        for member in &members {
            let Some(mapped) = member
                .module
                .mapped_port(&member.port, signal)
                .filter(|p| !p.is_empty())
            else {
                continue;
            };
            let conn = Connection::module(&member.instance, mapped);
            if let Attach::Conflict { existing } = attach(&mut net, &conn) {
                diagnostics.push(codes::warn_reattached(
                    &net_name,
                    &member.instance,
                    &existing,
                    mapped,
                ));
            }
        }
        if net.is_empty() {
            log::debug!("bus group `{group_name}`: no instance implements `{signal}`");
            continue;
        }
        nets.push((net_name, net));
    }
    log::debug!(
        "bus group `{group_name}` ({bus_type}): {} connection(s), {} net(s)",
        members.len(),
        nets.len()
    );
    nets
}

/// Checks one reference and returns its module schema and bus type.
fn validate_ref<'s>(
    doc: &Node,
    schemas: &'s dyn SchemaProvider,
    group_name: &str,
    r: &BusRef,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(&'s ModuleSchema, &'s str)> {
    let exists = doc
        .get("instance")
        .is_some_and(|section| section.contains_key(&r.instance));
    if !exists {
        diagnostics.push(codes::warn_unknown_instance(group_name, &r.instance));
        return None;
    }
    let Some(module_name) = instance_module(doc, &r.instance) else {
        diagnostics.push(codes::warn_missing_module(group_name, &r.instance));
        return None;
    };
    let Some(module) = schemas.module_schema(module_name) else {
        diagnostics.push(codes::warn_unknown_module(group_name, &r.instance, module_name));
        return None;
    };
    if module.bus_interface(&r.port).is_none() {
        diagnostics.push(codes::warn_undeclared_interface(
            group_name,
            &r.instance,
            module_name,
            &r.port,
            &name_variants(&r.port),
        ));
        return None;
    }
    let Some(bus_type) = module.bus_type(&r.port) else {
        diagnostics.push(codes::warn_missing_bus_type(group_name, &r.instance, &r.port));
        return None;
    };
    if !schemas.bus_exists(bus_type) {
        diagnostics.push(codes::warn_unregistered_bus(
            group_name,
            &r.instance,
            &r.port,
            bus_type,
        ));
        return None;
    }
    Some((module, bus_type))
}
