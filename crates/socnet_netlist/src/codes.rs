//! Diagnostic codes and helper functions for netlist errors and warnings.
//!
//! Error codes `E100`--`E112` mirror the fatal [`NetlistError`] variants.
//! Warning codes `W100`--`W109` cover items skipped during bus expansion and
//! link resolution, `W120`--`W123` cover consistency check findings, and
//! `W130` covers numeric literals that cannot be represented exactly.

use crate::error::NetlistError;
use socnet_diagnostics::{Category, Diagnostic, DiagnosticCode, Location};

/// Missing or malformed mandatory netlist section.
pub const E100: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);

/// A netlist source could not be read or parsed.
pub const E101: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);

/// Uplink references an unknown module, port, or direction.
pub const E110: DiagnosticCode = DiagnosticCode::new(Category::Error, 110);

/// Uplink direction conflicts with an existing top-level port.
pub const E111: DiagnosticCode = DiagnosticCode::new(Category::Error, 111);

/// Uplink width conflicts with an existing top-level port.
pub const E112: DiagnosticCode = DiagnosticCode::new(Category::Error, 112);

/// Malformed bus group or bus connection entry skipped.
pub const W100: DiagnosticCode = DiagnosticCode::new(Category::Warning, 100);

/// Bus connection references an instance that does not exist.
pub const W101: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// Instance has no module, or its module is unknown.
pub const W102: DiagnosticCode = DiagnosticCode::new(Category::Warning, 102);

/// Bus interface not declared by the instance's module.
pub const W103: DiagnosticCode = DiagnosticCode::new(Category::Warning, 103);

/// Bus interface has no bus type, or the type is not registered.
pub const W104: DiagnosticCode = DiagnosticCode::new(Category::Warning, 104);

/// Bus connection's type differs from the group's type.
pub const W105: DiagnosticCode = DiagnosticCode::new(Category::Warning, 105);

/// Bus group has no valid connection.
pub const W106: DiagnosticCode = DiagnosticCode::new(Category::Warning, 106);

/// Bus definition declares no signals.
pub const W107: DiagnosticCode = DiagnosticCode::new(Category::Warning, 107);

/// Malformed instance or port entry skipped during link resolution.
pub const W108: DiagnosticCode = DiagnosticCode::new(Category::Warning, 108);

/// Instance already attached to a net through a different port.
pub const W109: DiagnosticCode = DiagnosticCode::new(Category::Warning, 109);

/// Connections on a net disagree on bit width.
pub const W120: DiagnosticCode = DiagnosticCode::new(Category::Warning, 120);

/// No connection on a net can drive it.
pub const W121: DiagnosticCode = DiagnosticCode::new(Category::Warning, 121);

/// More than one connection on a net drives it.
pub const W122: DiagnosticCode = DiagnosticCode::new(Category::Warning, 122);

/// Module port is not on any net.
pub const W123: DiagnosticCode = DiagnosticCode::new(Category::Warning, 123);

/// Numeric literal could not be represented exactly.
pub const W130: DiagnosticCode = DiagnosticCode::new(Category::Warning, 130);

/// Converts a fatal error into a diagnostic for rendering.
pub fn error_diagnostic(err: &NetlistError) -> Diagnostic {
    let (code, location) = match err {
        NetlistError::NoSources | NetlistError::InvalidStructure(_) => (E100, Location::none()),
        NetlistError::Parse { .. } | NetlistError::Io { .. } => (E101, Location::none()),
        NetlistError::UnknownReference { instance, port, .. } => {
            (E110, Location::instance(instance).with_port(port))
        }
        NetlistError::IncompatibleDirection { port, instance, .. } => {
            (E111, Location::instance(instance).with_port(port))
        }
        NetlistError::IncompatibleWidth { port, instance, .. } => {
            (E112, Location::instance(instance).with_port(port))
        }
    };
    let diag = Diagnostic::error(code, err.to_string(), location);
    match err {
        NetlistError::IncompatibleDirection { .. } | NetlistError::IncompatibleWidth { .. } => diag
            .with_help("give one of the uplinks a different top-level port name"),
        _ => diag,
    }
}

/// Creates a warning for a malformed bus entry.
pub fn warn_malformed_bus_item(group: &str, what: &str) -> Diagnostic {
    Diagnostic::warning(W100, format!("skipping malformed bus entry: {what}"), Location::bus(group))
}

/// Creates a warning for a bus connection to an unknown instance.
pub fn warn_unknown_instance(group: &str, instance: &str) -> Diagnostic {
    Diagnostic::warning(
        W101,
        format!("instance `{instance}` not found in netlist"),
        Location::bus(group).with_instance(instance),
    )
}

/// Creates a warning for an instance without a `module` entry.
pub fn warn_missing_module(group: &str, instance: &str) -> Diagnostic {
    Diagnostic::warning(
        W102,
        format!("instance `{instance}` has no module"),
        Location::bus(group).with_instance(instance),
    )
}

/// Creates a warning for an instance whose module is not in the schema library.
pub fn warn_unknown_module(group: &str, instance: &str, module: &str) -> Diagnostic {
    Diagnostic::warning(
        W102,
        format!("module `{module}` of instance `{instance}` not found"),
        Location::bus(group).with_instance(instance),
    )
    .with_help("add the module to the module library")
}

/// Creates a warning for a bus interface the module does not declare.
pub fn warn_undeclared_interface(
    group: &str,
    instance: &str,
    module: &str,
    port: &str,
    tried: &[String],
) -> Diagnostic {
    let tried = tried
        .iter()
        .map(|v| format!("`{v}`"))
        .collect::<Vec<_>>()
        .join(", ");
    Diagnostic::warning(
        W103,
        format!("bus interface `{port}` not declared by module `{module}`"),
        Location::bus(group).with_instance(instance).with_port(port),
    )
    .with_note(format!("tried {tried}"))
}

/// Creates a warning for a bus interface that names no bus type.
pub fn warn_missing_bus_type(group: &str, instance: &str, port: &str) -> Diagnostic {
    Diagnostic::warning(
        W104,
        format!("bus interface `{port}` declares no bus type"),
        Location::bus(group).with_instance(instance).with_port(port),
    )
}

/// Creates a warning for a bus type missing from the bus library.
pub fn warn_unregistered_bus(group: &str, instance: &str, port: &str, bus_type: &str) -> Diagnostic {
    Diagnostic::warning(
        W104,
        format!("bus type `{bus_type}` not found"),
        Location::bus(group).with_instance(instance).with_port(port),
    )
    .with_help("add the bus to the bus library")
}

/// Creates a warning for a connection whose bus type differs from the group's.
pub fn warn_mixed_bus_types(group: &str, instance: &str, expected: &str, found: &str) -> Diagnostic {
    Diagnostic::warning(
        W105,
        format!("mixed bus types `{expected}` and `{found}`; skipping inconsistent connection"),
        Location::bus(group).with_instance(instance),
    )
}

/// Creates a warning for a bus group where no connection survived validation.
pub fn warn_empty_bus_group(group: &str) -> Diagnostic {
    Diagnostic::warning(W106, "no valid connections for bus", Location::bus(group))
}

/// Creates a warning for a bus type without signals.
pub fn warn_bus_without_signals(group: &str, bus_type: &str) -> Diagnostic {
    Diagnostic::warning(
        W107,
        format!("bus type `{bus_type}` has no usable `port` section"),
        Location::bus(group),
    )
}

/// Creates a warning for a malformed instance or port entry.
pub fn warn_malformed_instance_entry(instance: &str, what: &str) -> Diagnostic {
    Diagnostic::warning(
        W108,
        format!("skipping malformed entry: {what}"),
        Location::instance(instance),
    )
}

/// Creates a warning for an instance attached to a net a second time.
pub fn warn_reattached(net: &str, instance: &str, existing: &str, port: &str) -> Diagnostic {
    Diagnostic::warning(
        W109,
        format!("instance `{instance}` already connected to net `{net}` through `{existing}`"),
        Location::net(net).with_instance(instance).with_port(port),
    )
    .with_note(format!("the connection through `{port}` was not added"))
}

/// Creates a warning for a net whose connections disagree on width.
pub fn warn_width_mismatch(net: &str, widths: &[String]) -> Diagnostic {
    widths.iter().fold(
        Diagnostic::warning(W120, "port width mismatch", Location::net(net)),
        |d, w| d.with_note(w.clone()),
    )
}

/// Creates a warning for a net with no driver.
pub fn warn_undriven(net: &str) -> Diagnostic {
    Diagnostic::warning(W121, "net is undriven", Location::net(net))
        .with_help("connect an output or inout port, or a top-level input")
}

/// Creates a warning for a net with several drivers.
pub fn warn_multidrive(net: &str, drivers: &[String]) -> Diagnostic {
    Diagnostic::warning(W122, "net has multiple drivers", Location::net(net))
        .with_note(format!("driven by {}", drivers.join(", ")))
}

/// Creates a warning for a module port on no net.
pub fn warn_unconnected_port(instance: &str, module: &str, port: &str) -> Diagnostic {
    Diagnostic::warning(
        W123,
        format!("port `{port}` of module `{module}` is unconnected"),
        Location::instance(instance).with_port(port),
    )
}

/// Creates a warning for a literal whose value was kept verbatim.
pub fn warn_inexact_literal(text: &str) -> Diagnostic {
    Diagnostic::warning(
        W130,
        format!("numeric literal `{text}` cannot be represented exactly; kept verbatim"),
        Location::none(),
    )
}
