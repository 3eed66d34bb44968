//! The schema lookup interface consumed by the netlist passes.

use crate::bus::BusSchema;
use crate::module::ModuleSchema;

/// Read-only access to module and bus schemas by name.
///
/// Implementations may cache internally; callers treat every lookup as
/// side-effect free.
pub trait SchemaProvider {
    /// Returns `true` if a module named `name` is known.
    fn module_exists(&self, name: &str) -> bool {
        self.module_schema(name).is_some()
    }

    /// Returns the schema of module `name`.
    fn module_schema(&self, name: &str) -> Option<&ModuleSchema>;

    /// Returns `true` if a bus type named `name` is known.
    fn bus_exists(&self, name: &str) -> bool {
        self.bus_schema(name).is_some()
    }

    /// Returns the schema of bus type `name`.
    fn bus_schema(&self, name: &str) -> Option<&BusSchema>;
}

const PAD_PREFIX: &str = "pad_";

/// Returns the names under which a bus interface may be declared.
///
/// Pad-ring ports are named with and without a `pad_` prefix
/// inconsistently, so lookups try, in order: the name as given, the name
/// with `pad_` stripped (only when it has the prefix), and the name with
/// `pad_` added.
pub fn name_variants(name: &str) -> Vec<String> {
    let mut variants = vec![name.to_string()];
    if let Some(stripped) = name.strip_prefix(PAD_PREFIX) {
        variants.push(stripped.to_string());
    }
    variants.push(format!("{PAD_PREFIX}{name}"));
    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_of_plain_name() {
        assert_eq!(name_variants("apb_if"), vec!["apb_if", "pad_apb_if"]);
    }

    #[test]
    fn variants_of_prefixed_name() {
        assert_eq!(
            name_variants("pad_uart"),
            vec!["pad_uart", "uart", "pad_pad_uart"]
        );
    }
}
