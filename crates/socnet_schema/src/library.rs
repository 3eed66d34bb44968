//! In-memory schema library backed by YAML schema files.

use crate::bus::BusSchema;
use crate::error::SchemaError;
use crate::module::ModuleSchema;
use crate::provider::SchemaProvider;
use indexmap::IndexMap;
use socnet_doc::Node;
use std::path::{Path, PathBuf};

/// File extensions scanned for module schemas inside a directory.
pub const MODULE_EXTENSIONS: &[&str] = &["soc_mod", "yaml", "yml"];

/// File extensions scanned for bus schemas inside a directory.
pub const BUS_EXTENSIONS: &[&str] = &["soc_bus", "yaml", "yml"];

/// A collection of module and bus schemas keyed by name.
///
/// Each schema file is a YAML mapping of `name -> schema`. When two files
/// define the same name, the later one replaces the earlier.
#[derive(Clone, Debug, Default)]
pub struct SchemaLibrary {
    modules: IndexMap<String, ModuleSchema>,
    buses: IndexMap<String, BusSchema>,
}

impl SchemaLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every module path and bus path. Each path may be a file or a directory.
    pub fn from_paths(module_paths: &[PathBuf], bus_paths: &[PathBuf]) -> Result<Self, SchemaError> {
        let mut lib = Self::new();
        for path in module_paths {
            lib.load_module_path(path)?;
        }
        for path in bus_paths {
            lib.load_bus_path(path)?;
        }
        log::info!(
            "schema library: {} module(s), {} bus type(s)",
            lib.modules.len(),
            lib.buses.len()
        );
        Ok(lib)
    }

    /// Adds a module schema, replacing any previous one of the same name.
    pub fn insert_module(&mut self, schema: ModuleSchema) {
        if self.modules.contains_key(&schema.name) {
            log::warn!("module `{}` redefined; keeping the later definition", schema.name);
        }
        self.modules.insert(schema.name.clone(), schema);
    }

    /// Adds a bus schema, replacing any previous one of the same name.
    pub fn insert_bus(&mut self, schema: BusSchema) {
        if self.buses.contains_key(&schema.name) {
            log::warn!("bus `{}` redefined; keeping the later definition", schema.name);
        }
        self.buses.insert(schema.name.clone(), schema);
    }

    /// Parses module schemas from YAML text. `origin` is only used in errors.
    ///
    /// Returns the number of modules added.
    pub fn load_modules_str(&mut self, text: &str, origin: &Path) -> Result<usize, SchemaError> {
        let entries = parse_entries(text, origin)?;
        let count = entries.len();
        for (name, node) in entries {
            self.insert_module(ModuleSchema::from_node(&name, &node));
        }
        Ok(count)
    }

    /// Parses bus schemas from YAML text. `origin` is only used in errors.
    ///
    /// Returns the number of buses added.
    pub fn load_buses_str(&mut self, text: &str, origin: &Path) -> Result<usize, SchemaError> {
        let entries = parse_entries(text, origin)?;
        let count = entries.len();
        for (name, node) in entries {
            self.insert_bus(BusSchema::from_node(&name, &node));
        }
        Ok(count)
    }

    /// Loads module schemas from a file, or from every matching file in a directory.
    pub fn load_module_path(&mut self, path: &Path) -> Result<usize, SchemaError> {
        let mut count = 0;
        for file in schema_files(path, MODULE_EXTENSIONS)? {
            count += self.load_modules_str(&read(&file)?, &file)?;
        }
        log::debug!("loaded {count} module(s) from {}", path.display());
        Ok(count)
    }

    /// Loads bus schemas from a file, or from every matching file in a directory.
    pub fn load_bus_path(&mut self, path: &Path) -> Result<usize, SchemaError> {
        let mut count = 0;
        for file in schema_files(path, BUS_EXTENSIONS)? {
            count += self.load_buses_str(&read(&file)?, &file)?;
        }
        log::debug!("loaded {count} bus type(s) from {}", path.display());
        Ok(count)
    }

    /// Iterates over module names in load order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Iterates over bus names in load order.
    pub fn bus_names(&self) -> impl Iterator<Item = &str> {
        self.buses.keys().map(String::as_str)
    }
}

impl SchemaProvider for SchemaLibrary {
    fn module_exists(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    fn module_schema(&self, name: &str) -> Option<&ModuleSchema> {
        self.modules.get(name)
    }

    fn bus_exists(&self, name: &str) -> bool {
        self.buses.contains_key(name)
    }

    fn bus_schema(&self, name: &str) -> Option<&BusSchema> {
        self.buses.get(name)
    }
}

fn read(path: &Path) -> Result<String, SchemaError> {
    std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_entries(text: &str, origin: &Path) -> Result<Vec<(String, Node)>, SchemaError> {
    let root = Node::from_yaml_str(text).map_err(|source| SchemaError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;
    let map = match root {
        Node::Null => return Ok(Vec::new()),
        Node::Mapping(map) => map,
        other => {
            return Err(SchemaError::InvalidLibrary {
                path: origin.to_path_buf(),
                reason: format!("root must be a mapping, found {}", other.kind()),
            })
        }
    };
    let mut entries = Vec::with_capacity(map.len());
    for (key, node) in map {
        match key.scalar_text() {
            Some(name) => entries.push((name.to_string(), node)),
            None => log::warn!("{}: skipping schema with non-scalar name", origin.display()),
        }
    }
    Ok(entries)
}

/// Lists the schema files under `path`: the path itself if it is a file,
/// otherwise the directory's files with a matching extension, sorted by name.
fn schema_files(path: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, SchemaError> {
    let io_err = |source: std::io::Error| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    };
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_err)? {
        let file = entry.map_err(io_err)?.path();
        let matches = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));
        if file.is_file() && matches {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MODULES: &str = r#"
cpu:
  port:
    clk: {direction: input, type: logic}
  bus:
    apb_if: {bus: apb, mapping: {paddr: m_paddr}}
uart:
  port:
    tx: {direction: output, type: logic}
"#;

    #[test]
    fn load_modules_from_text() {
        let mut lib = SchemaLibrary::new();
        let n = lib.load_modules_str(MODULES, Path::new("<memory>")).unwrap();
        assert_eq!(n, 2);
        assert!(lib.module_exists("cpu"));
        assert!(!lib.module_exists("gpu"));
        assert_eq!(lib.module_schema("cpu").unwrap().bus_type("apb_if"), Some("apb"));
        assert_eq!(lib.module_names().collect::<Vec<_>>(), vec!["cpu", "uart"]);
    }

    #[test]
    fn empty_text_loads_nothing() {
        let mut lib = SchemaLibrary::new();
        assert_eq!(lib.load_buses_str("", Path::new("<memory>")).unwrap(), 0);
    }

    #[test]
    fn non_mapping_root_rejected() {
        let mut lib = SchemaLibrary::new();
        let err = lib.load_buses_str("- apb\n", Path::new("x.soc_bus")).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidLibrary { .. }));
    }

    #[test]
    fn later_definition_wins() {
        let mut lib = SchemaLibrary::new();
        lib.insert_bus(BusSchema::with_signals("apb", ["paddr"]));
        lib.insert_bus(BusSchema::with_signals("apb", ["paddr", "pwrite"]));
        assert_eq!(lib.bus_schema("apb").unwrap().port.len(), 2);
    }

    #[test]
    fn directory_scan_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("apb.soc_bus"), "apb:\n  port: {paddr: {}}\n").unwrap();
        fs::write(dir.path().join("ahb.yaml"), "ahb:\n  port: {haddr: {}}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not: a schema\n").unwrap();

        let lib = SchemaLibrary::from_paths(&[], &[dir.path().to_path_buf()]).unwrap();
        assert!(lib.bus_exists("apb"));
        assert!(lib.bus_exists("ahb"));
        assert!(!lib.bus_exists("not"));
        assert_eq!(lib.bus_names().collect::<Vec<_>>(), vec!["ahb", "apb"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SchemaLibrary::from_paths(&[PathBuf::from("/nonexistent/cpu.soc_mod")], &[])
            .unwrap_err();
        assert!(matches!(err, SchemaError::Io { .. }));
    }

    #[test]
    fn parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.soc_mod");
        fs::write(&path, "cpu: [unterminated\n").unwrap();
        let err = SchemaLibrary::from_paths(&[path.clone()], &[]).unwrap_err();
        match err {
            SchemaError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
