//! Loading, merging, and structural validation of netlist sources.

use crate::error::NetlistError;
use socnet_doc::Node;
use std::path::{Path, PathBuf};

/// One netlist source document.
#[derive(Clone, Debug)]
pub struct NetlistSource {
    /// The file path, or a descriptive name for in-memory text.
    pub path: PathBuf,
    /// The document text.
    pub text: String,
}

impl NetlistSource {
    /// Wraps in-memory text under a display name.
    pub fn from_text(name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: name.into(),
            text: text.into(),
        }
    }

    /// Reads a source file.
    pub fn read(path: &Path) -> Result<Self, NetlistError> {
        let text = std::fs::read_to_string(path).map_err(|source| NetlistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(path, text))
    }

    /// The file name without directory or extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "netlist".to_string())
    }

    fn parse(&self) -> Result<Node, NetlistError> {
        Node::from_yaml_str(&self.text).map_err(|e| NetlistError::Parse {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// A merged, validated netlist and the name its outputs should use.
#[derive(Debug)]
pub struct LoadedNetlist {
    /// The merged document.
    pub document: Node,
    /// The first source's file stem.
    pub name: String,
}

/// Parses every source, merges them in order (later wins), and validates the result.
pub fn load_netlist(sources: &[NetlistSource]) -> Result<LoadedNetlist, NetlistError> {
    let (first, rest) = sources.split_first().ok_or(NetlistError::NoSources)?;
    let mut document = first.parse()?;
    log::debug!("loaded netlist source {}", first.path.display());
    for source in rest {
        document.merge_from(&source.parse()?);
        log::debug!("merged netlist source {}", source.path.display());
    }
    validate_structure(&document)?;
    log::info!(
        "netlist `{}` loaded from {} source(s)",
        first.stem(),
        sources.len()
    );
    Ok(LoadedNetlist {
        document,
        name: first.stem(),
    })
}

/// Reads, merges, and validates netlist files.
pub fn load_netlist_files(paths: &[PathBuf]) -> Result<LoadedNetlist, NetlistError> {
    let sources = paths
        .iter()
        .map(|p| NetlistSource::read(p))
        .collect::<Result<Vec<_>, _>>()?;
    load_netlist(&sources)
}

/// Merges and validates in-memory netlist texts.
pub fn load_netlist_from_strs(texts: &[&str]) -> Result<Node, NetlistError> {
    let sources: Vec<_> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| NetlistSource::from_text(format!("<source {}>", i + 1), *text))
        .collect();
    load_netlist(&sources).map(|loaded| loaded.document)
}

/// Checks the mandatory shape of a netlist document.
///
/// `instance` must be a non-empty mapping; `net`, `bus`, and `port` must be
/// mappings when present.
pub fn validate_structure(doc: &Node) -> Result<(), NetlistError> {
    let invalid = |reason: &str| Err(NetlistError::InvalidStructure(reason.to_string()));
    if doc.is_null() {
        return invalid("netlist document is empty");
    }
    if !doc.is_mapping() {
        return invalid("YAML root must be a map/object");
    }
    match doc.get("instance") {
        None => return invalid("Missing required 'instance' section"),
        Some(Node::Mapping(m)) if !m.is_empty() => {}
        Some(_) => return invalid("'instance' section must be a non-empty map"),
    }
    for section in ["net", "bus", "port"] {
        if doc.get(section).is_some_and(|n| !n.is_mapping()) {
            return Err(NetlistError::InvalidStructure(format!(
                "'{section}' section must be a map"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<Node, NetlistError>) -> String {
        match result {
            Err(NetlistError::InvalidStructure(r)) => r,
            other => panic!("expected structure error, got {other:?}"),
        }
    }

    #[test]
    fn merges_in_argument_order() {
        let doc = load_netlist_from_strs(&[
            "instance:\n  u0: {module: cpu}\n",
            "instance:\n  u0: {module: cpu_v2}\n  u1: {module: uart}\n",
        ])
        .unwrap();
        assert_eq!(doc.get_by_key_path("instance.u0.module", ""), "cpu_v2");
        assert!(doc.has_key_path("instance.u1"));
    }

    #[test]
    fn empty_source_list() {
        assert!(matches!(load_netlist(&[]), Err(NetlistError::NoSources)));
    }

    #[test]
    fn missing_instance_section() {
        let r = reason(load_netlist_from_strs(&["net: {}\n"]));
        assert_eq!(r, "Missing required 'instance' section");
    }

    #[test]
    fn empty_instance_section() {
        let r = reason(load_netlist_from_strs(&["instance: {}\n"]));
        assert_eq!(r, "'instance' section must be a non-empty map");
    }

    #[test]
    fn non_map_root() {
        let r = reason(load_netlist_from_strs(&["- a\n- b\n"]));
        assert_eq!(r, "YAML root must be a map/object");
    }

    #[test]
    fn non_map_optional_sections() {
        for section in ["net", "bus", "port"] {
            let text = format!("instance: {{u0: {{module: m}}}}\n{section}: [a]\n");
            let r = reason(load_netlist_from_strs(&[&text]));
            assert_eq!(r, format!("'{section}' section must be a map"));
        }
    }

    #[test]
    fn later_file_can_fix_structure() {
        let doc = load_netlist_from_strs(&["net: {}\n", "instance: {u0: {module: m}}\n"]);
        assert!(doc.is_ok());
    }

    #[test]
    fn parse_error_names_source() {
        let err = load_netlist_from_strs(&["instance: [\n"]).unwrap_err();
        match err {
            NetlistError::Parse { path, .. } => assert_eq!(path, "<source 1>"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn files_use_first_stem() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("soc_top.soc_net");
        let b = dir.path().join("overrides.yaml");
        std::fs::write(&a, "instance:\n  u0: {module: cpu}\n").unwrap();
        std::fs::write(&b, "port:\n  clk: {direction: input}\n").unwrap();
        let loaded = load_netlist_files(&[a, b]).unwrap();
        assert_eq!(loaded.name, "soc_top");
        assert!(loaded.document.has_key_path("port.clk"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_netlist_files(&[PathBuf::from("/nonexistent/x.yaml")]).unwrap_err();
        assert!(matches!(err, NetlistError::Io { .. }));
    }
}
