//! `socnet merge`: print the deep merge of several YAML documents.

use std::fs;

use socnet_doc::Node;

use crate::{GlobalArgs, MergeArgs};

/// Runs the `socnet merge` command.
///
/// Files are merged left to right; keys in later files win. The result is
/// printed to stdout without any netlist validation.
pub fn run(args: &MergeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let merged = merge_files(&args.files)?;
    if !global.quiet {
        eprintln!("    Merged {} file(s)", args.files.len());
    }
    print!("{}", merged.to_yaml_string()?);
    Ok(0)
}

fn merge_files(files: &[std::path::PathBuf]) -> Result<Node, Box<dyn std::error::Error>> {
    let mut merged = Node::Null;
    for path in files {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let doc = Node::from_yaml_str(&text)
            .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
        log::debug!("merging {}", path.display());
        merged = socnet_doc::merge(&merged, &doc);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn later_file_wins() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.yaml");
        let b = tmp.path().join("b.yaml");
        fs::write(&a, "x: 1\nm: {k: a, keep: yes}\n").unwrap();
        fs::write(&b, "m: {k: b}\ny: 2\n").unwrap();
        let merged = merge_files(&[a, b]).unwrap();
        assert_eq!(merged.get_by_key_path("x", ""), "1");
        assert_eq!(merged.get_by_key_path("m.k", ""), "b");
        assert_eq!(merged.get_by_key_path("m.keep", ""), "yes");
        assert_eq!(merged.get_by_key_path("y", ""), "2");
    }

    #[test]
    fn unreadable_file_names_path() {
        let err = merge_files(&[std::path::PathBuf::from("/nonexistent/a.yaml")]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/a.yaml"));
    }
}
