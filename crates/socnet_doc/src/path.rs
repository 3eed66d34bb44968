//! Dotted key-path navigation (`instance.cpu0.module`).

use crate::error::DocError;
use crate::node::Node;

fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}

impl Node {
    /// Follows a dotted key path through nested mappings.
    pub fn get_by_path(&self, path: &str) -> Option<&Node> {
        let keys = segments(path);
        if keys.is_empty() {
            return None;
        }
        keys.into_iter().try_fold(self, |node, key| node.get(key))
    }

    /// Returns `true` if every segment of `path` resolves.
    pub fn has_key_path(&self, path: &str) -> bool {
        self.get_by_path(path).is_some()
    }

    /// Returns the value at `path` as text, or `default` when it is absent.
    ///
    /// Scalars yield their text; mappings and sequences yield their YAML dump.
    pub fn get_by_key_path(&self, path: &str, default: &str) -> String {
        match self.get_by_path(path) {
            Some(Node::Scalar(s)) => s.as_str().to_string(),
            Some(node) => node
                .to_yaml_string()
                .unwrap_or_else(|_| default.to_string()),
            None => default.to_string(),
        }
    }

    /// Stores `value` at `path`, creating intermediate mappings.
    ///
    /// A non-mapping root or intermediate value on the way is replaced by an
    /// empty mapping.
    pub fn set_by_key_path(&mut self, path: &str, value: impl Into<Node>) -> Result<(), DocError> {
        let keys = segments(path);
        let Some((last, parents)) = keys.split_last() else {
            return Err(DocError::InvalidKeyPath(path.to_string()));
        };
        if !self.is_mapping() {
            *self = Node::mapping();
        }
        let mut current = self;
        for key in parents {
            if !current.get(key).is_some_and(Node::is_mapping) {
                current.insert(key, Node::mapping())?;
            }
            current = current
                .get_mut(key)
                .ok_or_else(|| DocError::MissingKey((*key).to_string()))?;
        }
        current.insert(last, value)?;
        Ok(())
    }
}
