//! Deep merge of two documents, later document winning.

use crate::node::{Mapping, MappingExt, Node};

/// Deep-merges `from` on top of `to` and returns the result.
///
/// - A null `from` leaves `to` unchanged; any other non-mapping `from` replaces it.
/// - A non-mapping `to` is replaced by `from`.
/// - Mappings merge key by key, recursing where both sides have the key.
///   Keys only in `to` keep their position; keys only in `from` are appended.
/// - Sequences are not merged element-wise; the later one wins.
/// - Entries with non-scalar keys are copied from `from` without recursion.
pub fn merge(to: &Node, from: &Node) -> Node {
    let from_map = match from {
        Node::Mapping(m) => m,
        Node::Null => return to.clone(),
        other => return other.clone(),
    };
    let to_map = match to {
        Node::Mapping(m) => m,
        _ => return from.clone(),
    };
    if from_map.is_empty() {
        return to.clone();
    }

    let mut result = Mapping::with_capacity(to_map.len() + from_map.len());
    for (key, value) in to_map {
        let merged = key
            .scalar_text()
            .and_then(|text| from_map.lookup(text))
            .map(|later| merge(value, later));
        result.insert(key.clone(), merged.unwrap_or_else(|| value.clone()));
    }
    for (key, value) in from_map {
        let already_merged = key
            .scalar_text()
            .is_some_and(|text| result.key_index(text).is_some());
        if !already_merged {
            result.insert(key.clone(), value.clone());
        }
    }
    Node::Mapping(result)
}

impl Node {
    /// Merges `from` into this document in place; see [`merge`].
    pub fn merge_from(&mut self, from: &Node) {
        *self = merge(self, from);
    }
}
