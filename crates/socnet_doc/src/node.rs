//! The tagged document tree.

use crate::error::DocError;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An insertion-ordered mapping of keys to child nodes.
pub type Mapping = IndexMap<Node, Node>;

/// A scalar leaf value.
///
/// Numbers keep their textual form so that hashing and equality stay exact
/// and values such as `0x10` or `007` survive a load/dump cycle untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// A boolean (`true`/`false`).
    Bool(bool),
    /// A number, stored as written.
    Number(String),
    /// Any other text.
    String(String),
}

impl Scalar {
    /// Returns the scalar's textual form.
    pub fn as_str(&self) -> &str {
        match self {
            Scalar::Bool(true) => "true",
            Scalar::Bool(false) => "false",
            Scalar::Number(s) | Scalar::String(s) => s,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shape of a [`Node`], used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// An absent or `~` value.
    Null,
    /// A leaf value.
    Scalar,
    /// An ordered list.
    Sequence,
    /// A key/value map.
    Mapping,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Null => "null",
            NodeKind::Scalar => "scalar",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
        };
        f.write_str(s)
    }
}

/// A node in a hierarchical key/value document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Node {
    /// No value.
    #[default]
    Null,
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered list of nodes.
    Sequence(Vec<Node>),
    /// An insertion-ordered map.
    Mapping(Mapping),
}

// Mapping equality ignores order, so only the length may feed the hash.
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Node::Null => {}
            Node::Scalar(s) => s.hash(state),
            Node::Sequence(items) => items.hash(state),
            Node::Mapping(map) => map.len().hash(state),
        }
    }
}

impl Node {
    /// Creates an empty mapping node.
    pub fn mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    /// Creates a string scalar node.
    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(s.into()))
    }

    /// Returns the shape of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
        }
    }

    /// Returns `true` for [`Node::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Returns `true` for [`Node::Scalar`].
    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    /// Returns `true` for [`Node::Sequence`].
    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    /// Returns `true` for [`Node::Mapping`].
    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    fn wrong_kind(&self, context: &str, expected: NodeKind) -> DocError {
        DocError::WrongKind {
            context: context.to_string(),
            expected,
            found: self.kind(),
        }
    }

    /// Returns the text of a scalar node, or `None` for any other shape.
    pub fn scalar_text(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the text of a scalar node.
    pub fn as_str(&self) -> Result<&str, DocError> {
        self.scalar_text()
            .ok_or_else(|| self.wrong_kind("node", NodeKind::Scalar))
    }

    /// Returns the node as a mapping.
    pub fn as_mapping(&self) -> Result<&Mapping, DocError> {
        match self {
            Node::Mapping(m) => Ok(m),
            _ => Err(self.wrong_kind("node", NodeKind::Mapping)),
        }
    }

    /// Returns the node as a mutable mapping.
    pub fn as_mapping_mut(&mut self) -> Result<&mut Mapping, DocError> {
        match self {
            Node::Mapping(m) => Ok(m),
            other => Err(other.wrong_kind("node", NodeKind::Mapping)),
        }
    }

    /// Returns the node as a sequence.
    pub fn as_sequence(&self) -> Result<&[Node], DocError> {
        match self {
            Node::Sequence(items) => Ok(items),
            _ => Err(self.wrong_kind("node", NodeKind::Sequence)),
        }
    }

    /// Looks up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(m) => m.lookup(key),
            _ => None,
        }
    }

    /// Looks up `key` mutably when this node is a mapping.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self {
            Node::Mapping(m) => m.lookup_mut(key),
            _ => None,
        }
    }

    /// Returns `true` if this node is a mapping containing `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Looks up a key that must be present.
    pub fn require(&self, key: &str) -> Result<&Node, DocError> {
        let map = match self {
            Node::Mapping(m) => m,
            _ => return Err(self.wrong_kind(key, NodeKind::Mapping)),
        };
        map.lookup(key)
            .ok_or_else(|| DocError::MissingKey(key.to_string()))
    }

    /// Looks up a key that must hold a scalar and returns its text.
    pub fn get_str(&self, key: &str) -> Result<&str, DocError> {
        let node = self.require(key)?;
        node.scalar_text()
            .ok_or_else(|| node.wrong_kind(key, NodeKind::Scalar))
    }

    /// Looks up a key that must hold a mapping.
    pub fn get_mapping(&self, key: &str) -> Result<&Mapping, DocError> {
        match self.require(key)? {
            Node::Mapping(m) => Ok(m),
            other => Err(other.wrong_kind(key, NodeKind::Mapping)),
        }
    }

    /// Inserts `value` under `key`, turning a null node into a mapping first.
    ///
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: &str, value: impl Into<Node>) -> Result<Option<Node>, DocError> {
        if self.is_null() {
            *self = Node::mapping();
        }
        let map = self.as_mapping_mut()?;
        let value = value.into();
        match map.lookup_mut(key) {
            Some(slot) => Ok(Some(std::mem::replace(slot, value))),
            None => {
                map.insert(Node::string(key), value);
                Ok(None)
            }
        }
    }

    /// Removes `key` from a mapping, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let map = match self {
            Node::Mapping(m) => m,
            _ => return None,
        };
        let index = map.key_index(key)?;
        map.shift_remove_index(index).map(|(_, v)| v)
    }

    /// Returns the mapping stored under `key`, creating it when absent or null.
    ///
    /// A null node is first turned into a mapping. A present non-mapping
    /// value is an error and is left untouched.
    pub fn entry_mapping(&mut self, key: &str) -> Result<&mut Mapping, DocError> {
        if self.is_null() {
            *self = Node::mapping();
        }
        let map = self.as_mapping_mut()?;
        let index = match map.key_index(key) {
            Some(i) => i,
            None => map.insert_full(Node::string(key), Node::mapping()).0,
        };
        let slot = match map.get_index_mut(index) {
            Some((_, v)) => v,
            None => return Err(DocError::MissingKey(key.to_string())),
        };
        if slot.is_null() {
            *slot = Node::mapping();
        }
        match slot {
            Node::Mapping(m) => Ok(m),
            other => Err(other.wrong_kind(key, NodeKind::Mapping)),
        }
    }

    /// Number of entries in a mapping or sequence; zero for anything else.
    pub fn len(&self) -> usize {
        match self {
            Node::Mapping(m) => m.len(),
            Node::Sequence(items) => items.len(),
            _ => 0,
        }
    }

    /// Returns `true` if [`len`](Self::len) is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// String-keyed access on a [`Mapping`].
///
/// Keys are matched by scalar text, so a key written as `0` in YAML (a
/// number) is still found by looking up `"0"`.
pub trait MappingExt {
    /// Returns the position of the entry whose key text equals `key`.
    fn key_index(&self, key: &str) -> Option<usize>;
    /// Returns the value stored under `key`.
    fn lookup(&self, key: &str) -> Option<&Node>;
    /// Returns the value stored under `key` mutably.
    fn lookup_mut(&mut self, key: &str) -> Option<&mut Node>;
}

impl MappingExt for Mapping {
    fn key_index(&self, key: &str) -> Option<usize> {
        if let Some(i) = self.get_index_of(&Node::string(key)) {
            return Some(i);
        }
        self.keys().position(|k| k.scalar_text() == Some(key))
    }

    fn lookup(&self, key: &str) -> Option<&Node> {
        let i = self.key_index(key)?;
        self.get_index(i).map(|(_, v)| v)
    }

    fn lookup_mut(&mut self, key: &str) -> Option<&mut Node> {
        let i = self.key_index(key)?;
        self.get_index_mut(i).map(|(_, v)| v)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::string(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::string(s)
    }
}

impl From<Cow<'_, str>> for Node {
    fn from(s: Cow<'_, str>) -> Self {
        Node::string(s.into_owned())
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Scalar(Scalar::Number(n.to_string()))
    }
}

impl From<u32> for Node {
    fn from(n: u32) -> Self {
        Node::Scalar(Scalar::Number(n.to_string()))
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Node::Mapping(m)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}
