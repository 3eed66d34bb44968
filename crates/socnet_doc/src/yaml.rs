//! Conversion between [`Node`] trees and YAML text.

use crate::error::DocError;
use crate::node::{Mapping, Node, Scalar};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;

impl Node {
    /// Parses a YAML document into a node tree.
    ///
    /// Tags (`!foo value`) are dropped and the tagged value kept.
    pub fn from_yaml_str(text: &str) -> Result<Node, DocError> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Node::from(value))
    }

    /// Emits this tree as block-style YAML.
    pub fn to_yaml_string(&self) -> Result<String, DocError> {
        Ok(serde_yaml::to_string(&self.to_value())?)
    }

    /// Converts this tree into a [`serde_yaml::Value`].
    pub fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Node::Scalar(Scalar::Number(text)) => number_value(text),
            Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_value).collect()),
            Node::Mapping(map) => {
                let mut out = serde_yaml::Mapping::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(k.to_value(), v.to_value());
                }
                Value::Mapping(out)
            }
        }
    }
}

fn number_value(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(u) = text.parse::<u64>() {
        return Value::Number(u.into());
    }
    match text.parse::<f64>() {
        Ok(f) => Value::Number(f.into()),
        Err(_) => Value::String(text.to_string()),
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.to_string())),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => {
                let mut out = Mapping::with_capacity(map.len());
                for (k, v) in map {
                    out.insert(Node::from(k), Node::from(v));
                }
                Node::Mapping(out)
            }
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}
