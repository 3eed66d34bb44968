//! Hierarchical document model for netlists and schema libraries.
//!
//! Netlists, module schemas, and bus schemas are all loosely-typed YAML
//! trees. This crate wraps them in a tagged [`Node`] whose accessors return
//! [`DocError`] instead of silently defaulting, and provides the deep
//! [`merge`] used to compose several source files into one document.

#![warn(missing_docs)]

pub mod error;
pub mod merge;
pub mod node;
pub mod path;
pub mod yaml;

pub use error::DocError;
pub use merge::merge;
pub use node::{Mapping, MappingExt, Node, NodeKind, Scalar};
