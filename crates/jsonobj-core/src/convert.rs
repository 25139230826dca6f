//! Free functions over a tree or an array of trees.
//!
//! Each function accepts a [`Value`]: a node is handled directly, an array is
//! handled element by element. Functions whose result has the same shape for
//! both (plain JSON, text) return it directly; the others return [`Lifted`].

use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::load::{self, LoadOptions, Source};
use crate::node::Node;
use crate::tree::{encode_json, DumpOptions, PlainWriter};
use crate::types::Value;

/// Result of an operation lifted over one tree or many.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifted<T> {
    Single(T),
    Each(Vec<T>),
}

impl<T> Lifted<T> {
    /// The single result, or `None` for an element-wise one.
    pub fn single(self) -> Option<T> {
        match self {
            Lifted::Single(t) => Some(t),
            Lifted::Each(_) => None,
        }
    }

    /// All results as a vector.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Lifted::Single(t) => vec![t],
            Lifted::Each(items) => items,
        }
    }
}

/// Apply `op` to a node, or to every node of an array.
fn lift<T>(target: &Value, mut op: impl FnMut(&Node) -> Result<T>) -> Result<Lifted<T>> {
    match target {
        Value::Node(node) => Ok(Lifted::Single(op(node)?)),
        Value::Array(items) => items
            .iter()
            .map(|item| op(item.node()?))
            .collect::<Result<Vec<_>>>()
            .map(Lifted::Each),
        other => Err(Error::TypeMismatch {
            expected: "object or array of objects",
            found: other.type_name(),
        }),
    }
}

/// Parse JSON text into a tree.
///
/// ```
/// let tree = jsonobj_core::parse_text(r#"{"a":{"b":{"c":7}}}"#).unwrap();
/// assert_eq!(tree.attr("a").unwrap().attr("b").unwrap().attr("c").unwrap(), 7);
/// ```
pub fn parse_text(text: &str) -> Result<Node> {
    load::parse_text_with(text, &LoadOptions::default())
}

/// Parse raw bytes in any JSON-legal Unicode encoding.
pub fn parse_bytes(bytes: &[u8]) -> Result<Node> {
    load::parse_bytes_with(bytes, &LoadOptions::default())
}

/// Load a tree from a path, URI or reader.
pub fn load_from(source: impl Into<Source>) -> Result<Node> {
    load::load_with(source, &LoadOptions::default())
}

/// Plain JSON for a node, an array (element-wise) or a scalar.
pub fn to_plain_value(target: &Value) -> Result<Json> {
    PlainWriter::new(None).value(target)
}

/// JSON text for a node, an array or a scalar. Wrapper nodes are written as
/// arrays.
pub fn to_json_text(target: &Value, options: &DumpOptions) -> Result<String> {
    let plain = PlainWriter::new(options.filter.as_ref()).value(target)?;
    encode_json(&plain, options.indent.as_deref())
}

/// Tree-free JSON obtained by serializing and parsing back.
pub fn to_parsed_json(target: &Value) -> Result<Json> {
    let text = to_json_text(target, &DumpOptions::compact())?;
    Ok(serde_json::from_str(&text)?)
}

/// [`Node::get_or_default`] over one tree or many.
pub fn get_with_default(
    target: &Value,
    key: &str,
    default: impl Into<Value>,
) -> Result<Lifted<Value>> {
    let default = default.into();
    lift(target, |node| Ok(node.get_or_default(key, default.clone())))
}

/// [`Node::set_default`] over one tree or many.
pub fn set_default_entry(
    target: &Value,
    key: &str,
    value: impl Into<Value>,
) -> Result<Lifted<Value>> {
    let value = value.into();
    lift(target, |node| node.set_default(key, value.deep_clone()))
}

/// Visible `(key, value)` pairs of one tree or many.
pub fn entries_of(target: &Value) -> Result<Lifted<Vec<(String, Value)>>> {
    lift(target, |node| Ok(node.entries().collect()))
}
