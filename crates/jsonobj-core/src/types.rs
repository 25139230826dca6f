//! The value type stored in a tree.
//!
//! Mirrors JSON but keeps integers apart from floats and represents every
//! object as a [`Node`], so a nested document can be walked with the same
//! attribute/subscript vocabulary at every level.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::node::{CopyMap, Node, NodePair};

/// A JSON value whose objects are [`Node`]s.
///
/// Cloning a `Value::Node` clones the handle, not the subtree: both copies
/// observe later mutation. Use [`Node::deep_clone`] for an independent copy.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`. Smaller non-negative integers are always
    /// `Integer`.
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Node(Node),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Node(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(n) => u64::try_from(*n).ok(),
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The node behind this value, or `TypeMismatch`.
    pub fn node(&self) -> Result<&Node> {
        self.as_node().ok_or(Error::TypeMismatch {
            expected: "object",
            found: self.type_name(),
        })
    }

    /// Attribute-style read (`value.name`). Fails with `TypeMismatch` unless
    /// this value is a node.
    pub fn attr(&self, name: &str) -> Result<Value> {
        self.node()?.attr(name)
    }

    /// Subscript read (`value["key"]`). Fails with `TypeMismatch` unless this
    /// value is a node.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.node()?.get(key)
    }

    /// Positional read (`value[i]`) on an array or an array-wrapping node.
    pub fn at(&self, index: usize) -> Result<Value> {
        match self {
            Value::Array(items) => items.get(index).cloned().ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            Value::Node(node) => node.at(index),
            other => Err(Error::TypeMismatch {
                expected: "array",
                found: other.type_name(),
            }),
        }
    }

    /// Copy in which no node is shared with the original. See
    /// [`Node::deep_clone`].
    pub fn deep_clone(&self) -> Value {
        self.deep_clone_with(&mut HashMap::new())
    }

    pub(crate) fn deep_clone_with(&self, copies: &mut CopyMap) -> Value {
        match self {
            Value::Node(node) => Value::Node(node.deep_clone_with(copies)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.deep_clone_with(copies))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Number of elements: array length, visible key count of a node, or
    /// `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            Value::Node(node) => Some(node.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Compact JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::convert::to_json_text(self, &crate::tree::DumpOptions::compact())
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Value::UInt(n), Value::Integer)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(&json)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, &mut Vec::new())
    }
}

pub(crate) fn values_equal(a: &Value, b: &Value, active: &mut Vec<NodePair>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::UInt(x), Value::UInt(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y, active))
        }
        (Value::Node(x), Value::Node(y)) => x.eq_guarded(y, active),
        _ => false,
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<u64> for Value {
    fn eq(&self, other: &u64) -> bool {
        self.as_u64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Value::Float(f) if f == other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

