//! JSON ⇄ tree conversion on top of [`Node`].
//!
//! Building a tree walks a `serde_json::Value` once: objects become nodes
//! (dropping reserved `_` keys), arrays stay arrays with converted elements,
//! scalars are copied. A top-level array becomes a wrapper node.
//!
//! Going back, every node is turned into a plain `serde_json::Map` depth-first.
//! An optional per-node filter sees each map after its children have been
//! converted, and the result is handed to `serde_json` for encoding.

use std::fmt;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Number, Value as Json};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::NodeFilter;
use crate::node::{MissingHook, Node, SENTINEL};
use crate::types::Value;

/// Indentation used when none is requested explicitly.
pub const DEFAULT_INDENT: &str = "   ";

/// Serialization settings for [`Node::to_json_text`].
#[derive(Clone)]
pub struct DumpOptions {
    /// Indentation unit, or `None` for compact single-line output.
    pub indent: Option<String>,
    /// Applied to the plain form of every node before encoding.
    pub filter: Option<NodeFilter>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            indent: Some(DEFAULT_INDENT.to_string()),
            filter: None,
        }
    }
}

impl DumpOptions {
    /// Single-line output with no filter.
    pub fn compact() -> Self {
        DumpOptions {
            indent: None,
            filter: None,
        }
    }

    /// Indent nested levels by `width` spaces.
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = Some(" ".repeat(width));
        self
    }

    pub fn no_indent(mut self) -> Self {
        self.indent = None;
        self
    }

    pub fn filter(mut self, filter: NodeFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl fmt::Debug for DumpOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DumpOptions")
            .field("indent", &self.indent)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .finish()
    }
}

// ----------------------------------------------------------------------
// JSON -> tree
// ----------------------------------------------------------------------

impl Value {
    /// Convert a plain JSON value. Objects become nodes without a hook;
    /// a top-level array stays an array.
    pub fn from_json(json: &Json) -> Value {
        convert_value(json, None)
    }

    /// Like [`Value::from_json`], attaching `hook` to every node produced.
    pub fn from_json_with_hook(json: &Json, hook: MissingHook) -> Value {
        convert_value(json, Some(&hook))
    }
}

fn convert_value(json: &Json, hook: Option<&MissingHook>) -> Value {
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => convert_number(n),
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => {
            Value::Array(items.iter().map(|item| convert_value(item, hook)).collect())
        }
        Json::Object(map) => Value::Node(convert_object(map, hook)),
    }
}

/// Integers stay exact: `i64` where they fit, `u64` above that.
fn convert_number(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Value::UInt(u)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn convert_object(map: &Map<String, Json>, hook: Option<&MissingHook>) -> Node {
    let mut entries = IndexMap::with_capacity(map.len());
    for (key, child) in map {
        if key.starts_with(SENTINEL) {
            debug!(key = key.as_str(), "dropping reserved key during conversion");
            continue;
        }
        entries.insert(key.clone(), convert_value(child, hook));
    }
    Node::from_parts(entries, None, hook.cloned())
}

impl Node {
    /// Build a tree from a parsed document.
    ///
    /// An object becomes the root node; an array becomes a wrapper node
    /// holding the converted elements. Scalar documents are rejected with
    /// `TypeMismatch`.
    pub fn from_json(json: &Json) -> Result<Node> {
        Self::build(json, None)
    }

    /// Like [`Node::from_json`], attaching `hook` to every node produced.
    pub fn from_json_with_hook(json: &Json, hook: MissingHook) -> Result<Node> {
        Self::build(json, Some(&hook))
    }

    pub(crate) fn build(json: &Json, hook: Option<&MissingHook>) -> Result<Node> {
        match json {
            Json::Object(map) => Ok(convert_object(map, hook)),
            Json::Array(items) => Ok(Node::from_parts(
                IndexMap::new(),
                Some(items.iter().map(|item| convert_value(item, hook)).collect()),
                hook.cloned(),
            )),
            other => Err(Error::TypeMismatch {
                expected: "object or array",
                found: Value::from_json(other).type_name(),
            }),
        }
    }

    /// Keyword-style construction. Names beginning with `_` are dropped.
    pub fn from_entries<I, K>(entries: I) -> Node
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .filter(|(k, _)| !k.starts_with(SENTINEL))
            .collect();
        Node::from_parts(entries, None, None)
    }

    /// [`Node::from_entries`] with `hook` installed on the new node and on
    /// every node nested in the given values.
    pub fn from_entries_with_hook<I, K>(entries: I, hook: MissingHook) -> Node
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let node = Self::from_entries(entries);
        attach_hook(&Value::Node(node.clone()), &hook, &mut Vec::new());
        node
    }

    /// A wrapper node standing in for a top-level array.
    pub fn wrap(items: Vec<Value>) -> Node {
        Node::from_parts(IndexMap::new(), Some(items), None)
    }

    /// `node[index]`: positional read on a wrapper node.
    pub fn at(&self, index: usize) -> Result<Value> {
        let data = self.data();
        match &data.wrapped {
            Some(items) => items.get(index).cloned().ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            None => Err(Error::TypeMismatch {
                expected: "array",
                found: "object",
            }),
        }
    }

    /// Insert `value` under `key` if absent, then return what is stored.
    pub fn set_default(&self, key: &str, value: impl Into<Value>) -> Result<Value> {
        if let Some(existing) = self.data().entries.get(key) {
            return Ok(existing.clone());
        }
        let value = value.into();
        self.set(key, value.clone())?;
        Ok(value)
    }

    /// [`Node::set_default`] for plain JSON: a map is converted into a node
    /// carrying this node's hook.
    pub fn set_default_json(&self, key: &str, json: &Json) -> Result<Value> {
        if let Some(existing) = self.data().entries.get(key) {
            return Ok(existing.clone());
        }
        let hook = self.missing_hook();
        self.set_default(key, convert_value(json, hook.as_ref()))
    }

    // ------------------------------------------------------------------
    // tree -> JSON
    // ------------------------------------------------------------------

    /// Plain nested form with reserved slots dropped. A wrapper yields its
    /// array.
    pub fn to_plain(&self) -> Result<Json> {
        PlainWriter::new(None).node(self)
    }

    /// JSON text. Wrappers are written as arrays.
    pub fn to_json_text(&self, options: &DumpOptions) -> Result<String> {
        let plain = PlainWriter::new(options.filter.as_ref()).node(self)?;
        encode_json(&plain, options.indent.as_deref())
    }

    /// Tree-free JSON: serialize, then parse the text back.
    pub fn to_parsed_json(&self) -> Result<Json> {
        let text = self.to_json_text(&DumpOptions::compact())?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn attach_hook(value: &Value, hook: &MissingHook, seen: &mut Vec<Node>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| attach_hook(item, hook, seen)),
        Value::Node(node) => {
            if seen.iter().any(|s| Node::ptr_eq(s, node)) {
                return;
            }
            seen.push(node.clone());
            node.replace_missing_hook(Some(hook.clone()));
            let children: Vec<Value> = {
                let data = node.data();
                data.entries
                    .values()
                    .chain(data.wrapped.iter().flatten())
                    .cloned()
                    .collect()
            };
            children.iter().for_each(|child| attach_hook(child, hook, seen));
        }
        _ => {}
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Node::from_entries(iter)
    }
}

/// Depth-first tree walker producing plain JSON.
///
/// Keeps the chain of nodes currently being converted so that a node
/// reachable from itself is reported instead of recursing forever.
pub(crate) struct PlainWriter<'f> {
    filter: Option<&'f NodeFilter>,
    ancestors: Vec<Node>,
}

impl<'f> PlainWriter<'f> {
    pub(crate) fn new(filter: Option<&'f NodeFilter>) -> Self {
        PlainWriter {
            filter,
            ancestors: Vec::new(),
        }
    }

    pub(crate) fn value(&mut self, value: &Value) -> Result<Json> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(n) => Json::Number(Number::from(*n)),
            Value::UInt(n) => Json::Number(Number::from(*n)),
            // JSON has no NaN or infinities.
            Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::String(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.value(item))
                    .collect::<Result<_>>()?,
            ),
            Value::Node(node) => self.node(node)?,
        })
    }

    pub(crate) fn node(&mut self, node: &Node) -> Result<Json> {
        if self.ancestors.iter().any(|a| Node::ptr_eq(a, node)) {
            return Err(Error::CyclicTree);
        }
        self.ancestors.push(node.clone());
        let data = node.data();
        let out = match &data.wrapped {
            Some(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.value(item))
                    .collect::<Result<_>>()?,
            ),
            None => {
                let mut map = Map::with_capacity(data.entries.len());
                for (key, child) in &data.entries {
                    map.insert(key.clone(), self.value(child)?);
                }
                Json::Object(match self.filter {
                    Some(filter) => filter(map),
                    None => map,
                })
            }
        };
        drop(data);
        self.ancestors.pop();
        Ok(out)
    }
}

/// Encode plain JSON, pretty-printed with `indent` when given.
pub(crate) fn encode_json(value: &Json, indent: Option<&str>) -> Result<String> {
    let Some(indent) = indent else {
        return Ok(serde_json::to_string(value)?);
    };
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(
        &mut buf,
        PrettyFormatter::with_indent(indent.as_bytes()),
    );
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|_| Error::Encoding("UTF-8"))
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_plain()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        PlainWriter::new(None)
            .value(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}
