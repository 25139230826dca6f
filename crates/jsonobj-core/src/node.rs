//! The dual-access node: one ordered map, two ways in.
//!
//! Every entry of a [`Node`] is reachable both as a string-keyed subscript
//! ([`Node::get`], [`Node::set`], [`Node::delete`]) and as a named attribute
//! ([`Node::attr`], [`Node::set_attr`], [`Node::del_attr`]). Both surfaces go
//! through the same private `read_entry`/`store`/`remove` routines and differ only
//! in the error kind they report, so they cannot drift apart.
//!
//! Two pieces of internal state live beside the data map rather than in it:
//! the wrapped root array (a node standing in for a top-level JSON array) and
//! the missing-key hook. They are addressable under the reserved names
//! [`ROOT_SLOT`] and [`HOOK_SLOT`]; every other key beginning with
//! [`SENTINEL`] is rejected.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Error, Result};
use crate::types::{values_equal, Value};

/// Leading character that marks a key as internal.
pub const SENTINEL: char = '_';

/// Reserved name of the wrapped-array slot.
pub const ROOT_SLOT: &str = "_root";

/// Reserved name of the missing-key hook slot.
pub const HOOK_SLOT: &str = "_if_missing";

/// Callback invoked with the key name when a read finds nothing.
///
/// The hook may return a stand-in value, fail, or materialize the value
/// (including inserting it into the node that called it: the node is not
/// borrowed while the hook runs).
pub type MissingHook = Rc<dyn Fn(&str) -> Result<Value>>;

/// Returns true if `name` can be used as an attribute.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[derive(Default)]
pub(crate) struct NodeData {
    pub(crate) entries: IndexMap<String, Value>,
    pub(crate) wrapped: Option<Vec<Value>>,
    pub(crate) missing_hook: Option<MissingHook>,
}

/// Which surface a request came through; decides the not-found error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Subscript,
    Attribute,
}

impl Access {
    fn not_found(self, key: &str) -> Error {
        match self {
            Access::Subscript => Error::KeyNotFound(key.to_string()),
            Access::Attribute => Error::AttributeNotFound(key.to_string()),
        }
    }
}

fn invalid_key(key: &str, reason: impl Into<String>) -> Error {
    Error::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// A JSON object (or wrapped top-level array) with dual access.
///
/// `Node` is a cheap, single-threaded handle: clones share the same storage,
/// and all mutators take `&self`. It is neither `Send` nor `Sync`.
#[derive(Clone, Default)]
pub struct Node {
    inner: Rc<RefCell<NodeData>>,
}

impl Node {
    /// An empty node with no hook.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty node whose missing reads are answered by `hook`.
    pub fn with_missing_hook(hook: impl Fn(&str) -> Result<Value> + 'static) -> Self {
        let node = Self::new();
        node.set_missing_hook(hook);
        node
    }

    pub(crate) fn from_parts(
        entries: IndexMap<String, Value>,
        wrapped: Option<Vec<Value>>,
        missing_hook: Option<MissingHook>,
    ) -> Self {
        Node {
            inner: Rc::new(RefCell::new(NodeData {
                entries,
                wrapped,
                missing_hook,
            })),
        }
    }

    pub(crate) fn data(&self) -> Ref<'_, NodeData> {
        self.inner.borrow()
    }

    /// True if both handles point at the same storage.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    // ------------------------------------------------------------------
    // Subscript surface
    // ------------------------------------------------------------------

    /// `node[key]`: the stored value, else the hook's answer, else `KeyNotFound`.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.read_entry(key, Access::Subscript)
    }

    /// `node[key] = value`.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.store(key, value.into(), Access::Subscript)
    }

    /// `del node[key]`.
    pub fn delete(&self, key: &str) -> Result<Value> {
        self.remove(key, Access::Subscript)
    }

    // ------------------------------------------------------------------
    // Attribute surface
    // ------------------------------------------------------------------

    /// `node.name`: the stored value, else the hook's answer, else
    /// `AttributeNotFound`. Names that are not identifiers are never
    /// visible as attributes.
    pub fn attr(&self, name: &str) -> Result<Value> {
        if !is_identifier(name) {
            return Err(Error::AttributeNotFound(name.to_string()));
        }
        self.read_entry(name, Access::Attribute)
    }

    /// `node.name = value`.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.store(name, value.into(), Access::Attribute)
    }

    /// `del node.name`.
    pub fn del_attr(&self, name: &str) -> Result<Value> {
        self.remove(name, Access::Attribute)
    }

    // ------------------------------------------------------------------
    // Map-like operations
    // ------------------------------------------------------------------

    /// Membership over visible keys. Reserved slots are never contained.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Visible key count, or the wrapped array's length for a wrapper.
    pub fn len(&self) -> usize {
        let data = self.inner.borrow();
        match &data.wrapped {
            Some(items) => items.len(),
            None => data.entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    /// Lazy iterator of `(key, value)` pairs in insertion order.
    ///
    /// The iterator holds its own handle and reads one entry per step, so the
    /// node may be mutated between steps; clone it to restart.
    pub fn entries(&self) -> Entries {
        Entries {
            node: self.clone(),
            pos: 0,
        }
    }

    /// The stored value, or `default` when absent. Never calls the hook.
    pub fn get_or_default(&self, key: &str, default: impl Into<Value>) -> Value {
        self.inner
            .borrow()
            .entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    // ------------------------------------------------------------------
    // Reserved slots
    // ------------------------------------------------------------------

    pub fn set_missing_hook(&self, hook: impl Fn(&str) -> Result<Value> + 'static) {
        self.inner.borrow_mut().missing_hook = Some(Rc::new(hook));
    }

    pub fn clear_missing_hook(&self) {
        self.inner.borrow_mut().missing_hook = None;
    }

    pub fn missing_hook(&self) -> Option<MissingHook> {
        self.inner.borrow().missing_hook.clone()
    }

    pub(crate) fn replace_missing_hook(&self, hook: Option<MissingHook>) {
        self.inner.borrow_mut().missing_hook = hook;
    }

    /// True if this node stands in for a top-level JSON array.
    pub fn is_wrapper(&self) -> bool {
        self.inner.borrow().wrapped.is_some()
    }

    /// A copy of the wrapped array, if any.
    pub fn wrapped(&self) -> Option<Vec<Value>> {
        self.inner.borrow().wrapped.clone()
    }

    // ------------------------------------------------------------------
    // Shared storage routines
    // ------------------------------------------------------------------

    fn read_entry(&self, key: &str, access: Access) -> Result<Value> {
        let hook = {
            let data = self.inner.borrow();
            if data.wrapped.is_some() {
                return Err(access.not_found(key));
            }
            if let Some(value) = data.entries.get(key) {
                return Ok(value.clone());
            }
            data.missing_hook.clone()
        };
        match hook {
            Some(hook) => {
                trace!(key, "missing key answered by hook");
                hook(key)
            }
            None => Err(access.not_found(key)),
        }
    }

    fn store(&self, key: &str, value: Value, access: Access) -> Result<()> {
        if key.starts_with(SENTINEL) {
            return self.store_reserved(key, value);
        }
        if access == Access::Attribute && !is_identifier(key) {
            return Err(invalid_key(key, "not an identifier; use subscript access"));
        }
        let mut data = self.inner.borrow_mut();
        if data.wrapped.is_some() {
            return Err(invalid_key(key, "node wraps an array and holds no keys"));
        }
        // IndexMap::insert keeps the original position of an existing key.
        data.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn store_reserved(&self, key: &str, value: Value) -> Result<()> {
        let mut data = self.inner.borrow_mut();
        match key {
            ROOT_SLOT => match value {
                Value::Array(items) => {
                    if !data.entries.is_empty() {
                        return Err(invalid_key(key, "node already holds keys"));
                    }
                    data.wrapped = Some(items);
                    Ok(())
                }
                other => Err(invalid_key(
                    key,
                    format!("expected an array, found {}", other.type_name()),
                )),
            },
            HOOK_SLOT => match value {
                Value::Null => {
                    data.missing_hook = None;
                    Ok(())
                }
                _ => Err(invalid_key(key, "install hooks with set_missing_hook")),
            },
            _ => Err(invalid_key(key, "keys beginning with '_' are reserved")),
        }
    }

    fn remove(&self, key: &str, access: Access) -> Result<Value> {
        let removed = self.inner.borrow_mut().entries.shift_remove(key);
        removed.ok_or_else(|| access.not_found(key))
    }

    /// An unshared copy of the whole subtree. Hooks are shared, not copied.
    ///
    /// The copy has the same shape as the original: a node reached twice is
    /// copied once, and a cycle is reproduced in the copy.
    pub fn deep_clone(&self) -> Node {
        self.deep_clone_with(&mut HashMap::new())
    }

    pub(crate) fn deep_clone_with(&self, copies: &mut CopyMap) -> Node {
        let key = Rc::as_ptr(&self.inner);
        if let Some(copy) = copies.get(&key) {
            return copy.clone();
        }
        let copy = Node::new();
        copies.insert(key, copy.clone());
        let data = self.inner.borrow();
        let entries = data
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_clone_with(copies)))
            .collect();
        let wrapped = data
            .wrapped
            .as_ref()
            .map(|items| items.iter().map(|item| item.deep_clone_with(copies)).collect());
        *copy.inner.borrow_mut() = NodeData {
            entries,
            wrapped,
            missing_hook: data.missing_hook.clone(),
        };
        copy
    }

    /// Structural comparison that tolerates cycles: a pair of nodes met again
    /// while still being compared is taken as equal so far.
    pub(crate) fn eq_guarded(&self, other: &Node, active: &mut Vec<NodePair>) -> bool {
        if Node::ptr_eq(self, other) {
            return true;
        }
        let pair = (Rc::as_ptr(&self.inner), Rc::as_ptr(&other.inner));
        if active.contains(&pair) {
            return true;
        }
        active.push(pair);
        let (a, b) = (self.inner.borrow(), other.inner.borrow());
        let same = match (&a.wrapped, &b.wrapped) {
            (Some(x), Some(y)) => {
                x.len() == y.len()
                    && x.iter().zip(y).all(|(x, y)| values_equal(x, y, active))
            }
            (None, None) => {
                a.entries.len() == b.entries.len()
                    && a.entries
                        .iter()
                        .zip(&b.entries)
                        .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb, active))
            }
            _ => false,
        };
        active.pop();
        same
    }
}

type NodePtr = *const RefCell<NodeData>;

/// Originals already copied by a deep clone, keyed by storage address.
pub(crate) type CopyMap = HashMap<NodePtr, Node>;

pub(crate) type NodePair = (NodePtr, NodePtr);

impl PartialEq for Node {
    /// Structural equality over visible keys (in order) and the wrapped array.
    /// Hooks do not take part.
    fn eq(&self, other: &Self) -> bool {
        self.eq_guarded(other, &mut Vec::new())
    }
}

impl fmt::Debug for Node {
    /// The node's plain JSON form; a node that reaches itself prints as
    /// `Node(<cyclic>)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_plain() {
            Ok(plain) => write!(f, "Node({plain})"),
            Err(_) => f.write_str("Node(<cyclic>)"),
        }
    }
}

impl fmt::Display for Node {
    /// Compact JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .to_json_text(&crate::tree::DumpOptions::compact())
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Iterator returned by [`Node::entries`].
#[derive(Clone)]
pub struct Entries {
    node: Node,
    pos: usize,
}

impl Iterator for Entries {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.node.inner.borrow();
        let (key, value) = data.entries.get_index(self.pos)?;
        self.pos += 1;
        Some((key.clone(), value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.node.inner.borrow().entries.len().saturating_sub(self.pos);
        (0, Some(remaining))
    }
}
