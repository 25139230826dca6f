//! Per-node filters for serialization.
//!
//! A [`NodeFilter`] receives the plain map of one node (children already
//! converted and filtered) and returns the map to encode in its place. It runs
//! once for every node in the tree, so a filter that drops or reorders keys
//! acts at every depth without walking the tree itself.
//!
//! ```
//! use jsonobj_core::{filter, parse_text, DumpOptions};
//!
//! let tree = parse_text(r#"{"b":1,"etag":"x","a":{"etag":"y","z":2}}"#).unwrap();
//! let opts = DumpOptions::compact()
//!     .filter(filter::compose(filter::strip_keys(["etag"]), filter::sort_keys()));
//! assert_eq!(tree.to_json_text(&opts).unwrap(), r#"{"a":{"z":2},"b":1}"#);
//! ```

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::{Map, Value};

/// Transform applied to each node's plain form before encoding.
pub type NodeFilter = Rc<dyn Fn(Map<String, Value>) -> Map<String, Value>>;

/// Wrap a closure as a [`NodeFilter`].
pub fn from_fn(f: impl Fn(Map<String, Value>) -> Map<String, Value> + 'static) -> NodeFilter {
    Rc::new(f)
}

/// Drop every key named in `keys`, at any depth.
///
/// Names are matched exactly; an empty list yields the identity filter.
pub fn strip_keys<I, S>(keys: I) -> NodeFilter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keys: HashSet<String> = keys.into_iter().map(Into::into).collect();
    Rc::new(move |map: Map<String, Value>| {
        if keys.is_empty() {
            return map;
        }
        map.into_iter().filter(|(k, _)| !keys.contains(k)).collect()
    })
}

/// Reorder every object's keys lexicographically.
pub fn sort_keys() -> NodeFilter {
    Rc::new(|map: Map<String, Value>| {
        let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
        pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
        pairs.into_iter().collect()
    })
}

/// Run `first`, then `second`.
pub fn compose(first: NodeFilter, second: NodeFilter) -> NodeFilter {
    Rc::new(move |map| second(first(map)))
}
