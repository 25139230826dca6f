//! # jsonobj-core
//!
//! JSON documents as ordered trees whose keys are reachable both as
//! attributes and as subscripts.
//!
//! Every JSON object becomes a [`Node`]. A node behaves like an ordered map
//! (`get`, `set`, `delete`, `contains`, `len`, `entries`) and, for keys that
//! are identifiers, like a record with named fields (`attr`, `set_attr`,
//! `del_attr`). Both surfaces share one storage and one set of key rules.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonobj_core::{parse_text, DumpOptions};
//!
//! let tree = parse_text(r#"{"name":"Alice","knows":[{"name":"Bob"}]}"#).unwrap();
//! assert_eq!(tree.attr("name").unwrap(), "Alice");
//! assert_eq!(tree.lookup("knows[0].name").unwrap(), "Bob");
//!
//! tree.set_attr("age", 30).unwrap();
//! assert_eq!(tree.get("age").unwrap(), 30);
//!
//! let text = tree.to_json_text(&DumpOptions::compact()).unwrap();
//! assert_eq!(text, r#"{"name":"Alice","knows":[{"name":"Bob"}],"age":30}"#);
//! ```
//!
//! ## Modules
//!
//! - [`node`] — the dual-access [`Node`] and its reserved slots
//! - [`tree`] — JSON ⇄ tree conversion and serialization ([`DumpOptions`])
//! - [`convert`] — free functions over one tree or an array of trees
//! - [`load`] — paths, URIs, streams and byte-encoding detection
//! - [`path`] — `a.b[0]["@id"]` access paths
//! - [`filter`] — per-node serialization filters
//! - [`types`] — the [`Value`] enum
//! - [`error`] — error taxonomy

pub mod convert;
pub mod error;
pub mod filter;
pub mod load;
pub mod node;
pub mod path;
pub mod tree;
pub mod types;

pub use convert::{
    entries_of, get_with_default, load_from, parse_bytes, parse_text, set_default_entry,
    to_json_text, to_parsed_json, to_plain_value, Lifted,
};
pub use error::{Error, Result};
pub use filter::NodeFilter;
pub use load::{LoadOptions, Source};
pub use node::{Entries, MissingHook, Node};
pub use path::{Path, Segment};
pub use tree::DumpOptions;
pub use types::Value;
