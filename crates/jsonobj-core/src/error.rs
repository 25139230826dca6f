//! Error types for tree access, conversion and loading.

use thiserror::Error;

/// Errors produced by node access, JSON conversion and document loading.
///
/// Variants that wrap a lower-level error (`Io`, `Http`, `MalformedJson`) carry
/// the original error untouched so callers can inspect its kind.
#[derive(Error, Debug)]
pub enum Error {
    /// Write to a key that can never be a data key (leading `_`, or an ordinary
    /// key on an array wrapper).
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Subscript read of an absent key with no missing hook installed.
    #[error("key not found: '{0}'")]
    KeyNotFound(String),

    /// Attribute read of an absent key with no missing hook installed.
    #[error("no attribute '{0}'")]
    AttributeNotFound(String),

    /// Positional read past the end of an array or array wrapper.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The value at hand does not support the requested kind of access.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Malformed access path such as `a..b` or `a[x]`.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// `load_from` was handed a location it cannot read (unknown URI scheme,
    /// or an http URI with the `http` feature disabled).
    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    /// Filesystem or stream failure, including a missing file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Network failure while fetching a URI, including non-success statuses.
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The input text was not valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// Raw bytes could not be decoded with the sniffed encoding.
    #[error("cannot decode input as {0}")]
    Encoding(&'static str),

    /// A node was reached twice on the same descent path during conversion.
    #[error("tree contains a cycle")]
    CyclicTree,
}

impl Error {
    /// True for the "nothing there" family: missing keys, attributes,
    /// indices, and missing files.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::KeyNotFound(_) | Error::AttributeNotFound(_) => true,
            Error::IndexOutOfRange { .. } => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Convenience alias used throughout jsonobj-core.
pub type Result<T> = std::result::Result<T, Error>;
