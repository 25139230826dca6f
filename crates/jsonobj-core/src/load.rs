//! Reading documents from paths, URIs, streams and raw bytes.
//!
//! A location string containing `://` is a URI; anything else is a
//! filesystem path. Failures from the filesystem and the network come back
//! as the underlying `std::io::Error` / `reqwest::Error`, so callers can
//! match on their kinds.
//!
//! Raw bytes are decoded the way a conformant JSON reader does it: a byte
//! order mark wins, otherwise the position of zero bytes among the first
//! four bytes tells UTF-16 and UTF-32 apart from UTF-8.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{MissingHook, Node};
use crate::types::Value;

/// `Accept` header sent with network requests.
pub const DEFAULT_ACCEPT: &str = "application/json, text/json;q=0.9";

/// Where a document comes from.
pub enum Source {
    /// A filesystem path, or a URI when it contains `://`.
    Location(String),
    /// A filesystem path that is never treated as a URI.
    Path(PathBuf),
    /// Any byte stream.
    Reader(Box<dyn Read>),
}

impl Source {
    pub fn reader(reader: impl Read + 'static) -> Self {
        Source::Reader(Box::new(reader))
    }

    fn describe(&self) -> String {
        match self {
            Source::Location(loc) => loc.clone(),
            Source::Path(path) => path.display().to_string(),
            Source::Reader(_) => "<reader>".to_string(),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Source({})", self.describe())
    }
}

impl From<&str> for Source {
    fn from(loc: &str) -> Self {
        Source::Location(loc.to_string())
    }
}

impl From<String> for Source {
    fn from(loc: String) -> Self {
        Source::Location(loc)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&std::path::Path> for Source {
    fn from(path: &std::path::Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

/// Settings for parsing and loading.
#[derive(Clone)]
pub struct LoadOptions {
    /// Hook installed on every node of the resulting tree.
    pub missing_hook: Option<MissingHook>,
    /// `Accept` header for URI sources.
    pub accept: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            missing_hook: None,
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl LoadOptions {
    pub fn missing_hook(mut self, hook: impl Fn(&str) -> Result<Value> + 'static) -> Self {
        self.missing_hook = Some(Rc::new(hook));
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("missing_hook", &self.missing_hook.as_ref().map(|_| ".."))
            .field("accept", &self.accept)
            .finish()
    }
}

/// Parse JSON text into a tree.
pub fn parse_text_with(text: &str, options: &LoadOptions) -> Result<Node> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Node::build(&json, options.missing_hook.as_ref())
}

/// Decode raw bytes (see [`detect_encoding`]) and parse them.
pub fn parse_bytes_with(bytes: &[u8], options: &LoadOptions) -> Result<Node> {
    let text = decode_bytes(bytes)?;
    parse_text_with(&text, options)
}

/// Read, decode and parse a document.
pub fn load_with(source: impl Into<Source>, options: &LoadOptions) -> Result<Node> {
    let source = source.into();
    let bytes = read_source(source, options)?;
    parse_bytes_with(&bytes, options)
}

/// Raw bytes of a source, without decoding.
pub fn read_source(source: Source, options: &LoadOptions) -> Result<Vec<u8>> {
    let described = source.describe();
    let bytes = match source {
        Source::Location(loc) if loc.contains("://") => fetch(&loc, &options.accept)?,
        Source::Location(loc) => fs::read(&loc)?,
        Source::Path(path) => fs::read(&path)?,
        Source::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            buf
        }
    };
    debug!(source = described.as_str(), bytes = bytes.len(), "read document");
    Ok(bytes)
}

fn fetch(uri: &str, accept: &str) -> Result<Vec<u8>> {
    let scheme = uri.split("://").next().unwrap_or_default();
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(Error::UnsupportedSource(format!("unknown scheme in '{uri}'")));
    }
    fetch_http(uri, accept)
}

#[cfg(feature = "http")]
fn fetch_http(uri: &str, accept: &str) -> Result<Vec<u8>> {
    debug!(uri, "fetching document");
    let response = reqwest::blocking::Client::new()
        .get(uri)
        .header(reqwest::header::ACCEPT, accept)
        .send()?
        .error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

#[cfg(not(feature = "http"))]
fn fetch_http(uri: &str, _accept: &str) -> Result<Vec<u8>> {
    Err(Error::UnsupportedSource(format!(
        "'{uri}' (built without the http feature)"
    )))
}

/// Text encodings a JSON document may arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// UTF-8 with a leading byte order mark.
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf32Le => "UTF-32LE",
            TextEncoding::Utf32Be => "UTF-32BE",
        }
    }
}

const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16_BE: &[u8] = &[0xFE, 0xFF];
const BOM_UTF32_LE: &[u8] = &[0xFF, 0xFE, 0x00, 0x00];
const BOM_UTF32_BE: &[u8] = &[0x00, 0x00, 0xFE, 0xFF];

/// Sniff the encoding of a JSON document and the length of its byte order
/// mark.
pub fn detect_encoding(bytes: &[u8]) -> (TextEncoding, usize) {
    // The UTF-32LE mark begins with the UTF-16LE one, so test it first.
    if bytes.starts_with(BOM_UTF32_LE) {
        return (TextEncoding::Utf32Le, 4);
    }
    if bytes.starts_with(BOM_UTF32_BE) {
        return (TextEncoding::Utf32Be, 4);
    }
    if bytes.starts_with(BOM_UTF16_LE) {
        return (TextEncoding::Utf16Le, 2);
    }
    if bytes.starts_with(BOM_UTF16_BE) {
        return (TextEncoding::Utf16Be, 2);
    }
    if bytes.starts_with(BOM_UTF8) {
        return (TextEncoding::Utf8Bom, 3);
    }
    let encoding = match bytes {
        [0, 0, _, _, ..] => TextEncoding::Utf32Be,
        [0, _, _, _, ..] => TextEncoding::Utf16Be,
        [_, 0, 0, 0, ..] => TextEncoding::Utf32Le,
        [_, 0, _, _, ..] => TextEncoding::Utf16Le,
        [0, _] => TextEncoding::Utf16Be,
        [_, 0] => TextEncoding::Utf16Le,
        _ => TextEncoding::Utf8,
    };
    (encoding, 0)
}

/// Decode a JSON document's bytes to text using [`detect_encoding`].
pub fn decode_bytes(bytes: &[u8]) -> Result<String> {
    let (encoding, bom) = detect_encoding(bytes);
    debug!(encoding = encoding.name(), "decoding document bytes");
    let body = &bytes[bom..];
    let err = || Error::Encoding(encoding.name());
    match encoding {
        TextEncoding::Utf8 | TextEncoding::Utf8Bom => {
            String::from_utf8(body.to_vec()).map_err(|_| err())
        }
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            if body.len() % 2 != 0 {
                return Err(err());
            }
            let units = body.chunks_exact(2).map(|pair| {
                let pair = [pair[0], pair[1]];
                if encoding == TextEncoding::Utf16Le {
                    u16::from_le_bytes(pair)
                } else {
                    u16::from_be_bytes(pair)
                }
            });
            char::decode_utf16(units)
                .collect::<std::result::Result<String, _>>()
                .map_err(|_| err())
        }
        TextEncoding::Utf32Le | TextEncoding::Utf32Be => {
            if body.len() % 4 != 0 {
                return Err(err());
            }
            body.chunks_exact(4)
                .map(|quad| {
                    let quad = [quad[0], quad[1], quad[2], quad[3]];
                    let code = if encoding == TextEncoding::Utf32Le {
                        u32::from_le_bytes(quad)
                    } else {
                        u32::from_be_bytes(quad)
                    };
                    char::from_u32(code).ok_or_else(err)
                })
                .collect()
        }
    }
}
