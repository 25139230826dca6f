//! Access paths in attribute notation: `knows[0].name`, `["@context"].menu`.
//!
//! # Grammar
//!
//! - `name` / `.name` -- attribute access; `name` must be an identifier
//! - `[3]` -- positional access into an array or array wrapper
//! - `["key"]` or `['key']` -- subscript access for keys that are not
//!   identifiers; `\` escapes the quote character and itself
//!
//! The empty path denotes the value it is applied to.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

use crate::error::{Error, Result};
use crate::node::{is_identifier, Node};
use crate::types::Value;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Attribute access (`.name`).
    Attr(String),
    /// Subscript access (`["key"]`).
    Key(String),
    /// Positional access (`[i]`).
    Index(usize),
}

/// A parsed access path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn parse(src: &str) -> Result<Path> {
        PathParser::new(src).parse()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Follow the path from `root`. Attribute segments report
    /// `AttributeNotFound`, quoted keys `KeyNotFound`.
    pub fn resolve(&self, root: &Value) -> Result<Value> {
        let mut current = root.clone();
        for segment in &self.segments {
            current = match segment {
                Segment::Attr(name) => current.attr(name)?,
                Segment::Key(key) => current.get(key)?,
                Segment::Index(index) => current.at(*index)?,
            };
        }
        Ok(current)
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Attr(name) if i == 0 => write!(f, "{name}")?,
                Segment::Attr(name) => write!(f, ".{name}")?,
                Segment::Key(key) => {
                    write!(f, "[\"{}\"]", key.replace('\\', "\\\\").replace('"', "\\\""))?
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Value {
    pub fn lookup(&self, path: &Path) -> Result<Value> {
        path.resolve(self)
    }
}

impl Node {
    /// Parse `path` and follow it from this node.
    pub fn lookup(&self, path: &str) -> Result<Value> {
        Path::parse(path)?.resolve(&Value::Node(self.clone()))
    }
}

struct PathParser<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> PathParser<'a> {
    fn new(src: &'a str) -> Self {
        PathParser {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::InvalidPath {
            path: self.src.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Path> {
        let mut segments = Vec::new();
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '[' => {
                    self.chars.next();
                    segments.push(self.bracket()?);
                }
                '.' => {
                    if segments.is_empty() {
                        return Err(self.error("path cannot start with '.'"));
                    }
                    self.chars.next();
                    segments.push(Segment::Attr(self.name()?));
                }
                _ if segments.is_empty() => segments.push(Segment::Attr(self.name()?)),
                other => return Err(self.error(format!("unexpected '{other}'"))),
            }
        }
        Ok(Path { segments })
    }

    /// Attribute name up to the next `.` or `[`.
    fn name(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c == '.' || c == '[' {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        if name.is_empty() {
            return Err(self.error("empty attribute name"));
        }
        if !is_identifier(&name) {
            return Err(self.error(format!(
                "'{name}' is not an identifier; write [\"{name}\"] instead"
            )));
        }
        Ok(name)
    }

    /// Contents of `[...]`; the opening bracket is already consumed.
    fn bracket(&mut self) -> Result<Segment> {
        let segment = match self.chars.peek() {
            Some(&(_, quote @ ('"' | '\''))) => {
                self.chars.next();
                Segment::Key(self.quoted(quote)?)
            }
            _ => {
                let mut digits = String::new();
                while let Some(&(_, c)) = self.chars.peek() {
                    if !c.is_ascii_digit() {
                        break;
                    }
                    digits.push(c);
                    self.chars.next();
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| self.error("expected an index or a quoted key inside []"))?;
                Segment::Index(index)
            }
        };
        match self.chars.next() {
            Some((_, ']')) => Ok(segment),
            _ => Err(self.error("missing ']'")),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => out.push(c),
                    None => return Err(self.error("dangling escape")),
                },
                Some((_, c)) if c == quote => return Ok(out),
                Some((_, c)) => out.push(c),
                None => return Err(self.error("unterminated quoted key")),
            }
        }
    }
}
