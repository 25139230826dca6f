//! `jsonobj` CLI — navigate and reformat JSON documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Print the value at an attribute path (stdin → stdout)
//! echo '{"a":{"b":[1,2]}}' | jsonobj get 'a.b[1]'
//!
//! # Read from a file or URL
//! jsonobj get 'knows[0].name' -i people.json
//! jsonobj get gender -i http://hl7.org/fhir/Patient/f001
//!
//! # Reformat, dropping noise fields and sorting keys
//! jsonobj fmt -i data.json --strip etag,kind --sort-keys --indent 2
//!
//! # List the keys of a nested object
//! jsonobj keys '["@context"]' -i doc.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jsonobj_core::{filter, load::LoadOptions, DumpOptions, Node, Value};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsonobj",
    version,
    about = "Navigate and reformat JSON documents with attribute paths"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at PATH as JSON
    Get {
        /// Access path, e.g. `a.b[0]` or `["@id"]`
        path: String,
        /// Input file or URL (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print the value compactly on one line
        #[arg(long)]
        compact: bool,
    },
    /// Re-serialize a document
    Fmt {
        /// Input file or URL (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Spaces per indentation level
        #[arg(long, env = "JSONOBJ_INDENT", default_value_t = 3)]
        indent: usize,
        /// Write everything on one line (overrides --indent)
        #[arg(long)]
        compact: bool,
        /// Comma-separated keys to drop at every depth
        #[arg(long)]
        strip: Option<String>,
        /// Sort keys of every object
        #[arg(long)]
        sort_keys: bool,
    },
    /// List the keys of the object at PATH (the root if omitted)
    Keys {
        /// Access path of the object to list
        path: Option<String>,
        /// Input file or URL (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jsonobj=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            path,
            input,
            compact,
        } => {
            let tree = read_tree(input.as_deref())?;
            let value = tree
                .lookup(&path)
                .with_context(|| format!("Failed to resolve path: {}", path))?;
            let options = if compact {
                DumpOptions::compact()
            } else {
                DumpOptions::default()
            };
            let text = jsonobj_core::to_json_text(&value, &options)
                .context("Failed to serialize value")?;
            println!("{}", text);
        }
        Commands::Fmt {
            input,
            output,
            indent,
            compact,
            strip,
            sort_keys,
        } => {
            let tree = read_tree(input.as_deref())?;
            let mut options = if compact {
                DumpOptions::compact()
            } else {
                DumpOptions::default().indent(indent)
            };
            if let Some(node_filter) = build_filter(strip.as_deref(), sort_keys) {
                options = options.filter(node_filter);
            }
            let text = tree
                .to_json_text(&options)
                .context("Failed to serialize document")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Keys { path, input } => {
            let tree = read_tree(input.as_deref())?;
            let target = match path.as_deref() {
                Some(path) => tree
                    .lookup(path)
                    .with_context(|| format!("Failed to resolve path: {}", path))?,
                None => Value::Node(tree),
            };
            let node = target
                .node()
                .context("Value at path is not an object")?;
            for key in node.keys() {
                println!("{}", key);
            }
        }
    }

    Ok(())
}

/// Combine `--strip` and `--sort-keys` into one node filter.
///
/// - `--strip etag,kind` drops `etag` and `kind` wherever they occur
/// - `--sort-keys` sorts after stripping
/// - Neither flag (or an empty `--strip`) means no filter
fn build_filter(strip: Option<&str>, sort_keys: bool) -> Option<jsonobj_core::NodeFilter> {
    let keys: Vec<String> = strip
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    let stripping = (!keys.is_empty()).then(|| filter::strip_keys(keys));
    let sorting = sort_keys.then(filter::sort_keys);
    match (stripping, sorting) {
        (Some(a), Some(b)) => Some(filter::compose(a, b)),
        (a, b) => a.or(b),
    }
}

fn read_tree(input: Option<&str>) -> Result<Node> {
    let options = LoadOptions::default();
    match input {
        Some(location) => {
            debug!(input = location, "loading document");
            jsonobj_core::load::load_with(location, &options)
                .with_context(|| format!("Failed to load document: {}", location))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            jsonobj_core::load::parse_bytes_with(&buf, &options)
                .context("Failed to parse document from stdin")
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
