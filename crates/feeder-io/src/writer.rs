//! Feeder model writer
//!
//! Converts an in-memory [`Document`] back to model text. Text items are
//! written verbatim; objects are re-indented one unit per nesting level.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::info;

use feeder_core::{Document, Entry, FeederResult, Item, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// One level of indentation inside object blocks
    pub indent: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

/// Render a document with default options.
pub fn serialize(doc: &Document) -> String {
    serialize_with(doc, &WriterOptions::default())
}

pub fn serialize_with(doc: &Document, options: &WriterOptions) -> String {
    let mut out = String::new();
    for item in doc.items() {
        match item {
            Item::Text(line) => {
                out.push_str(line);
                out.push('\n');
            }
            Item::Object(id) => write_object(doc, *id, 0, options, &mut out),
        }
    }
    out
}

/// Render a single object (and its nested children) at the given depth.
pub fn serialize_object(doc: &Document, id: NodeId, options: &WriterOptions) -> String {
    let mut out = String::new();
    write_object(doc, id, 0, options, &mut out);
    out
}

fn write_object(doc: &Document, id: NodeId, depth: usize, options: &WriterOptions, out: &mut String) {
    let Some(node) = doc.get(id) else { return };
    let pad = options.indent.repeat(depth);
    let inner = options.indent.repeat(depth + 1);

    out.push_str(&pad);
    if let Some(obj_id) = node.id() {
        out.push_str(obj_id);
        out.push(' ');
    }
    out.push_str("object ");
    out.push_str(node.class());
    if let Some(num) = node.num() {
        out.push(':');
        out.push_str(num);
    }
    out.push_str(" {\n");

    for entry in node.entries() {
        match entry {
            Entry::Blank => out.push('\n'),
            Entry::Comment(text) => {
                out.push_str(&inner);
                out.push_str(text);
                out.push('\n');
            }
            Entry::Child(child) => write_object(doc, *child, depth + 1, options, out),
            Entry::Property(p) => {
                out.push_str(&inner);
                out.push_str(&p.key);
                out.push(' ');
                out.push_str(&p.value);
                out.push(';');
                if let Some(trailing) = p.trailing() {
                    out.push_str(trailing);
                }
                out.push('\n');
            }
        }
    }

    out.push_str(&pad);
    out.push_str(if node.semicolon() { "};\n" } else { "}\n" });
}

/// Write a document to `path` with default options.
pub fn write_file(doc: &Document, path: impl AsRef<Path>) -> FeederResult<()> {
    write_file_with(doc, path, &WriterOptions::default())
}

pub fn write_file_with(
    doc: &Document,
    path: impl AsRef<Path>,
    options: &WriterOptions,
) -> FeederResult<()> {
    let path = path.as_ref();
    let text = serialize_with(doc, options);
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    info!(path = %path.display(), objects = doc.object_count(), "wrote feeder model");
    Ok(())
}
