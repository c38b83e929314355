//! Feeder model (.glm) parser
//!
//! Reads a model line by line. Lines opening an object declaration start a
//! recursive descent into the block; every other top-level line (clock
//! blocks, `module` and `#include` directives, comments, blanks) is kept as
//! opaque text.
//!
//! Inside a block each trimmed line must be one of:
//! - `}` or `};` closing the block
//! - an empty line or a `//` comment
//! - a nested object declaration
//! - a property `key value;` optionally followed by trailing text
//!
//! Anything else aborts the parse with the offending line. Values end at the
//! first `;` not preceded by `\`, even inside quotes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use feeder_core::{Document, FeederError, FeederResult, NodeId, ObjectNode, Property};

use crate::reader::{Line, LineReader};

/// `[id] object <class>[:<num>] {[rest]`
static OBJECT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:([A-Za-z_][\w.\-]*)\s+)?object\s+([A-Za-z_][\w.\-]*)(?::(\d+))?\s*\{(.*)$")
        .expect("object declaration pattern is valid")
});

/// Lines that clearly try to declare an object, matched or not.
static OBJECT_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[A-Za-z_][\w.\-]*\s+)?object(?:\s|\{|$)")
        .expect("object keyword pattern is valid")
});

/// Parse a model file.
pub fn parse_file(path: impl AsRef<Path>) -> FeederResult<Document> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let doc = parse_reader(BufReader::new(file))?;
    info!(
        path = %path.display(),
        objects = doc.object_count(),
        items = doc.items().len(),
        "parsed feeder model"
    );
    Ok(doc)
}

/// Parse model text held in memory.
pub fn parse_str(text: &str) -> FeederResult<Document> {
    parse_reader(text.as_bytes())
}

/// Parse a model from any buffered reader.
pub fn parse_reader<R: BufRead>(source: R) -> FeederResult<Document> {
    let mut reader = LineReader::new(source);
    let mut doc = Document::new();
    while let Some(line) = reader.next_line()? {
        if is_declaration(&line.text) {
            parse_object(&mut reader, &mut doc, None, line)?;
        } else {
            doc.push_text(line.text);
        }
    }
    debug!(lines = reader.line_number(), "finished reading model");
    Ok(doc)
}

/// Whether a line opens (or tries to open) an object block.
pub fn is_declaration(line: &str) -> bool {
    OBJECT_KEYWORD.is_match(line)
}

/// Parse one object starting at its declaration line and attach it under
/// `parent` (or at the top level). The reader is left just past the closing
/// brace.
pub fn parse_object<R: BufRead>(
    reader: &mut LineReader<R>,
    doc: &mut Document,
    parent: Option<NodeId>,
    header: Line,
) -> FeederResult<NodeId> {
    let (node, rest) = parse_header(&header)?;
    let label = node.label();
    let id = doc.append_node(parent, node)?;
    if !rest.trim().is_empty() {
        reader.push_inline(header.number, &rest);
    }

    loop {
        let Some(line) = reader.next_line()? else {
            return Err(FeederError::UnexpectedEof {
                object: label,
                line: header.number,
            });
        };
        let text = line.text.trim();
        match text {
            "}" | "};" => {
                doc.node_mut(id)?.set_semicolon(text == "};");
                return Ok(id);
            }
            "" => doc.node_mut(id)?.push_blank(),
            _ if text.starts_with("//") => doc.node_mut(id)?.push_comment(text),
            _ if is_declaration(text) => {
                parse_object(reader, doc, Some(id), line.clone())?;
            }
            _ => {
                let property = parse_property(text).ok_or_else(|| FeederError::MalformedLine {
                    line: line.number,
                    text: line.text.clone(),
                })?;
                doc.node_mut(id)?.push_property(property)?;
            }
        }
    }
}

/// Split a declaration line into its header object and whatever follows `{`.
fn parse_header(line: &Line) -> FeederResult<(ObjectNode, String)> {
    let bad = || FeederError::BadDeclaration {
        line: line.number,
        text: line.text.clone(),
    };
    let caps = OBJECT_START.captures(&line.text).ok_or_else(bad)?;
    let class = caps.get(2).map(|m| m.as_str()).ok_or_else(bad)?;
    let mut node = ObjectNode::new(class).map_err(|_| bad())?;
    node.set_id(caps.get(1).map(|m| m.as_str().to_string()))?;
    node.set_num(caps.get(3).map(|m| m.as_str().to_string()))?;
    let rest = caps.get(4).map(|m| m.as_str()).unwrap_or("").to_string();
    Ok((node, rest))
}

/// `key value;trailing` → property; `None` when the line has no `;` or no key.
pub fn parse_property(text: &str) -> Option<Property> {
    let semi = find_terminator(text)?;
    let statement = text[..semi].trim();
    let trailing = text[semi + 1..].trim_end();
    let (key, value) = match statement.split_once(char::is_whitespace) {
        Some((key, value)) => (key, value.trim()),
        None => (statement, ""),
    };
    if key.is_empty() || key.contains(['{', '}']) {
        return None;
    }
    Some(Property::with_trailing(
        key,
        value,
        Some(trailing.to_string()),
    ))
}

/// Byte offset of the first `;` not escaped with a backslash.
fn find_terminator(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (pos, c) in text.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            ';' if !escaped => return Some(pos),
            _ => escaped = false,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_pattern() {
        assert!(is_declaration("object node {"));
        assert!(is_declaration("  object regulator:4383 {"));
        assert!(is_declaration("obj object meter {"));
        assert!(is_declaration("object recorder:7 { name r1; }"));
        assert!(!is_declaration("clock {"));
        assert!(!is_declaration("#include \"appliance_schedules.glm\";"));
        assert!(!is_declaration("// object node {"));
        assert!(!is_declaration("objective 3;"));
    }

    #[test]
    fn header_fields() {
        let line = Line {
            number: 1,
            text: "obj object regulator:4383 {".into(),
        };
        let (node, rest) = parse_header(&line).unwrap();
        assert_eq!(node.class(), "regulator");
        assert_eq!(node.id(), Some("obj"));
        assert_eq!(node.num(), Some("4383"));
        assert!(rest.is_empty());
    }

    #[test]
    fn header_without_brace_is_fatal() {
        let err = parse_str("object node\n{\n}\n").unwrap_err();
        match err {
            FeederError::BadDeclaration { line, text } => {
                assert_eq!(line, 1);
                assert_eq!(text, "object node");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn property_with_trailing_text() {
        let p = parse_property("foo bar; # note").unwrap();
        assert_eq!(p.key, "foo");
        assert_eq!(p.value, "bar");
        assert_eq!(p.trailing(), Some(" # note"));

        let p = parse_property("power_12 \"1+2j\";").unwrap();
        assert_eq!(p.value, "\"1+2j\"");
        assert_eq!(p.trailing(), None);
    }

    #[test]
    fn quoted_semicolon_ends_value() {
        let p = parse_property("file \"a;b.csv\";").unwrap();
        assert_eq!(p.value, "\"a");
        assert_eq!(p.trailing(), Some("b.csv\";"));
    }

    #[test]
    fn escaped_semicolon_is_kept() {
        let p = parse_property(r"note a\;b;").unwrap();
        assert_eq!(p.value, r"a\;b");
    }

    #[test]
    fn property_needs_terminator() {
        assert!(parse_property("name n1").is_none());
        assert!(parse_property("; value").is_none());
    }
}
