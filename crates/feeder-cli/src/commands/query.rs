//! `find`, `upstream` and `downstream` lookups.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use feeder_cli::OutputFormat;
use feeder_core::{Document, NodeId};
use serde::Serialize;
use tabwriter::TabWriter;

use super::load_model;

/// One object as reported by the query commands.
#[derive(Debug, Serialize)]
struct ObjectRow {
    id: NodeId,
    class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num: Option<String>,
    /// Label of the enclosing object for nested declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    nested_in: Option<String>,
}

fn rows(doc: &Document, ids: &[NodeId]) -> Result<Vec<ObjectRow>> {
    ids.iter()
        .map(|&id| -> Result<ObjectRow> {
            let node = doc.node(id)?;
            Ok(ObjectRow {
                id,
                class: node.class().to_string(),
                name: node.name().map(str::to_string),
                num: node.num().map(str::to_string),
                nested_in: node.parent().map(|parent| doc.describe(parent)),
            })
        })
        .collect()
}

fn print_rows(rows: &[ObjectRow], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            let mut writer = TabWriter::new(io::stdout());
            writeln!(writer, "ID\tCLASS\tNAME\tNUM\tNESTED IN")?;
            for row in rows {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}",
                    row.id,
                    row.class,
                    row.name.as_deref().unwrap_or("-"),
                    row.num.as_deref().unwrap_or("-"),
                    row.nested_in.as_deref().unwrap_or("-"),
                )?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(io::stdout(), rows)
                .map_err(|err| anyhow::anyhow!("serializing objects to JSON: {err}"))?;
            println!();
        }
    }
    Ok(())
}

fn named(doc: &Document, name: &str) -> Result<NodeId> {
    doc.find_one("name", name)
        .with_context(|| format!("looking up object `{name}`"))
}

pub fn handle_find(
    input: &Path,
    property: &str,
    value: &str,
    count: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let doc = load_model(input)?;
    let found = match count {
        Some(count) => doc.find_by_arity(property, value, count)?,
        None => doc.find_by(property, value),
    };
    print_rows(&rows(&doc, &found)?, format)
}

pub fn handle_upstream(
    input: &Path,
    name: &str,
    all: bool,
    class: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let doc = load_model(input)?;
    let start = named(&doc, name)?;
    let found = match class {
        Some(class) => vec![doc.first_upstream(start, class)?],
        None => doc.upstream(start, all)?,
    };
    print_rows(&rows(&doc, &found)?, format)
}

pub fn handle_downstream(
    input: &Path,
    name: &str,
    class: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let doc = load_model(input)?;
    let start = named(&doc, name)?;
    let found = match class {
        Some(class) => doc.first_downstream(start, class)?,
        None => doc.downstream(start)?,
    };
    print_rows(&rows(&doc, &found)?, format)
}
