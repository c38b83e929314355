//! Generic selector-based transforms.
//!
//! Selectors and assignments are written `property=value`:
//!
//! | Transform | Arguments | Effect |
//! |-----------|-----------|--------|
//! | `set` | `<selector> <key=value>...` | set properties on every match |
//! | `add` | `class=<c> <key=value>...` | append a top-level object |
//! | `nest` | `<selector> class=<c> <key=value>...` | nest a new object in the single match |
//! | `remove` | `<selector>` | remove every match and its children |
//! | `annotate` | `<selector> <text>...` | insert a comment before every match |

use anyhow::{anyhow, bail, Result};
use tracing::warn;

use feeder_core::{Document, NodeId};

use crate::pipeline::{Transform, TransformRegistry};

pub(crate) fn register_builtins(registry: &mut TransformRegistry) {
    registry.register(SetProperties);
    registry.register(AddObject);
    registry.register(NestObject);
    registry.register(RemoveObjects);
    registry.register(Annotate);
}

/// Split `key=value`.
pub fn parse_assignment(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(anyhow!("expected `property=value`, got `{arg}`")),
    }
}

fn select(doc: &Document, args: &[String], transform: &str) -> Result<Vec<NodeId>> {
    let selector = args
        .first()
        .ok_or_else(|| anyhow!("`{transform}` needs a `property=value` selector"))?;
    let (property, value) = parse_assignment(selector)?;
    let matches = doc.find_by(property, value);
    if matches.is_empty() {
        warn!("`{}` selector {} matched no objects", transform, selector);
    }
    Ok(matches)
}

fn assignments(args: &[String]) -> Result<Vec<(&str, &str)>> {
    args.iter().map(|arg| parse_assignment(arg)).collect()
}

pub struct SetProperties;

impl Transform for SetProperties {
    fn name(&self) -> &str {
        "set"
    }

    fn description(&self) -> &str {
        "set properties on every object matching a selector"
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()> {
        let values = assignments(args.get(1..).unwrap_or_default())?;
        if values.is_empty() {
            bail!("`set` needs at least one `property=value` assignment");
        }
        for id in select(doc, args, "set")? {
            for (key, value) in &values {
                doc.set_property(id, *key, *value)?;
            }
        }
        Ok(())
    }
}

pub struct AddObject;

impl Transform for AddObject {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "append a top-level object built from property=value pairs"
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()> {
        doc.add_object(assignments(args)?)?;
        Ok(())
    }
}

pub struct NestObject;

impl Transform for NestObject {
    fn name(&self) -> &str {
        "nest"
    }

    fn description(&self) -> &str {
        "nest a new object inside the single object matching a selector"
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()> {
        let selector = args
            .first()
            .ok_or_else(|| anyhow!("`nest` needs a `property=value` selector"))?;
        let (property, value) = parse_assignment(selector)?;
        let parent = doc.find_one(property, value)?;
        doc.add_nested(parent, assignments(args.get(1..).unwrap_or_default())?)?;
        Ok(())
    }
}

pub struct RemoveObjects;

impl Transform for RemoveObjects {
    fn name(&self) -> &str {
        "remove"
    }

    fn description(&self) -> &str {
        "remove every object matching a selector"
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()> {
        for id in select(doc, args, "remove")? {
            // an earlier match may have been the ancestor of this one
            if doc.get(id).is_some() {
                doc.remove_object(id)?;
            }
        }
        Ok(())
    }
}

pub struct Annotate;

impl Transform for Annotate {
    fn name(&self) -> &str {
        "annotate"
    }

    fn description(&self) -> &str {
        "insert a comment before every object matching a selector"
    }

    fn apply(&self, doc: &mut Document, args: &[String]) -> Result<()> {
        let text = args.get(1..).unwrap_or_default().join(" ");
        for id in select(doc, args, "annotate")? {
            doc.annotate(id, &text)?;
        }
        Ok(())
    }
}
