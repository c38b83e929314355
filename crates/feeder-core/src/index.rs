//! Value index over the properties used to wire a feeder together.

use std::collections::HashMap;

use tracing::debug;

use crate::document::Document;
use crate::NodeId;

/// Properties answered from the index; everything else is a linear scan.
pub const INDEXED_PROPERTIES: [&str; 5] = ["name", "class", "parent", "from", "to"];

/// `property -> value -> objects`, each list in document order.
#[derive(Debug, Clone, Default)]
pub struct PropertyIndex {
    by_property: HashMap<&'static str, HashMap<String, Vec<NodeId>>>,
}

impl PropertyIndex {
    /// Walk every object, nested ones included, and record the indexed properties.
    pub fn build(doc: &Document) -> Self {
        let mut by_property: HashMap<&'static str, HashMap<String, Vec<NodeId>>> =
            INDEXED_PROPERTIES
                .iter()
                .map(|p| (*p, HashMap::new()))
                .collect();
        let ids = doc.walk();
        for &id in &ids {
            let Some(node) = doc.get(id) else { continue };
            for property in INDEXED_PROPERTIES {
                if let Some(value) = node.get(property) {
                    by_property
                        .entry(property)
                        .or_default()
                        .entry(value.to_string())
                        .or_default()
                        .push(id);
                }
            }
        }
        debug!(objects = ids.len(), "built property index");
        Self { by_property }
    }

    /// Objects whose `property` equals `value`.
    ///
    /// Returns `None` when `property` is not indexed.
    pub fn lookup(&self, property: &str, value: &str) -> Option<&[NodeId]> {
        let values = self.by_property.get(property)?;
        Some(values.get(value).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Distinct values recorded for a property.
    pub fn values(&self, property: &str) -> impl Iterator<Item = (&str, &[NodeId])> {
        self.by_property
            .get(property)
            .into_iter()
            .flat_map(|values| values.iter().map(|(v, ids)| (v.as_str(), ids.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectNode;

    #[test]
    fn index_covers_nested_objects() {
        let mut doc = Document::new();
        let line = doc
            .append_node(
                None,
                ObjectNode::from_properties([
                    ("class", "overhead_line"),
                    ("name", "l1"),
                    ("from", "n1"),
                    ("to", "n2"),
                ])
                .unwrap(),
            )
            .unwrap();
        let rec = doc
            .append_node(
                Some(line),
                ObjectNode::from_properties([("class", "recorder"), ("name", "r1")]).unwrap(),
            )
            .unwrap();

        let index = PropertyIndex::build(&doc);
        assert_eq!(index.lookup("class", "recorder"), Some(&[rec][..]));
        assert_eq!(index.lookup("to", "n2"), Some(&[line][..]));
        assert_eq!(index.lookup("from", "nowhere"), Some(&[][..]));
        assert_eq!(index.lookup("interval", "60"), None);
        assert_eq!(index.values("name").count(), 2);
    }
}
