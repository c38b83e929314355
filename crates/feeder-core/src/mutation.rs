//! Editing operations used by transforms.

use tracing::debug;

use crate::document::{Document, Item};
use crate::error::FeederResult;
use crate::object::{comment_line, Entry, ObjectNode};
use crate::NodeId;

impl Document {
    /// Build an object from `properties` and nest it as the last child of `parent`.
    pub fn add_nested<I, K, V>(&mut self, parent: NodeId, properties: I) -> FeederResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let node = ObjectNode::from_properties(properties)?;
        let id = self.append_node(Some(parent), node)?;
        debug!(object = %self.describe(id), parent = %self.describe(parent), "added nested object");
        Ok(id)
    }

    /// Build an object from `properties` and append it at the top level.
    pub fn add_object<I, K, V>(&mut self, properties: I) -> FeederResult<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let node = ObjectNode::from_properties(properties)?;
        let id = self.append_node(None, node)?;
        debug!(object = %self.describe(id), "added object");
        Ok(id)
    }

    pub fn set_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> FeederResult<()> {
        self.node_mut(id)?.set(key, value)
    }

    pub fn remove_property(&mut self, id: NodeId, key: &str) -> FeederResult<Option<String>> {
        Ok(self.node_mut(id)?.remove(key))
    }

    /// Remove an object and everything nested inside it.
    pub fn remove_object(&mut self, id: NodeId) -> FeederResult<ObjectNode> {
        let label = self.describe(id);
        let node = self.detach(id)?;
        debug!(object = %label, "removed object");
        Ok(node)
    }

    /// Insert a `//` comment line directly before an object.
    pub fn annotate(&mut self, id: NodeId, text: &str) -> FeederResult<()> {
        let line = comment_line(text);
        let parent = self.node(id)?.parent();
        match parent {
            Some(parent) => {
                let parent_node = self.node_mut(parent)?;
                let pos = parent_node.child_position(id).unwrap_or(0);
                parent_node.insert_entry(pos, Entry::Comment(line));
            }
            None => {
                let pos = self.position(id).unwrap_or(0);
                self.items_mut().insert(pos, Item::Text(line));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeederError;

    fn doc_with_node() -> (Document, NodeId) {
        let mut doc = Document::new();
        doc.push_text("// header");
        let node = doc
            .add_object([("class", "node"), ("name", "n1"), ("phases", "ABCN")])
            .unwrap();
        (doc, node)
    }

    #[test]
    fn add_nested_appends_child_last() {
        let (mut doc, node) = doc_with_node();
        let first = doc
            .add_nested(node, [("class", "meter"), ("name", "m1")])
            .unwrap();
        let second = doc
            .add_nested(node, [("class", "recorder"), ("name", "r1")])
            .unwrap();
        let n = doc.node(node).unwrap();
        assert_eq!(n.children().collect::<Vec<_>>(), [first, second]);
        assert_eq!(n.entries().last(), Some(&Entry::Child(second)));
        assert_eq!(doc.find_by_name("r1"), [second]);
    }

    #[test]
    fn add_nested_requires_class() {
        let (mut doc, node) = doc_with_node();
        let err = doc.add_nested(node, [("name", "m1")]).unwrap_err();
        assert!(matches!(err, FeederError::MissingClass));
        assert_eq!(doc.node(node).unwrap().children().count(), 0);
    }

    #[test]
    fn remove_object_updates_queries() {
        let (mut doc, node) = doc_with_node();
        let meter = doc.add_nested(node, [("class", "meter"), ("name", "m1")]).unwrap();
        assert_eq!(doc.find_by_class("meter"), [meter]);
        doc.remove_object(meter).unwrap();
        assert!(doc.find_by_class("meter").is_empty());
        assert!(matches!(
            doc.remove_object(meter),
            Err(FeederError::UnknownNode(_))
        ));
    }

    #[test]
    fn annotate_top_level_and_nested() {
        let (mut doc, node) = doc_with_node();
        let meter = doc.add_nested(node, [("class", "meter")]).unwrap();
        doc.annotate(node, "feeder head").unwrap();
        doc.annotate(meter, "// added meter").unwrap();

        assert_eq!(doc.items()[1], Item::Text("// feeder head".into()));
        assert_eq!(doc.items()[2], Item::Object(node));
        let entries = doc.node(node).unwrap().entries();
        assert_eq!(entries[2], Entry::Comment("// added meter".into()));
        assert_eq!(entries[3], Entry::Child(meter));
    }

    #[test]
    fn property_edits_go_through_node() {
        let (mut doc, node) = doc_with_node();
        doc.set_property(node, "nominal_voltage", "2401.7771").unwrap();
        assert_eq!(
            doc.remove_property(node, "phases").unwrap().as_deref(),
            Some("ABCN")
        );
        let keys: Vec<_> = doc
            .node(node)
            .unwrap()
            .properties()
            .map(|p| p.key.clone())
            .collect();
        assert_eq!(keys, ["name", "nominal_voltage"]);
    }
}
