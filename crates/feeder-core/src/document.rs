//! The in-memory form of one model file.
//!
//! A [`Document`] is an ordered list of [`Item`]s: raw text lines kept
//! verbatim and top-level objects. All objects, nested ones included, live in
//! an arena owned by the document and are addressed by [`NodeId`]. Removing an
//! object frees its slot; ids are never reused.

use once_cell::unsync::OnceCell;
use serde::Serialize;
use tracing::debug;

use crate::error::{FeederError, FeederResult};
use crate::index::PropertyIndex;
use crate::object::ObjectNode;
use crate::NodeId;

/// A top-level element of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Item {
    /// An opaque line (without its line terminator)
    Text(String),
    Object(NodeId),
}

impl Item {
    /// Blank lines and `//` comments carry no model content.
    pub fn is_blank_or_comment(&self) -> bool {
        match self {
            Item::Text(line) => {
                let line = line.trim();
                line.is_empty() || line.starts_with("//")
            }
            Item::Object(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    items: Vec<Item>,
    nodes: Vec<Option<ObjectNode>>,
    index: OnceCell<PropertyIndex>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Live object count, nested objects included.
    pub fn object_count(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ObjectNode> {
        self.nodes.get(id.value()).and_then(Option::as_ref)
    }

    pub fn node(&self, id: NodeId) -> FeederResult<&ObjectNode> {
        self.get(id).ok_or(FeederError::UnknownNode(id))
    }

    /// Mutable access to an object. Invalidates the property index.
    pub fn node_mut(&mut self, id: NodeId) -> FeederResult<&mut ObjectNode> {
        self.invalidate();
        self.nodes
            .get_mut(id.value())
            .and_then(Option::as_mut)
            .ok_or(FeederError::UnknownNode(id))
    }

    /// Top-level objects in document order.
    pub fn top_level(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().filter_map(|item| match item {
            Item::Object(id) => Some(*id),
            Item::Text(_) => None,
        })
    }

    /// Every live object in document order (pre-order, parents before children).
    pub fn walk(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.top_level().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            let mut children: Vec<NodeId> = node.children().collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Append a raw text line at the end of the document.
    pub fn push_text(&mut self, line: impl Into<String>) {
        self.items.push(Item::Text(strip_line_ending(line.into())));
    }

    /// Insert a raw text line before the item at `index` (clamped to the end).
    pub fn insert_text(&mut self, index: usize, line: impl Into<String>) {
        let index = index.min(self.items.len());
        self.items
            .insert(index, Item::Text(strip_line_ending(line.into())));
    }

    /// Store an object and link it into the tree.
    ///
    /// With `parent == None` the object becomes the last top-level item,
    /// otherwise it becomes the last nested child of `parent`.
    pub fn append_node(
        &mut self,
        parent: Option<NodeId>,
        mut node: ObjectNode,
    ) -> FeederResult<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        self.invalidate();
        let id = NodeId::new(self.nodes.len());
        node.set_parent(parent);
        self.nodes.push(Some(node));
        match parent {
            Some(parent) => self.node_mut(parent)?.push_child(id),
            None => self.items.push(Item::Object(id)),
        }
        Ok(id)
    }

    /// Position of a top-level object among the items.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| *item == Item::Object(id))
    }

    /// Detach an object from its parent (or the top level) and free its subtree.
    pub(crate) fn detach(&mut self, id: NodeId) -> FeederResult<ObjectNode> {
        let parent = self.node(id)?.parent();
        self.invalidate();
        match parent {
            Some(parent) => {
                self.node_mut(parent)?.remove_child(id);
            }
            None => self.items.retain(|item| *item != Item::Object(id)),
        }
        let mut pending = vec![id];
        let mut root = None;
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.value()).and_then(Option::take) {
                pending.extend(node.children());
                if next == id {
                    root = Some(node);
                }
            }
        }
        debug!(object = %id, "freed object subtree");
        root.ok_or(FeederError::UnknownNode(id))
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        self.invalidate();
        &mut self.items
    }

    /// Property index, rebuilt on first use after any mutation.
    pub fn index(&self) -> &PropertyIndex {
        self.index.get_or_init(|| PropertyIndex::build(self))
    }

    fn invalidate(&mut self) {
        if self.index.get().is_some() {
            debug!("invalidating property index");
            self.index = OnceCell::new();
        }
    }
}

fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}
