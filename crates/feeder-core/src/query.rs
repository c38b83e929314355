//! Property lookups and topology traversal.
//!
//! The network topology is never stored explicitly. It is implied by lexical
//! nesting and by the `parent`, `from`, `to` and `name` properties, and is
//! resolved on demand:
//!
//! * **upstream** of a nested object is its nesting parent, otherwise the
//!   object named by its `parent` (or else `from`) property, otherwise every
//!   object whose `to` names it.
//! * **downstream** of an object is its nested children, the objects whose
//!   `parent` or `from` names it, and the object named by its `to`.
//!
//! Walks keep a visited set, so a cyclic topology ends in
//! [`FeederError::CycleDetected`] (upstream) or is cut short (downstream)
//! instead of looping.

use std::collections::HashSet;

use crate::document::Document;
use crate::error::{FeederError, FeederResult};
use crate::object::ObjectNode;
use crate::NodeId;

impl Document {
    /// Every object, nested ones included, whose `property` equals `value`.
    pub fn find_by(&self, property: &str, value: &str) -> Vec<NodeId> {
        if let Some(ids) = self.index().lookup(property, value) {
            return ids.to_vec();
        }
        self.walk()
            .into_iter()
            .filter(|id| {
                self.get(*id)
                    .and_then(|node| node.get(property))
                    .is_some_and(|v| v == value)
            })
            .collect()
    }

    /// Like [`find_by`](Self::find_by) but fails unless exactly `expected` objects match.
    pub fn find_by_arity(
        &self,
        property: &str,
        value: &str,
        expected: usize,
    ) -> FeederResult<Vec<NodeId>> {
        let found = self.find_by(property, value);
        if found.len() != expected {
            return Err(FeederError::Arity {
                property: property.to_string(),
                value: value.to_string(),
                expected,
                found: found.len(),
            });
        }
        Ok(found)
    }

    /// The single object whose `property` equals `value`.
    pub fn find_one(&self, property: &str, value: &str) -> FeederResult<NodeId> {
        let found = self.find_by_arity(property, value, 1)?;
        Ok(found[0])
    }

    pub fn find_by_name(&self, name: &str) -> Vec<NodeId> {
        self.find_by("name", name)
    }

    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.find_by("class", class)
    }

    pub fn find_by_parent(&self, parent: &str) -> Vec<NodeId> {
        self.find_by("parent", parent)
    }

    pub fn find_by_from(&self, from: &str) -> Vec<NodeId> {
        self.find_by("from", from)
    }

    pub fn find_by_to(&self, to: &str) -> Vec<NodeId> {
        self.find_by("to", to)
    }

    /// Resolve the electrical parent(s) of an object.
    pub fn upstream(&self, id: NodeId, allow_multiple: bool) -> FeederResult<Vec<NodeId>> {
        let node = self.node(id)?;
        if let Some(parent) = node.parent() {
            return Ok(vec![parent]);
        }
        let found = if let Some(parent) = node.get("parent") {
            self.find_by("name", parent)
        } else if let Some(from) = node.get("from") {
            self.find_by("name", from)
        } else if let Some(name) = node.name() {
            self.find_by("to", name)
        } else {
            Vec::new()
        };
        match found.len() {
            0 => Err(FeederError::NoUpstream { node: node.label() }),
            1 => Ok(found),
            count if !allow_multiple => Err(FeederError::AmbiguousUpstream {
                node: node.label(),
                count,
            }),
            _ => Ok(found),
        }
    }

    /// Objects fed by this one. May be empty.
    pub fn downstream(&self, id: NodeId) -> FeederResult<Vec<NodeId>> {
        let node = self.node(id)?;
        let mut out: Vec<NodeId> = node.children().collect();
        if let Some(name) = node.name() {
            out.extend(self.find_by("parent", name));
            out.extend(self.find_by("from", name));
        }
        if let Some(to) = node.get("to") {
            out.extend(self.find_by("name", to));
        }
        let mut seen = HashSet::new();
        out.retain(|other| *other != id && seen.insert(*other));
        Ok(out)
    }

    /// Follow the upstream chain until an object of `class` is reached.
    pub fn first_upstream(&self, id: NodeId, class: &str) -> FeederResult<NodeId> {
        let mut visited = HashSet::from([id]);
        let mut current = id;
        loop {
            let up = self.upstream(current, false)?[0];
            if !visited.insert(up) {
                return Err(FeederError::CycleDetected {
                    node: self.describe(up),
                });
            }
            if self.node(up)?.class() == class {
                return Ok(up);
            }
            current = up;
        }
    }

    /// Level-by-level search downstream for objects of `class`.
    ///
    /// The search stops at the first level holding a match and returns every
    /// match on that level in discovery order; siblings of a match are not
    /// explored past it.
    pub fn first_downstream(&self, id: NodeId, class: &str) -> FeederResult<Vec<NodeId>> {
        let mut visited = HashSet::from([id]);
        let mut frontier = vec![id];
        while !frontier.is_empty() {
            let mut level = Vec::new();
            for current in frontier {
                for next in self.downstream(current)? {
                    if visited.insert(next) {
                        level.push(next);
                    }
                }
            }
            let mut found = Vec::new();
            for &next in &level {
                if self.node(next)?.class() == class {
                    found.push(next);
                }
            }
            if !found.is_empty() {
                return Ok(found);
            }
            frontier = level;
        }
        Ok(Vec::new())
    }

    /// View of an object that can reach back into this document.
    pub fn node_ref(&self, id: NodeId) -> FeederResult<NodeRef<'_>> {
        let node = self.node(id)?;
        Ok(NodeRef {
            doc: self,
            id,
            node,
        })
    }

    /// Label for messages; falls back to the raw id for freed objects.
    pub fn describe(&self, id: NodeId) -> String {
        self.get(id)
            .map(ObjectNode::label)
            .unwrap_or_else(|| id.to_string())
    }
}

/// An object together with the document that owns it.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
    node: &'a ObjectNode,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn object(&self) -> &'a ObjectNode {
        self.node
    }

    pub fn class(&self) -> &'a str {
        self.node.class()
    }

    pub fn name(&self) -> Option<&'a str> {
        self.node.name()
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.node.get(key)
    }

    pub fn nesting_parent(&self) -> Option<NodeRef<'a>> {
        self.node
            .parent()
            .and_then(|parent| self.doc.node_ref(parent).ok())
    }

    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.node
            .children()
            .filter_map(|child| self.doc.node_ref(child).ok())
            .collect()
    }

    pub fn upstream(&self, allow_multiple: bool) -> FeederResult<Vec<NodeRef<'a>>> {
        self.resolve(self.doc.upstream(self.id, allow_multiple)?)
    }

    pub fn downstream(&self) -> FeederResult<Vec<NodeRef<'a>>> {
        self.resolve(self.doc.downstream(self.id)?)
    }

    pub fn first_upstream(&self, class: &str) -> FeederResult<NodeRef<'a>> {
        self.doc.node_ref(self.doc.first_upstream(self.id, class)?)
    }

    pub fn first_downstream(&self, class: &str) -> FeederResult<Vec<NodeRef<'a>>> {
        self.resolve(self.doc.first_downstream(self.id, class)?)
    }

    fn resolve(&self, ids: Vec<NodeId>) -> FeederResult<Vec<NodeRef<'a>>> {
        ids.into_iter().map(|id| self.doc.node_ref(id)).collect()
    }
}
