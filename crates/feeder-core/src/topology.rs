//! Petgraph view of the implied feeder topology.

use std::collections::HashMap;

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use crate::document::Document;
use crate::error::FeederResult;
use crate::NodeId;

/// Summary statistics produced by `feeder graph`.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyStats {
    pub object_count: usize,
    pub edge_count: usize,
    /// Weakly connected components; a radial feeder without strays has one.
    pub components: usize,
    pub roots: usize,
    pub max_fan_out: usize,
}

/// Directed graph of the implied feeder topology: an edge `a -> b` means
/// `b` is downstream of `a`.
#[derive(Debug, Clone)]
pub struct Topology {
    graph: DiGraph<NodeId, ()>,
    indices: HashMap<NodeId, NodeIndex>,
}

impl Topology {
    pub fn build(doc: &Document) -> FeederResult<Self> {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        let ids = doc.walk();
        for &id in &ids {
            indices.insert(id, graph.add_node(id));
        }
        for &id in &ids {
            for down in doc.downstream(id)? {
                if let (Some(&a), Some(&b)) = (indices.get(&id), indices.get(&down)) {
                    graph.update_edge(a, b, ());
                }
            }
        }
        Ok(Self { graph, indices })
    }

    /// Objects nothing feeds, in document order.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self
            .graph
            .node_indices()
            .filter(|idx| {
                self.graph
                    .neighbors_directed(*idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx])
            .collect();
        roots.sort_by_key(|id| id.value());
        roots
    }

    pub fn fan_out(&self, id: NodeId) -> usize {
        self.indices
            .get(&id)
            .map(|idx| self.graph.neighbors_directed(*idx, Direction::Outgoing).count())
            .unwrap_or(0)
    }

    pub fn stats(&self) -> TopologyStats {
        let max_fan_out = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors_directed(idx, Direction::Outgoing).count())
            .max()
            .unwrap_or(0);
        TopologyStats {
            object_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            components: connected_components(&self.graph),
            roots: self.roots().len(),
            max_fan_out,
        }
    }

    /// Graphviz rendering labelled with object labels.
    pub fn to_dot(&self, doc: &Document) -> String {
        let mut buffer = String::new();
        buffer.push_str("digraph feeder {\n");
        for idx in self.graph.node_indices() {
            let label = doc.describe(self.graph[idx]).replace('"', "\\\"");
            buffer.push_str(&format!("  n{} [label=\"{}\"];\n", idx.index(), label));
        }
        for edge in self.graph.edge_references() {
            let source = edge.source().index();
            let target = edge.target().index();
            buffer.push_str(&format!("  n{source} -> n{target};\n"));
        }
        buffer.push('}');
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radial() -> (Document, NodeId) {
        let mut doc = Document::new();
        let sub = doc
            .add_object([("class", "substation"), ("name", "sub")])
            .unwrap();
        doc.add_object([("class", "node"), ("name", "n1")]).unwrap();
        doc.add_object([("class", "node"), ("name", "n2")]).unwrap();
        doc.add_object([
            ("class", "overhead_line"),
            ("name", "l1"),
            ("from", "sub"),
            ("to", "n1"),
        ])
        .unwrap();
        doc.add_object([
            ("class", "overhead_line"),
            ("name", "l2"),
            ("from", "sub"),
            ("to", "n2"),
        ])
        .unwrap();
        (doc, sub)
    }

    #[test]
    fn radial_feeder_has_single_root() {
        let (doc, sub) = radial();
        let topo = Topology::build(&doc).unwrap();
        let stats = topo.stats();
        assert_eq!(stats.object_count, 5);
        assert_eq!(stats.edge_count, 4);
        assert_eq!(stats.components, 1);
        assert_eq!(topo.roots(), [sub]);
        assert_eq!(topo.fan_out(sub), 2);
        assert_eq!(stats.max_fan_out, 2);
    }

    #[test]
    fn stray_object_forms_its_own_component() {
        let (mut doc, _) = radial();
        doc.add_object([("class", "climate"), ("name", "weather")])
            .unwrap();
        let stats = Topology::build(&doc).unwrap().stats();
        assert_eq!(stats.components, 2);
        assert_eq!(stats.roots, 2);
    }

    #[test]
    fn dot_output_lists_edges() {
        let (doc, _) = radial();
        let dot = Topology::build(&doc).unwrap().to_dot(&doc);
        assert!(dot.starts_with("digraph feeder {"));
        assert!(dot.contains("label=\"substation \\\"sub\\\"\""));
        assert!(dot.contains("n0 -> n3;"));
    }
}
