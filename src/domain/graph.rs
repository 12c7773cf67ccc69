use crate::domain::diagnostics::Diagnostic;
use crate::domain::edge::ImportSyntax;
use crate::domain::node::{DependencyNode, FileNode, SourceFileId};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

/// File-level dependency graph.
///
/// Nodes live in a `petgraph` arena in sorted id order, so `NodeIndex` order
/// and id order agree. The value is read-only once assembled: the only way to
/// get one is [`GraphBuilder::build`](crate::domain::builder::GraphBuilder::build).
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<FileNode, ImportSyntax>,
    id_to_node: HashMap<SourceFileId, NodeIndex>,
    external_packages: BTreeSet<String>,
}

impl DependencyGraph {
    /// Assemble the graph in one step from sorted nodes and deduplicated edges
    /// given as `(from, to)` positions into `nodes`.
    pub(crate) fn assemble(
        nodes: Vec<FileNode>,
        edges: Vec<(usize, usize, ImportSyntax)>,
        external_packages: BTreeSet<String>,
    ) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut id_to_node = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let id = node.id.clone();
            let idx = graph.add_node(node);
            id_to_node.insert(id, idx);
        }
        for (from, to, syntax) in edges {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), syntax);
        }
        Self {
            graph,
            id_to_node,
            external_packages,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of internal edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_node.contains_key(id)
    }

    pub fn get_node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_node.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &FileNode {
        &self.graph[idx]
    }

    /// Node indices in id order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// All node ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &SourceFileId> + '_ {
        self.graph.node_weights().map(|n| &n.id)
    }

    /// Direct dependencies of `idx`, sorted by id.
    pub fn imports(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Outgoing)
    }

    /// Direct dependents of `idx`, sorted by id.
    pub fn imported_by(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.sorted_neighbors(idx, Direction::Incoming)
    }

    pub fn has_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// Outgoing edges of `idx` with the syntax that created them, sorted by target.
    pub fn outgoing(&self, idx: NodeIndex) -> Vec<(NodeIndex, ImportSyntax)> {
        let mut out: Vec<(NodeIndex, ImportSyntax)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), *e.weight()))
            .collect();
        out.sort_by_key(|(target, _)| *target);
        out
    }

    /// Every edge as `(from, to)` ids, sorted.
    pub fn edges(&self) -> Vec<(&SourceFileId, &SourceFileId)> {
        let mut out: Vec<(&SourceFileId, &SourceFileId)> = self
            .graph
            .edge_references()
            .map(|e| (&self.graph[e.source()].id, &self.graph[e.target()].id))
            .collect();
        out.sort();
        out
    }

    pub fn dependency_node(&self, idx: NodeIndex) -> DependencyNode {
        DependencyNode {
            id: self.graph[idx].id.clone(),
            imports: self
                .imports(idx)
                .into_iter()
                .map(|n| self.graph[n].id.clone())
                .collect(),
            imported_by: self
                .imported_by(idx)
                .into_iter()
                .map(|n| self.graph[n].id.clone())
                .collect(),
        }
    }

    pub fn external_packages(&self) -> &BTreeSet<String> {
        &self.external_packages
    }

    /// Diagnostics of every node, sorted by file then kind.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        let mut out: Vec<&Diagnostic> = self
            .graph
            .node_weights()
            .flat_map(|n| n.diagnostics.iter())
            .collect();
        out.sort();
        out
    }

    fn sorted_neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        out.sort();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        let nodes = ["a.ts", "b.ts", "c.ts"]
            .iter()
            .map(|id| FileNode::new(SourceFileId::new(*id)))
            .collect();
        let edges = vec![
            (0, 1, ImportSyntax::ImportFrom),
            (0, 2, ImportSyntax::Require),
            (2, 1, ImportSyntax::ImportFrom),
        ];
        DependencyGraph::assemble(nodes, edges, BTreeSet::from(["react".to_string()]))
    }

    #[test]
    fn test_assemble_keeps_sorted_positions() {
        let g = sample();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        let ids: Vec<&str> = g.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["a.ts", "b.ts", "c.ts"]);
        assert_eq!(g.get_node_by_id("b.ts"), Some(NodeIndex::new(1)));
        assert!(g.contains("c.ts"));
        assert!(!g.contains("d.ts"));
    }

    #[test]
    fn test_forward_and_reverse_views_agree() {
        let g = sample();
        let a = g.get_node_by_id("a.ts").unwrap();
        let b = g.get_node_by_id("b.ts").unwrap();

        let node_a = g.dependency_node(a);
        assert_eq!(
            node_a.imports.iter().map(|i| i.as_str()).collect::<Vec<_>>(),
            vec!["b.ts", "c.ts"]
        );
        assert!(node_a.imported_by.is_empty());

        let node_b = g.dependency_node(b);
        assert!(node_b.imports.is_empty());
        assert_eq!(
            node_b.imported_by.iter().map(|i| i.as_str()).collect::<Vec<_>>(),
            vec!["a.ts", "c.ts"]
        );

        assert_eq!(
            g.outgoing(a),
            vec![(b, ImportSyntax::ImportFrom), (NodeIndex::new(2), ImportSyntax::Require)]
        );
        assert!(g.has_edge(a, b));
        assert!(!g.has_edge(b, a));
    }
}
