//! Ordered edge list.

use std::sync::Arc;

use super::node::Node;

/// One observed adjacency relation. Both ends point at the canonical
/// instances held by the visited set.
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: Arc<Node>,
    pub target: Arc<Node>,
}

impl Edge {
    pub fn new(source: Arc<Node>, target: Arc<Node>) -> Self {
        Self { source, target }
    }

    /// `(source id, target id)` as string slices.
    pub fn ids(&self) -> (&str, &str) {
        (self.source.id.as_str(), self.target.id.as_str())
    }
}

/// Edges in the order they were observed. Duplicates are kept: every
/// reported relation is one entry.
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: Arc<Node>, target: Arc<Node>) {
        self.edges.push(Edge::new(source, target));
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }
}

impl<'a> IntoIterator for &'a EdgeList {
    type Item = &'a Edge;
    type IntoIter = std::slice::Iter<'a, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}
