//! VisitedSet: first-seen-wins node registry with stable enumeration.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::node::{Node, NodeId};

/// Outcome of offering a node to the visited set.
#[derive(Debug, Clone)]
pub enum Visit {
    /// The identifier was unseen; the offered node is now canonical.
    New(Arc<Node>),
    /// The identifier was already present; holds the canonical first-seen instance.
    Seen(Arc<Node>),
}

impl Visit {
    /// The canonical instance for the offered identifier.
    pub fn canonical(&self) -> &Arc<Node> {
        match self {
            Self::New(node) | Self::Seen(node) => node,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }
}

/// Mapping from node identifier to node. An identifier appears at most once
/// and the first instance inserted is never replaced. Enumeration follows
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    index: FxHashMap<NodeId, usize>,
    nodes: Vec<Arc<Node>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set seeded with the traversal's start node.
    pub fn seeded(start: Arc<Node>) -> Self {
        let mut set = Self::new();
        set.visit(start);
        set
    }

    /// Offer a node. Returns `Visit::New` if the identifier was unseen,
    /// otherwise `Visit::Seen` with the existing canonical instance.
    pub fn visit(&mut self, node: Arc<Node>) -> Visit {
        if let Some(&pos) = self.index.get(&node.id) {
            return Visit::Seen(Arc::clone(&self.nodes[pos]));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(Arc::clone(&node));
        Visit::New(node)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Node>> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.nodes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| &n.id)
    }
}
