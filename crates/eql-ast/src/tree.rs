//! Arena storage for parsed scripts

use crate::{Node, NodeId, NodeKind};
use eql_diagnostics::Span;

/// A parsed script: every node of every statement, plus the statement roots
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<Node>,
    statements: Vec<NodeId>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id
    ///
    /// Children must be pushed before the node that references them.
    pub fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        id
    }

    /// Record a statement root, in script order
    pub fn push_statement(&mut self, id: NodeId) {
        self.statements.push(id);
    }

    /// Look up a node; `None` for an id from another tree
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn statements(&self) -> &[NodeId] {
        &self.statements
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes with their ids, in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), node))
    }

    /// Children of a node, in declaration order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| node.kind.children())
            .unwrap_or_default()
    }
}
