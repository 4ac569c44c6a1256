//! Node kinds of the EQL parse tree

use crate::Token;
use eql_diagnostics::Span;
use std::fmt;

/// Stable identity of a node inside one [`ParseTree`](crate::ParseTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the node in the arena
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node: its kind plus the source span it covers
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// All node kinds the parser produces
#[derive(Debug, Clone)]
pub enum NodeKind {
    ConnectStmt(ConnectStmt),
    HostPort(HostPortNode),
    QueryStmt(QueryStmt),
    FieldList(FieldListNode),
    FilterStmt(FilterStmt),
    FilterPred(FilterPred),
    FilterRest(FilterRest),
    ReturnStmt(ReturnStmt),
    SortStmt(SortStmt),
    SortOrder(SortOrderNode),
}

impl NodeKind {
    /// Child nodes in declaration order
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::ConnectStmt(c) => c.hosts.clone(),
            NodeKind::QueryStmt(q) => [q.fields, q.filter, q.page, q.sort]
                .into_iter()
                .flatten()
                .collect(),
            NodeKind::FilterStmt(f) => vec![f.predicate],
            NodeKind::FilterPred(p) => {
                let mut children = Vec::with_capacity(2);
                if let PredHead::Paren(inner) = p.head {
                    children.push(inner);
                }
                children.extend(p.rest);
                children
            }
            NodeKind::FilterRest(r) => r.links.iter().map(|(_, id)| *id).collect(),
            NodeKind::SortStmt(s) => s.items.iter().map(|item| item.order).collect(),
            NodeKind::HostPort(_)
            | NodeKind::FieldList(_)
            | NodeKind::ReturnStmt(_)
            | NodeKind::SortOrder(_) => Vec::new(),
        }
    }

    /// Short rule name, used in logs and internal errors
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::ConnectStmt(_) => "connect_stmt",
            NodeKind::HostPort(_) => "hostport",
            NodeKind::QueryStmt(_) => "query_stmt",
            NodeKind::FieldList(_) => "field_list",
            NodeKind::FilterStmt(_) => "filter_stmt",
            NodeKind::FilterPred(_) => "filter_pred",
            NodeKind::FilterRest(_) => "filter_rest",
            NodeKind::ReturnStmt(_) => "return_stmt",
            NodeKind::SortStmt(_) => "sort_stmt",
            NodeKind::SortOrder(_) => "sort_order",
        }
    }
}

/// `connect host:port[, host:port]* [cluster name]`
#[derive(Debug, Clone)]
pub struct ConnectStmt {
    /// `HostPort` nodes, in declaration order
    pub hosts: Vec<NodeId>,
    pub cluster_name: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct HostPortNode {
    pub host: Token,
    pub port: Token,
}

/// `query key [fields ..] [where ..] [return ..] [sort ..]`
#[derive(Debug, Clone)]
pub struct QueryStmt {
    pub key: Token,
    pub fields: Option<NodeId>,
    pub filter: Option<NodeId>,
    pub page: Option<NodeId>,
    pub sort: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct FieldListNode {
    pub fields: Vec<Token>,
}

/// `where <predicate>`
#[derive(Debug, Clone)]
pub struct FilterStmt {
    pub predicate: NodeId,
}

/// A filter predicate: a head plus an optional rest clause
#[derive(Debug, Clone)]
pub struct FilterPred {
    pub head: PredHead,
    /// `FilterRest` node joining sibling predicates to this one
    pub rest: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub enum PredHead {
    /// `field = value`, value token kept raw (quotes included)
    Term { field: Token, value: Token },
    /// `( predicate )`
    Paren(NodeId),
}

/// Boolean connective joining a sibling predicate into a rest clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => write!(f, "and"),
            Connective::Or => write!(f, "or"),
        }
    }
}

/// Sibling predicates of a rest clause, each with the connective before it
#[derive(Debug, Clone)]
pub struct FilterRest {
    pub links: Vec<(Connective, NodeId)>,
}

impl FilterRest {
    /// Predicates joined with `and`, in declaration order
    pub fn ands(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.joined_by(Connective::And)
    }

    /// Predicates joined with `or`, in declaration order
    pub fn ors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.joined_by(Connective::Or)
    }

    /// Both connectives appear at this level
    pub fn is_mixed(&self) -> bool {
        self.ands().next().is_some() && self.ors().next().is_some()
    }

    fn joined_by(&self, connective: Connective) -> impl Iterator<Item = NodeId> + '_ {
        self.links
            .iter()
            .filter(move |(c, _)| *c == connective)
            .map(|(_, id)| *id)
    }
}

/// `return size[, lower]`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub size: Token,
    pub lower: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct SortStmt {
    pub items: Vec<SortItem>,
}

/// One sort key and its `SortOrder` node
#[derive(Debug, Clone)]
pub struct SortItem {
    pub key: Token,
    pub order: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMarker {
    Asc,
    Desc,
}

/// Direction marker after a sort key; absent when the key has none
#[derive(Debug, Clone)]
pub struct SortOrderNode {
    pub marker: Option<SortMarker>,
}
