//! Per-node attribute table
//!
//! Each evaluation rule stores its result against the id of the node it ran
//! on. Slots are addressed by node identity, so two structurally identical
//! predicates never share a value.

use crate::{EvalError, EvalResult, PageSpec, SortDirection, SortSpec};
use eql_ast::NodeId;
use eql_cluster::{FilterNode, HostPort};

/// Value computed for one node
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Endpoint(HostPort),
    Filter(FilterNode),
    Fields(Vec<String>),
    Page(PageSpec),
    Direction(SortDirection),
    Sort(SortSpec),
}

#[derive(Debug, Clone, Default)]
pub struct Attributes {
    slots: Vec<Option<Attribute>>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the value for a node, replacing any earlier one
    pub fn set_value(&mut self, node: NodeId, value: Attribute) {
        let index = node.index();
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(value);
    }

    pub fn get_value(&self, node: NodeId) -> Option<&Attribute> {
        self.slots.get(node.index()).and_then(Option::as_ref)
    }

    /// Drop every stored value
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of nodes holding a value
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn endpoint(&self, node: NodeId) -> EvalResult<&HostPort> {
        match self.get_value(node) {
            Some(Attribute::Endpoint(endpoint)) => Ok(endpoint),
            _ => Err(EvalError::missing_attribute(node, "hostport")),
        }
    }

    pub fn filter(&self, node: NodeId) -> EvalResult<&FilterNode> {
        match self.get_value(node) {
            Some(Attribute::Filter(filter)) => Ok(filter),
            _ => Err(EvalError::missing_attribute(node, "filter")),
        }
    }

    pub fn fields(&self, node: NodeId) -> EvalResult<&[String]> {
        match self.get_value(node) {
            Some(Attribute::Fields(fields)) => Ok(fields),
            _ => Err(EvalError::missing_attribute(node, "field_list")),
        }
    }

    pub fn page(&self, node: NodeId) -> EvalResult<PageSpec> {
        match self.get_value(node) {
            Some(Attribute::Page(page)) => Ok(*page),
            _ => Err(EvalError::missing_attribute(node, "return_stmt")),
        }
    }

    pub fn direction(&self, node: NodeId) -> EvalResult<SortDirection> {
        match self.get_value(node) {
            Some(Attribute::Direction(direction)) => Ok(*direction),
            _ => Err(EvalError::missing_attribute(node, "sort_order")),
        }
    }

    pub fn sort(&self, node: NodeId) -> EvalResult<&SortSpec> {
        match self.get_value(node) {
            Some(Attribute::Sort(sort)) => Ok(sort),
            _ => Err(EvalError::missing_attribute(node, "sort_stmt")),
        }
    }
}
