//! Boolean filter trees understood by the search backend

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Right-hand side of a term filter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermValue {
    Integer(i64),
    String(String),
}

impl TermValue {
    fn to_json(&self) -> Value {
        match self {
            Self::Integer(i) => Value::from(*i),
            Self::String(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for TermValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<i64> for TermValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for TermValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for TermValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A filter expression
///
/// `And` and `Or` nodes always hold at least one child; children keep the
/// order they were added in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterNode {
    /// Exact match of a field against a value
    Term { field: String, value: TermValue },
    /// All children must match
    And(Vec<FilterNode>),
    /// At least one child must match
    Or(Vec<FilterNode>),
}

impl FilterNode {
    pub fn term(field: impl Into<String>, value: impl Into<TermValue>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        debug_assert!(!children.is_empty(), "and filter needs a child");
        Self::And(children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        debug_assert!(!children.is_empty(), "or filter needs a child");
        Self::Or(children)
    }

    /// Child filters of a composite; empty for a term
    pub fn children(&self) -> &[FilterNode] {
        match self {
            Self::Term { .. } => &[],
            Self::And(children) | Self::Or(children) => children,
        }
    }

    /// Render as a query DSL filter clause
    pub fn to_query_dsl(&self) -> Value {
        match self {
            Self::Term { field, value } => {
                let mut term = serde_json::Map::new();
                term.insert(field.clone(), value.to_json());
                json!({ "term": term })
            }
            Self::And(children) => json!({
                "bool": {
                    "must": children.iter().map(Self::to_query_dsl).collect::<Vec<_>>()
                }
            }),
            Self::Or(children) => json!({
                "bool": {
                    "should": children.iter().map(Self::to_query_dsl).collect::<Vec<_>>(),
                    "minimum_should_match": 1
                }
            }),
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, children) = match self {
            Self::Term { field, value } => return write!(f, "{field} = {value}"),
            Self::And(children) => ("and", children),
            Self::Or(children) => ("or", children),
        };
        write!(f, "{op}(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ")")
    }
}
