//! Evaluation errors for the EQL engine

use eql_ast::NodeId;
use eql_cluster::ClusterError;
use eql_diagnostics::{ErrorCode, EQL0100, EQL0200, EQL0201, EQL0202};
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while evaluating a statement
///
/// Every error aborts the statement that raised it; a script stops at its
/// first failing statement.
#[derive(Debug, Error, Clone)]
pub enum EvalError {
    /// A query ran before any connect statement
    #[error("Not connected: run a connect statement before querying")]
    NotConnected,

    /// A literal token could not be converted
    #[error("Malformed literal '{literal}': expected {expected}")]
    MalformedLiteral { literal: String, expected: String },

    /// Executing the search failed
    #[error("Search failed: {0}")]
    TransportFailure(#[from] ClusterError),

    /// `and` and `or` mixed at one level without parentheses
    #[error("Ambiguous filter: 'and' and 'or' mixed at one level, add parentheses")]
    AmbiguousConnectives,

    /// A rule ran before the value of one of its children was computed
    #[error("Internal evaluation error: no {rule} value for node {node}")]
    MissingAttribute { node: NodeId, rule: &'static str },
}

impl EvalError {
    /// Create a malformed literal error
    pub fn malformed_literal(literal: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MalformedLiteral {
            literal: literal.into(),
            expected: expected.into(),
        }
    }

    /// Create a missing attribute error
    pub fn missing_attribute(node: NodeId, rule: &'static str) -> Self {
        Self::MissingAttribute { node, rule }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotConnected => EQL0200,
            Self::MalformedLiteral { .. } => EQL0201,
            Self::TransportFailure(e) => e.code(),
            Self::AmbiguousConnectives => EQL0100,
            Self::MissingAttribute { .. } => EQL0202,
        }
    }
}
