//! Common test utilities for EQL evaluation
//!
//! - A recording transport that captures every executed request
//! - Helpers to parse and evaluate a script in one call

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use eql_ast::ParseTree;
use eql_eval::{EngineOptions, EqlEngine, EvalResult, EvaluationContext, StatementOutcome};
use std::sync::Arc;

pub fn parse_ok(source: &str) -> ParseTree {
    eql_parser::parse(source).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", source, e))
}

/// Context wired to a fresh recording transport
pub fn test_context() -> (EvaluationContext, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    (EvaluationContext::new(transport.clone()), transport)
}

/// Parse and evaluate `source` with default engine options
pub fn run_script(
    source: &str,
) -> (EvalResult<Vec<StatementOutcome>>, EvaluationContext, Arc<RecordingTransport>) {
    run_script_with(source, EngineOptions::default())
}

pub fn run_script_with(
    source: &str,
    options: EngineOptions,
) -> (EvalResult<Vec<StatementOutcome>>, EvaluationContext, Arc<RecordingTransport>) {
    let tree = parse_ok(source);
    let (mut ctx, transport) = test_context();
    let result = EqlEngine::with_options(options).evaluate_script(&tree, &mut ctx);
    (result, ctx, transport)
}
