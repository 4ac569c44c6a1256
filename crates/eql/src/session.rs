//! Script sessions: parse, then evaluate statement by statement

use eql_cluster::Transport;
use eql_diagnostics::{Diagnostic, EqlError, ErrorCode, SourceLocation, Span};
use eql_eval::{EngineOptions, EqlEngine, EvalError, EvaluationContext, StatementOutcome, StatementPlan};
use std::sync::Arc;
use thiserror::Error;

/// Why a script stopped
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] EqlError),

    /// A statement failed; `location` is where the statement starts
    #[error("{error}")]
    Eval {
        error: EvalError,
        location: SourceLocation,
    },
}

impl ScriptError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(e) => e.code(),
            Self::Eval { error, .. } => error.code(),
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse(e) => e.location(),
            Self::Eval { location, .. } => Some(location),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Parse(e) => e.to_diagnostic(),
            Self::Eval { error, location } => {
                let diagnostic = Diagnostic::error(error.code(), error.to_string())
                    .with_location(location.clone());
                match error.code().info().help {
                    Some(help) => diagnostic.with_help(help),
                    None => diagnostic,
                }
            }
        }
    }
}

/// An engine plus the context it evaluates in
///
/// The connection survives across [`Session::run`] calls; node values do
/// not, since each call parses a fresh tree.
pub struct Session {
    engine: EqlEngine,
    ctx: EvaluationContext,
}

impl Session {
    pub fn new(options: EngineOptions, transport: Arc<dyn Transport>) -> Self {
        Self {
            engine: EqlEngine::with_options(options),
            ctx: EvaluationContext::new(transport),
        }
    }

    pub fn engine(&self) -> &EqlEngine {
        &self.engine
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.ctx
    }

    /// Parse and run `source`, stopping at the first failure
    pub fn run(&mut self, source: &str) -> Result<Vec<StatementOutcome>, ScriptError> {
        self.run_with(source, |_| {}, |_| {})
    }

    /// Like [`Session::run`], calling `before` with each statement's plan
    /// before it executes and `after` with each outcome
    pub fn run_with<B, A>(
        &mut self,
        source: &str,
        mut before: B,
        mut after: A,
    ) -> Result<Vec<StatementOutcome>, ScriptError>
    where
        B: FnMut(&StatementPlan),
        A: FnMut(&StatementOutcome),
    {
        let tree = eql_parser::parse(source)?;
        self.ctx.reset_attributes();
        log::debug!("running {} statement(s)", tree.statements().len());

        let mut outcomes = Vec::with_capacity(tree.statements().len());
        for &stmt in tree.statements() {
            let span = tree.get(stmt).map(|node| node.span).unwrap_or_default();
            let plan = self
                .engine
                .plan_statement(&tree, stmt, &mut self.ctx)
                .map_err(|error| located(error, span, source))?;
            before(&plan);
            let outcome = self
                .engine
                .execute_plan(plan, &mut self.ctx)
                .map_err(|error| located(error, span, source))?;
            after(&outcome);
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

fn located(error: EvalError, span: Span, source: &str) -> ScriptError {
    ScriptError::Eval {
        error,
        location: SourceLocation::from_span(span, source),
    }
}
