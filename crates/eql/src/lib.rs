//! EQL: a small query language for Elasticsearch-compatible search clusters
//!
//! This crate ties the EQL pieces together:
//! - Parsing scripts into parse trees
//! - Evaluating connect and query statements
//! - Static checks for scripts that are not run
//!
//! # Example
//!
//! ```ignore
//! use eql::{EngineOptions, Session};
//! use eql::cluster::DryRunTransport;
//! use std::sync::Arc;
//!
//! let mut session = Session::new(EngineOptions::default(), Arc::new(DryRunTransport));
//! let outcomes = session.run(r#"
//!     connect localhost:9200;
//!     query logs where level="ERROR" return 20 sort ts desc;
//! "#)?;
//! ```

// Re-export all public APIs from internal crates
pub use eql_ast as ast;
pub use eql_cluster as cluster;
pub use eql_diagnostics as diagnostics;
pub use eql_eval as eval;
pub use eql_parser as parser;

// Convenience re-exports
pub use eql_diagnostics::{Diagnostic, EqlError, Result};
pub use eql_eval::{
    ConnectivePolicy, EngineOptions, EqlEngine, EvalError, EvaluationContext, StatementOutcome,
    StatementPlan,
};
pub use eql_parser::parse;

mod analysis;
mod session;

pub use analysis::{check_source, CheckReport};
pub use session::{ScriptError, Session};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
