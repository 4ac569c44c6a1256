//! EQL Evaluation Engine
//!
//! This crate gives meaning to a parsed EQL script. It evaluates each
//! statement with one bottom-up pass over its parse tree:
//!
//! - **Attribute table**: values computed per node, keyed by node identity
//! - **Connection manager**: `connect` statements become the active
//!   [`ClusterConnection`](eql_cluster::ClusterConnection)
//! - **Filter compiler**: predicates become [`FilterNode`](eql_cluster::FilterNode) trees
//! - **Query builder/executor**: projection, filter, paging and sort are
//!   combined into a [`QueryRequest`] and executed once
//!
//! # Example
//!
//! ```ignore
//! use eql_eval::{EqlEngine, EvaluationContext};
//!
//! let tree = eql_parser::parse("connect localhost:9200; query logs where level=\"ERROR\"")?;
//! let mut ctx = EvaluationContext::default();
//! let outcomes = EqlEngine::new().evaluate_script(&tree, &mut ctx)?;
//! ```

pub mod attribute;
pub mod connection;
pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
pub mod query;
pub mod value;
mod walk;

pub use attribute::{Attribute, Attributes};
pub use context::EvaluationContext;
pub use engine::{EngineOptions, EqlEngine, StatementOutcome, StatementPlan};
pub use error::{EvalError, EvalResult};
pub use filter::ConnectivePolicy;
pub use value::{PageSpec, QueryRequest, SortDirection, SortEntry, SortSpec};
pub use walk::post_order;
