//! EQL parser using winnow
//!
//! This crate turns EQL script text into an [`eql_ast::ParseTree`]. The
//! grammar is small and keyword-led, so the parser is plain recursive
//! descent over winnow token parsers; every node is pushed into the arena
//! only after its whole production has matched.
//!
//! ```text
//! connect localhost:9200, es2:9200 cluster logging;
//! query logs fields ts, level where level="ERROR" and service="api" return 20 sort ts desc;
//! ```

mod combinators;
mod statement;

pub use combinators::is_keyword;
pub use statement::{parse, parse_with_mode, MAX_FILTER_DEPTH};

use eql_ast::ParseTree;
use eql_diagnostics::EqlError;

/// Parser mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Fast mode - fail on first error (for execution)
    #[default]
    Fast,
    /// Analysis mode - skip failed statements and collect all errors (for `check`)
    Analysis,
}

/// Parse result with optional errors
#[derive(Debug)]
pub struct ParseResult {
    /// Parsed tree; in analysis mode it holds every statement that parsed
    pub tree: ParseTree,
    /// Parse errors, in source order
    pub errors: Vec<EqlError>,
}

impl ParseResult {
    pub fn success(tree: ParseTree) -> Self {
        Self {
            tree,
            errors: Vec::new(),
        }
    }

    pub fn error(errors: Vec<EqlError>) -> Self {
        Self {
            tree: ParseTree::new(),
            errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
