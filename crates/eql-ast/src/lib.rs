//! EQL parse tree definitions
//!
//! The parser produces a [`ParseTree`]: an arena of [`Node`]s addressed by
//! [`NodeId`]. Ids are assigned once, at construction, so two syntactically
//! identical predicates in the same script are still distinct nodes. The
//! evaluator keys its per-node attribute table on these ids.

mod node;
mod token;
mod tree;

pub use node::*;
pub use token::Token;
pub use tree::*;
