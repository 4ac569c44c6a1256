//! Raw tokens kept in the parse tree

use eql_diagnostics::Span;

/// Source text of a name, number, string or host exactly as written,
/// quotes included, with where it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
