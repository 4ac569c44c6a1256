//! EQL error codes following a structured numbering system
//!
//! Error code ranges:
//! - EQL0001-EQL0099: Parse errors (syntax)
//! - EQL0100-EQL0199: Semantic errors (statement shape)
//! - EQL0200-EQL0299: Evaluation errors (runtime)
//! - EQL0300-EQL0399: Cluster errors (transport, search backend)
//! - EQL0400-EQL0499: System errors (I/O, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    pub const fn is_parse_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    pub const fn is_semantic_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_evaluation_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_cluster_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EQL{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Parse errors (0001-0099)
    map.insert(1, ErrorInfo::new("Unexpected token"));
    map.insert(2, ErrorInfo::new("Unexpected end of input"));
    map.insert(3, ErrorInfo::new("Filter nested too deeply")
        .with_help("Remove redundant parentheses or split the filter"));
    map.insert(5, ErrorInfo::new("Unterminated string literal"));
    map.insert(6, ErrorInfo::new("Expected ';' between statements")
        .with_help("Terminate each statement with ';'"));
    map.insert(7, ErrorInfo::new("Invalid host:port pair")
        .with_help("Endpoints are written as host:port, e.g. localhost:9200"));

    // Semantic errors (0100-0199)
    map.insert(100, ErrorInfo::new("Ambiguous mix of 'and' and 'or'")
        .with_help("Use parentheses to group the 'or' predicates"));

    // Evaluation errors (0200-0299)
    map.insert(200, ErrorInfo::new("Not connected")
        .with_help("Run a 'connect host:port' statement before querying"));
    map.insert(201, ErrorInfo::new("Malformed literal"));
    map.insert(202, ErrorInfo::new("Missing attribute value"));

    // Cluster errors (0300-0399)
    map.insert(300, ErrorInfo::new("Transport failure"));
    map.insert(302, ErrorInfo::new("Search request rejected"));
    map.insert(303, ErrorInfo::new("Invalid search response"));

    // System errors (0400-0499)
    map.insert(400, ErrorInfo::new("I/O error"));
    map.insert(401, ErrorInfo::new("Invalid configuration"));

    map
});

// Parse errors
pub const EQL0001: ErrorCode = ErrorCode::new(1);
pub const EQL0002: ErrorCode = ErrorCode::new(2);
pub const EQL0003: ErrorCode = ErrorCode::new(3);
pub const EQL0005: ErrorCode = ErrorCode::new(5);
pub const EQL0006: ErrorCode = ErrorCode::new(6);
pub const EQL0007: ErrorCode = ErrorCode::new(7);

// Semantic errors
pub const EQL0100: ErrorCode = ErrorCode::new(100);

// Evaluation errors
pub const EQL0200: ErrorCode = ErrorCode::new(200);
pub const EQL0201: ErrorCode = ErrorCode::new(201);
pub const EQL0202: ErrorCode = ErrorCode::new(202);

// Cluster errors
pub const EQL0300: ErrorCode = ErrorCode::new(300);
pub const EQL0302: ErrorCode = ErrorCode::new(302);
pub const EQL0303: ErrorCode = ErrorCode::new(303);

// System errors
pub const EQL0400: ErrorCode = ErrorCode::new(400);
pub const EQL0401: ErrorCode = ErrorCode::new(401);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(EQL0001.to_string(), "EQL0001");
        assert_eq!(EQL0200.to_string(), "EQL0200");
    }

    #[test]
    fn test_error_code_ranges() {
        assert!(EQL0006.is_parse_error());
        assert!(EQL0100.is_semantic_error());
        assert!(EQL0201.is_evaluation_error());
        assert!(EQL0302.is_cluster_error());
        assert!(EQL0401.is_system_error());
    }

    #[test]
    fn test_error_info() {
        assert_eq!(EQL0200.info().description, "Not connected");
        assert!(EQL0200.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
