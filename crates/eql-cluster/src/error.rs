//! Errors raised while talking to the search cluster

use eql_diagnostics::{ErrorCode, EQL0300, EQL0302, EQL0303, EQL0401};
use thiserror::Error;

pub type ClusterResult<T> = Result<T, ClusterError>;

#[derive(Debug, Error, Clone)]
pub enum ClusterError {
    /// The connection has no endpoints to send to
    #[error("No transport endpoints configured")]
    NoEndpoints,

    /// The endpoint could not be reached at all
    #[error("Endpoint {endpoint} unreachable: {message}")]
    Unreachable { endpoint: String, message: String },

    /// The request was sent but the exchange failed (timeout, broken body)
    #[error("Request to {endpoint} failed: {message}")]
    Http { endpoint: String, message: String },

    /// The cluster answered with a non-success status
    #[error("Search rejected with HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The response body is not a search response
    #[error("Invalid search response: {message}")]
    InvalidResponse { message: String },

    /// The HTTP client could not be configured
    #[error("Cannot build HTTP client: {message}")]
    Client { message: String },
}

impl ClusterError {
    pub fn unreachable(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn http(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Whether another endpoint of the same connection may still succeed
    pub fn try_next_endpoint(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoEndpoints | Self::Unreachable { .. } | Self::Http { .. } => EQL0300,
            Self::Status { .. } => EQL0302,
            Self::InvalidResponse { .. } => EQL0303,
            Self::Client { .. } => EQL0401,
        }
    }
}
