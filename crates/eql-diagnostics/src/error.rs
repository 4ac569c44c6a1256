//! EQL error types

use crate::{ErrorCode, SourceLocation, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Error - the statement cannot be evaluated
    Error,
    /// Warning - evaluation proceeds but the result may surprise
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the span (converts to location using provided source)
    pub fn with_span(mut self, span: Span, source: &str) -> Self {
        self.location = Some(SourceLocation::from_span(span, source));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main EQL front-end error type
#[derive(Debug, Clone, Error)]
pub enum EqlError {
    /// Syntax error while parsing a script
    #[error("{code}: {message}")]
    Parse {
        code: ErrorCode,
        message: String,
        location: Option<SourceLocation>,
        context: Option<String>,
    },

    /// Statement is well-formed but not accepted as written
    #[error("{code}: {message}")]
    Semantic {
        code: ErrorCode,
        message: String,
        location: Option<SourceLocation>,
    },

    /// I/O or configuration error
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl EqlError {
    /// Create a parse error
    pub fn parse(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            location: None,
            context: None,
        }
    }

    /// Create a parse error with location
    pub fn parse_at(code: ErrorCode, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::Parse {
            code,
            message: message.into(),
            location: Some(location),
            context: None,
        }
    }

    pub fn semantic(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Semantic {
            code,
            message: message.into(),
            location: None,
        }
    }

    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Attach a free-form context line (shown as help)
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        match &mut self {
            Self::Parse { context, .. } | Self::System { context, .. } => {
                *context = Some(ctx.into());
            }
            Self::Semantic { .. } => {}
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { code, .. } => *code,
            Self::Semantic { code, .. } => *code,
            Self::System { code, .. } => *code,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Parse { location, .. } => location.as_ref(),
            Self::Semantic { location, .. } => location.as_ref(),
            Self::System { .. } => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, message, context) = match self {
            Self::Parse {
                code,
                message,
                context,
                ..
            } => (*code, message, context.clone()),
            Self::Semantic { code, message, .. } => (*code, message, None),
            Self::System {
                code,
                message,
                context,
            } => (*code, message, context.clone()),
        };

        let mut diag = Diagnostic::error(code, message.clone());
        if let Some(loc) = self.location() {
            diag = diag.with_location(loc.clone());
        }
        match context.or_else(|| code.info().help.map(str::to_string)) {
            Some(help) => diag.with_help(help),
            None => diag,
        }
    }
}
