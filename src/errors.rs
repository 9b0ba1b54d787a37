//! Cowabunga Error Handling
//!
//! A single error type for every stage of the front end. The *what* lives in
//! [`ErrorKind`], the *where* in [`SourceInfo`], the *how to help* in
//! [`DiagnosticInfo`]. Errors are created through [`ErrorReporting`] so that
//! the source and the error code are always filled in consistently.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::syntax::Span;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source text and its display name, used to render file/line/column in diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("# {}", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The single error type for the front end.
#[derive(Debug)]
pub struct CowabungaError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds produced by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Lexing
    #[error("unknown token '{lexeme}'")]
    UnknownToken { lexeme: String },
    #[error("integral number '{value}' is out of range")]
    InvalidLiteral { value: String },

    // Grammar engine
    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken { expected: String, found: String },
    #[error("expected {expected}, found EOF")]
    UnexpectedEof { expected: String },
    #[error("expected EOF, found '{found}'")]
    ExpectedEof { found: String },
    #[error("no grammar rule expands {symbol}")]
    NoRules { symbol: String },

    // Expression builder
    #[error("empty expression")]
    EmptyExpression,
    #[error("missing {side} operand of '{operator}'")]
    MissingOperand { operator: String, side: String },
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("operator '{operator}' is missing from the operator table")]
    UnknownOperator { operator: String },

    // Configuration and files
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("cannot read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Broad classification used by tests and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Grammar,
    Expression,
    Config,
    Io,
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownToken { .. } | Self::InvalidLiteral { .. } => ErrorCategory::Lex,

            Self::UnexpectedToken { .. }
            | Self::UnexpectedEof { .. }
            | Self::ExpectedEof { .. }
            | Self::NoRules { .. } => ErrorCategory::Grammar,

            Self::EmptyExpression
            | Self::MissingOperand { .. }
            | Self::UnbalancedParentheses
            | Self::UnknownOperator { .. } => ErrorCategory::Expression,

            Self::InvalidConfig { .. } => ErrorCategory::Config,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnknownToken { .. } => "unknown_token",
            Self::InvalidLiteral { .. } => "invalid_literal",
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::UnexpectedEof { .. } => "unexpected_eof",
            Self::ExpectedEof { .. } => "expected_eof",
            Self::NoRules { .. } => "no_rules",
            Self::EmptyExpression => "empty_expression",
            Self::MissingOperand { .. } => "missing_operand",
            Self::UnbalancedParentheses => "unbalanced_parentheses",
            Self::UnknownOperator { .. } => "unknown_operator",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::Io { .. } => "io",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnknownToken { .. } => "not a token",
            Self::InvalidLiteral { .. } => "invalid literal",
            Self::UnexpectedToken { .. } => "unexpected token",
            Self::UnexpectedEof { .. } => "input ends here",
            Self::ExpectedEof { .. } => "trailing input",
            Self::NoRules { .. } => "no rule applies",
            Self::EmptyExpression => "empty expression",
            Self::MissingOperand { .. } => "operand missing",
            Self::UnbalancedParentheses => "unbalanced here",
            Self::UnknownOperator { .. } => "unknown operator",
            Self::InvalidConfig { .. } => "invalid configuration",
            Self::Io { .. } => "io failure",
        }
    }
}

impl CowabungaError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Attach a help message.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }
}

impl std::error::Error for CowabungaError {}

impl fmt::Display for CowabungaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.source_info.phase, self.kind)
    }
}

impl Diagnostic for CowabungaError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

// ============================================================================
// ERROR CREATION
// ============================================================================

/// Context-aware error creation
pub trait ErrorReporting {
    /// Create an error located at `span`.
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> CowabungaError;
}

/// General-purpose reporting context: a source plus the pipeline phase name.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub source: SourceContext,
    pub phase: String,
}

impl ParseContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }

    /// Same source, different phase.
    pub fn for_phase(&self, phase: impl Into<String>) -> Self {
        Self::new(self.source.clone(), phase)
    }
}

impl ErrorReporting for ParseContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> CowabungaError {
        let error_code = format!("cowabunga::{}::{}", self.phase, kind.code_suffix());

        CowabungaError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

/// Placeholder span for errors that are not tied to a source location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Converts a token [`Span`] to a miette `SourceSpan`.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: CowabungaError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
