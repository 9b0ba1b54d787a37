//! Grammar rules and the failure record handed to their error hooks.

use std::fmt;

use crate::errors::{to_source_span, CowabungaError, ErrorKind, ErrorReporting};
use crate::grammar::symbol::Symbol;
use crate::syntax::{Span, Token};

// ============================================================================
// FAILURE RECORD
// ============================================================================

/// The furthest dead end reached by the search.
///
/// `eof_found` means input ran out while `expected` was still pending.
/// `eof_expected` means every symbol was satisfied but `found` was left over.
/// Neither flag set is a plain mismatch between `expected` and `found`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// Token index where the search stopped; equals the input length on EOF.
    pub position: usize,
    pub expected: Option<Symbol>,
    pub found: Option<Token>,
    /// Offending token's span, or an empty span just past the last token.
    pub span: Span,
    pub eof_found: bool,
    pub eof_expected: bool,
}

/// Converts a failure into a diagnostic, naming symbols with `name`.
pub fn default_error(
    failure: &ParseFailure,
    reporter: &dyn ErrorReporting,
    name: impl Fn(Symbol) -> String,
) -> CowabungaError {
    let expected = failure
        .expected
        .map(&name)
        .unwrap_or_else(|| "more input".to_string());
    let found = failure
        .found
        .as_ref()
        .map(|t| t.lexeme.clone())
        .unwrap_or_default();

    let kind = if failure.eof_found {
        ErrorKind::UnexpectedEof { expected }
    } else if failure.eof_expected {
        ErrorKind::ExpectedEof { found }
    } else {
        ErrorKind::UnexpectedToken { expected, found }
    };
    reporter.report(kind, to_source_span(failure.span))
}

// ============================================================================
// RULE CAPABILITY
// ============================================================================

/// A production `lhs -> rhs...` whose action mutates a context `C`.
pub trait GrammarRule<C> {
    fn lhs(&self) -> Symbol;

    fn rhs(&self) -> &[Symbol];

    /// Runs once per use in the accepted derivation. `token` is the first
    /// token covered by this rule.
    fn apply(&self, ctx: &mut C, token: &Token);

    /// Builds the diagnostic when this rule owns the furthest failure.
    fn produce_error(&self, failure: &ParseFailure, reporter: &dyn ErrorReporting) -> CowabungaError {
        default_error(failure, reporter, |symbol| symbol.to_string())
    }

    fn name(&self) -> String {
        let rhs: Vec<String> = self.rhs().iter().map(|s| s.to_string()).collect();
        format!("{} -> {}", self.lhs(), rhs.join(" "))
    }
}

/// Action signature used by [`Production`].
pub type Action<C> = fn(&mut C, &Token);

/// A data-only rule: symbols, an optional action and a symbol namer for
/// diagnostics.
pub struct Production<C> {
    lhs: Symbol,
    rhs: Vec<Symbol>,
    action: Option<Action<C>>,
    label: Option<&'static str>,
    symbol_names: Option<fn(Symbol) -> String>,
}

impl<C> Production<C> {
    pub fn new(lhs: Symbol, rhs: impl Into<Vec<Symbol>>) -> Self {
        Self {
            lhs,
            rhs: rhs.into(),
            action: None,
            label: None,
            symbol_names: None,
        }
    }

    pub fn with_action(mut self, action: Action<C>) -> Self {
        self.action = Some(action);
        self
    }

    pub fn named(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_symbol_names(mut self, names: fn(Symbol) -> String) -> Self {
        self.symbol_names = Some(names);
        self
    }
}

impl<C> GrammarRule<C> for Production<C> {
    fn lhs(&self) -> Symbol {
        self.lhs
    }

    fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    fn apply(&self, ctx: &mut C, token: &Token) {
        if let Some(action) = self.action {
            action(ctx, token);
        }
    }

    fn produce_error(&self, failure: &ParseFailure, reporter: &dyn ErrorReporting) -> CowabungaError {
        match self.symbol_names {
            Some(names) => default_error(failure, reporter, names),
            None => default_error(failure, reporter, |symbol| symbol.to_string()),
        }
    }

    fn name(&self) -> String {
        match self.label {
            Some(label) => label.to_string(),
            None => {
                let names = self.symbol_names.unwrap_or(|s: Symbol| s.to_string());
                let rhs: Vec<String> = self.rhs.iter().map(|s| names(*s)).collect();
                format!("{} -> {}", names(self.lhs), rhs.join(" "))
            }
        }
    }
}

impl<C> fmt::Debug for Production<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("lhs", &self.lhs)
            .field("rhs", &self.rhs)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
