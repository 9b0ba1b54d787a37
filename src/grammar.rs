//! Backtracking grammar engine
//!
//! Grammars are data: a start [`Symbol`] plus a table of [`GrammarRule`]s kept
//! sorted by left-hand side. [`Grammar::parse`] searches for a leftmost
//! derivation of the whole token range and, on success, replays the rule
//! actions of that single derivation against a caller-owned context.

pub mod engine;
pub mod rule;
pub mod symbol;

pub use engine::Grammar;
pub use rule::{default_error, Action, GrammarRule, ParseFailure, Production};
pub use symbol::{Symbol, SymbolKind};
