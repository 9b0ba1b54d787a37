//! Grammar alphabet.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::syntax::{TokenId, TokenKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// A terminal or nonterminal grammar symbol.
///
/// Symbols compare by id only. Terminal ids are token ids, so nonterminal ids
/// must be allocated outside the token alphabet; see [`Symbol::FIRST_NONTERMINAL_ID`].
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub id: u32,
    pub kind: SymbolKind,
}

impl Symbol {
    /// Lowest id handed out to nonterminals by convention.
    pub const FIRST_NONTERMINAL_ID: u32 = 100;

    pub const fn terminal(id: TokenId) -> Self {
        Self {
            id,
            kind: SymbolKind::Terminal,
        }
    }

    pub const fn nonterminal(id: u32) -> Self {
        Self {
            id,
            kind: SymbolKind::NonTerminal,
        }
    }

    pub const fn token(kind: TokenKind) -> Self {
        Self::terminal(kind.id())
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, TokenKind::from_id(self.id)) {
            (SymbolKind::Terminal, Some(kind)) => write!(f, "{}", kind.describe()),
            (SymbolKind::Terminal, None) => write!(f, "terminal #{}", self.id),
            (SymbolKind::NonTerminal, _) => write!(f, "nonterminal #{}", self.id),
        }
    }
}
