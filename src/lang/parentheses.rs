//! Balanced-parentheses grammar
//!
//! `Sequence -> Nested | Nested Sequence`, `Nested -> ( ) | ( Sequence )`.
//! Each rule records its production when it fires, which makes the action
//! order of the engine visible.

use crate::errors::{CowabungaError, ErrorReporting, ParseContext, SourceContext};
use crate::grammar::{default_error, Grammar, GrammarRule, ParseFailure, Symbol};
use crate::syntax::{tokenize, Token, TokenKind};

pub const SEQUENCE: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID);
pub const NESTED: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID + 1);

const OPEN: Symbol = Symbol::token(TokenKind::OpenParentheses);
const CLOSE: Symbol = Symbol::token(TokenKind::CloseParentheses);

fn symbol_name(symbol: Symbol) -> String {
    if symbol == SEQUENCE {
        "Sequence".to_string()
    } else if symbol == NESTED {
        "Nested".to_string()
    } else {
        symbol.to_string()
    }
}

struct ParenthesesRule {
    lhs: Symbol,
    rhs: Vec<Symbol>,
    production: &'static str,
}

impl GrammarRule<Vec<String>> for ParenthesesRule {
    fn lhs(&self) -> Symbol {
        self.lhs
    }

    fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    fn apply(&self, fired: &mut Vec<String>, _token: &Token) {
        fired.push(self.production.to_string());
    }

    fn produce_error(&self, failure: &ParseFailure, reporter: &dyn ErrorReporting) -> CowabungaError {
        default_error(failure, reporter, symbol_name).with_help("every '(' needs a matching ')'")
    }

    fn name(&self) -> String {
        self.production.to_string()
    }
}

pub fn parentheses_grammar() -> Grammar<Vec<String>> {
    let rule = |lhs, rhs: &[Symbol], production| ParenthesesRule {
        lhs,
        rhs: rhs.to_vec(),
        production,
    };
    Grammar::new(SEQUENCE)
        .add_rule(rule(SEQUENCE, &[NESTED], "Sequence ::= Nested"))
        .add_rule(rule(NESTED, &[OPEN, CLOSE], "Nested ::= ()"))
        .add_rule(rule(NESTED, &[OPEN, SEQUENCE, CLOSE], "Nested ::= (Sequence)"))
        .add_rule(rule(SEQUENCE, &[NESTED, SEQUENCE], "Sequence ::= Nested Sequence"))
}

/// Parses `text` and returns the productions in the order they fired.
pub fn parse_parentheses(source: &SourceContext) -> Result<Vec<String>, CowabungaError> {
    let lexing = ParseContext::new(source.clone(), "lex");
    let tokens = tokenize(&lexing)?;
    let mut fired = Vec::new();
    parentheses_grammar().parse(&tokens, &mut fired, &lexing.for_phase("grammar"))?;
    Ok(fired)
}
