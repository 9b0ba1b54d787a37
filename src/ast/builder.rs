//! # AST Builder
//!
//! A stack machine driven by grammar rule actions. Leaves are pushed as they
//! are seen; composite nodes pop their children. Rule actions fire innermost
//! first, so children always exist before their parent is built.
//!
//! ## Invariants
//! - Every operation's stack precondition is asserted. A violation means the
//!   grammar wiring is wrong, not that the input is bad.
//! - Nodes leave the builder only through [`AstBuilder::release`], fully built.

use crate::ast::Expr;
use crate::syntax::{Token, TokenKind};

#[derive(Debug, Default)]
pub struct AstBuilder {
    pending: Vec<Expr>,
    parameter_lists: Vec<Vec<Expr>>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of finished expressions waiting for a parent.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn create_variable(&mut self, token: &Token) {
        self.pending.push(Expr::variable(token));
    }

    /// The lexer only emits integral numbers that fit in an `i64`.
    pub fn create_integral_number(&mut self, token: &Token) {
        assert!(token.is(TokenKind::IntegralNumber), "not an integral number: {}", token);
        let Ok(value) = token.lexeme.parse::<i64>() else {
            panic!("integral number {} was not range-checked", token);
        };
        self.pending.push(Expr::integral_number(value, token.span));
    }

    /// Folds every pending expression into one sequence, in source order.
    pub fn create_compound_expression(&mut self, separator: &str) {
        assert!(!self.pending.is_empty(), "compound expression needs at least one expression");
        let elements: Vec<Expr> = self.pending.drain(..).rev().collect();
        self.pending.push(Expr::sequence(separator, elements));
    }

    /// The left value is derived after the right-hand side has been built, so
    /// it is on top of the stack.
    pub fn create_assignment_expression(&mut self, lexeme: &str) {
        let (Some(lhs), Some(rhs)) = (self.pending.pop(), self.pending.pop()) else {
            panic!("assignment needs two expressions");
        };
        self.pending.push(Expr::binary_operator(
            TokenKind::Assignment.id(),
            lexeme,
            lhs,
            rhs,
        ));
    }

    /// Opens a new (innermost) argument list.
    pub fn create_parameter_list(&mut self) {
        self.parameter_lists.push(Vec::new());
    }

    /// Moves the most recent expression into the innermost argument list.
    pub fn create_parameter(&mut self) {
        assert!(!self.parameter_lists.is_empty(), "parameter outside a parameter list");
        let Some(parameter) = self.pending.pop() else {
            panic!("parameter needs a pending expression");
        };
        if let Some(list) = self.parameter_lists.last_mut() {
            list.push(parameter);
        }
    }

    /// Closes the innermost argument list into a call of `callee`.
    pub fn create_function_call(&mut self, callee: &Token) {
        let Some(mut args) = self.parameter_lists.pop() else {
            panic!("function call {} without a parameter list", callee);
        };
        args.reverse();
        let span = args
            .iter()
            .map(Expr::span)
            .fold(callee.span, |acc, s| acc.join(s));
        self.pending.push(Expr::call(callee, args, span));
    }

    /// Hands out the finished tree.
    pub fn release(&mut self) -> Expr {
        assert!(self.parameter_lists.is_empty(), "unclosed parameter list");
        match (self.pending.pop(), self.pending.is_empty()) {
            (Some(root), true) => root,
            (_, _) => panic!("exactly one top-level expression expected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Location, Span};

    fn tok(kind: TokenKind, lexeme: &str, start: usize) -> Token {
        Token::new(kind, lexeme, Span::new(start, start + lexeme.len()), Location::default())
    }

    fn ident(name: &str, start: usize) -> Token {
        tok(TokenKind::Identifier, name, start)
    }

    #[test]
    fn assignment_takes_lhs_from_the_top() {
        let mut b = AstBuilder::new();
        b.create_integral_number(&tok(TokenKind::IntegralNumber, "5", 4));
        b.create_variable(&ident("x", 0));
        b.create_assignment_expression("=");
        let expr = b.release();
        assert_eq!(expr.pretty(), "(= x 5)");
        assert_eq!(expr.span(), Span::new(0, 5));
    }

    #[test]
    fn compound_restores_source_order() {
        let mut b = AstBuilder::new();
        b.create_variable(&ident("c", 6));
        b.create_variable(&ident("b", 3));
        b.create_variable(&ident("a", 0));
        b.create_compound_expression(";");
        assert_eq!(b.release().pretty(), "(seq a b c)");
    }

    #[test]
    fn nested_parameter_lists() {
        // Actions for f(g(x), y), innermost first.
        let mut b = AstBuilder::new();
        b.create_variable(&ident("y", 8));
        b.create_parameter_list();
        b.create_parameter();
        b.create_variable(&ident("x", 4));
        b.create_parameter_list();
        b.create_parameter();
        b.create_function_call(&ident("g", 2));
        b.create_parameter();
        b.create_function_call(&ident("f", 0));
        assert_eq!(b.pending(), 1);
        assert_eq!(b.release().pretty(), "(call f (call g x) y)");
    }

    #[test]
    fn empty_call() {
        let mut b = AstBuilder::new();
        b.create_parameter_list();
        b.create_function_call(&ident("now", 0));
        assert_eq!(b.release().pretty(), "(call now)");
    }

    #[test]
    #[should_panic(expected = "exactly one top-level expression")]
    fn release_rejects_empty_builder() {
        AstBuilder::new().release();
    }

    #[test]
    #[should_panic(expected = "exactly one top-level expression")]
    fn release_rejects_two_pending_expressions() {
        let mut b = AstBuilder::new();
        b.create_variable(&ident("a", 0));
        b.create_variable(&ident("b", 2));
        b.release();
    }

    #[test]
    #[should_panic(expected = "assignment needs two expressions")]
    fn assignment_requires_two_operands() {
        let mut b = AstBuilder::new();
        b.create_variable(&ident("a", 0));
        b.create_assignment_expression("=");
    }

    #[test]
    #[should_panic(expected = "parameter outside a parameter list")]
    fn parameter_requires_an_open_list() {
        let mut b = AstBuilder::new();
        b.create_variable(&ident("a", 0));
        b.create_parameter();
    }
}
