//! AST module for the CBC language
//!
//! A closed set of expression variants. Every node owns its children, so
//! `clone` is a deep copy and a tree never shares structure.

// ============================================================================
// IMPORTS
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::syntax::{Span, Token, TokenId};

pub mod builder;
pub mod visitor;

pub use builder::AstBuilder;
pub use visitor::{AstPrinter, AstVisitor};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A CBC expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node")]
pub enum Expr {
    Variable {
        name: String,
        span: Span,
    },
    IntegralNumber {
        value: i64,
        span: Span,
    },
    BinaryExpression {
        operator: TokenId,
        lexeme: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    ParenthesizedExpression {
        inner: Box<Expr>,
        span: Span,
    },
    CallExpression {
        callee: String,
        args: Vec<Expr>,
        span: Span,
    },
    ExpressionSequence {
        separator: String,
        elements: Vec<Expr>,
        span: Span,
    },
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Expr {
    pub fn variable(token: &Token) -> Self {
        Expr::Variable {
            name: token.lexeme.clone(),
            span: token.span,
        }
    }

    pub fn integral_number(value: i64, span: Span) -> Self {
        Expr::IntegralNumber { value, span }
    }

    /// Binary node for `operator`, spanning both operands.
    pub fn binary(operator: &Token, lhs: Expr, rhs: Expr) -> Self {
        Self::binary_operator(operator.id, &operator.lexeme, lhs, rhs)
    }

    pub fn binary_operator(operator: TokenId, lexeme: &str, lhs: Expr, rhs: Expr) -> Self {
        let span = lhs.span().join(rhs.span());
        Expr::BinaryExpression {
            operator,
            lexeme: lexeme.to_string(),
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span,
        }
    }

    /// `span` covers the parentheses themselves.
    pub fn parenthesized(inner: Expr, span: Span) -> Self {
        Expr::ParenthesizedExpression {
            inner: Box::new(inner),
            span,
        }
    }

    pub fn call(callee: &Token, args: Vec<Expr>, span: Span) -> Self {
        Expr::CallExpression {
            callee: callee.lexeme.clone(),
            args,
            span,
        }
    }

    pub fn sequence(separator: impl Into<String>, elements: Vec<Expr>) -> Self {
        let span = elements
            .iter()
            .map(Expr::span)
            .reduce(Span::join)
            .unwrap_or_default();
        Expr::ExpressionSequence {
            separator: separator.into(),
            elements,
            span,
        }
    }
}

// ============================================================================
// ACCESSORS AND RENDERING
// ============================================================================

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Variable { span, .. }
            | Expr::IntegralNumber { span, .. }
            | Expr::BinaryExpression { span, .. }
            | Expr::ParenthesizedExpression { span, .. }
            | Expr::CallExpression { span, .. }
            | Expr::ExpressionSequence { span, .. } => *span,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Variable { .. } => "Variable",
            Expr::IntegralNumber { .. } => "Integral Number",
            Expr::BinaryExpression { .. } => "Binary Expression",
            Expr::ParenthesizedExpression { .. } => "Parenthesized Expression",
            Expr::CallExpression { .. } => "Call Expression",
            Expr::ExpressionSequence { .. } => "Expression Sequence",
        }
    }

    /// Dispatches to the visitor method for this variant.
    pub fn accept<V: AstVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::Variable { name, .. } => visitor.visit_variable(name),
            Expr::IntegralNumber { value, .. } => visitor.visit_integral_number(*value),
            Expr::BinaryExpression {
                operator,
                lexeme,
                lhs,
                rhs,
                ..
            } => visitor.visit_binary_expression(lexeme, *operator, lhs, rhs),
            Expr::ParenthesizedExpression { inner, .. } => {
                visitor.visit_parenthesized_expression(inner)
            }
            Expr::CallExpression { callee, args, .. } => visitor.visit_call_expression(callee, args),
            Expr::ExpressionSequence {
                separator,
                elements,
                ..
            } => visitor.visit_expression_sequence(separator, elements),
        }
    }

    /// Compact s-expression form, e.g. `(+ a (* b c))`.
    pub fn pretty(&self) -> String {
        match self {
            Expr::Variable { name, .. } => name.clone(),
            Expr::IntegralNumber { value, .. } => value.to_string(),
            Expr::BinaryExpression { lexeme, lhs, rhs, .. } => {
                format!("({} {} {})", lexeme, lhs.pretty(), rhs.pretty())
            }
            Expr::ParenthesizedExpression { inner, .. } => format!("(paren {})", inner.pretty()),
            Expr::CallExpression { callee, args, .. } => list_form(&format!("call {}", callee), args),
            Expr::ExpressionSequence { elements, .. } => list_form("seq", elements),
        }
    }
}

fn list_form(head: &str, items: &[Expr]) -> String {
    let mut out = format!("({}", head);
    for item in items {
        out.push(' ');
        out.push_str(&item.pretty());
    }
    out.push(')');
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Location, TokenKind};

    fn tok(kind: TokenKind, lexeme: &str, start: usize) -> Token {
        Token::new(kind, lexeme, Span::new(start, start + lexeme.len()), Location::default())
    }

    fn sample() -> Expr {
        let a = Expr::variable(&tok(TokenKind::Identifier, "a", 0));
        let one = Expr::integral_number(1, Span::new(4, 5));
        let sum = Expr::binary(&tok(TokenKind::Addition, "+", 2), a, one);
        let call = Expr::call(
            &tok(TokenKind::Identifier, "f", 8),
            vec![Expr::parenthesized(sum, Span::new(9, 16))],
            Span::new(8, 17),
        );
        Expr::sequence(";", vec![call])
    }

    #[test]
    fn pretty_prints_s_expressions() {
        assert_eq!(sample().pretty(), "(seq (call f (paren (+ a 1))))");
        assert_eq!(Expr::sequence(";", vec![]).to_string(), "(seq)");
    }

    #[test]
    fn spans_cover_children() {
        let expr = sample();
        assert_eq!(expr.span(), Span::new(8, 17));
        if let Expr::ExpressionSequence { elements, .. } = &expr {
            if let Expr::CallExpression { args, .. } = &elements[0] {
                if let Expr::ParenthesizedExpression { inner, .. } = &args[0] {
                    assert_eq!(inner.span(), Span::new(0, 5));
                    return;
                }
            }
        }
        panic!("unexpected shape: {}", expr);
    }

    #[test]
    fn clone_is_deep_and_equal() {
        let original = sample();
        let copy = original.clone();
        assert_eq!(original, copy);
        assert_eq!(original.pretty(), copy.pretty());
    }

    #[test]
    fn json_tags_each_node() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["node"], "ExpressionSequence");
        assert_eq!(json["elements"][0]["node"], "CallExpression");
        let back: Expr = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
