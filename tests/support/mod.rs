// Shared helpers for the integration tests.
#![allow(dead_code)]

use cowabunga::ast::{AstVisitor, Expr};
use cowabunga::errors::{ParseContext, SourceContext};
use cowabunga::syntax::{tokenize, Token, TokenId};

pub fn source(text: &str) -> SourceContext {
    SourceContext::from_file("test.cb", text)
}

pub fn tokens(text: &str) -> Vec<Token> {
    tokenize(&ParseContext::new(source(text), "lex")).expect("test input should lex")
}

/// Wrapping integer semantics, so long random chains never overflow.
pub fn apply_operator(lexeme: &str, l: i64, r: i64) -> i64 {
    match lexeme {
        "+" => l.wrapping_add(r),
        "-" => l.wrapping_sub(r),
        "*" => l.wrapping_mul(r),
        "<<" => l.wrapping_shl(r as u32),
        ">>" => l.wrapping_shr(r as u32),
        other => panic!("cannot evaluate '{}'", other),
    }
}

/// Evaluates integer trees built from `+`, `-`, `*`, `<<` and `>>`.
pub struct Evaluator;

impl AstVisitor for Evaluator {
    type Output = i64;

    fn visit_variable(&mut self, name: &str) -> i64 {
        panic!("unbound variable {}", name)
    }

    fn visit_integral_number(&mut self, value: i64) -> i64 {
        value
    }

    fn visit_binary_expression(&mut self, lexeme: &str, _: TokenId, lhs: &Expr, rhs: &Expr) -> i64 {
        let (l, r) = (lhs.accept(self), rhs.accept(self));
        apply_operator(lexeme, l, r)
    }

    fn visit_parenthesized_expression(&mut self, inner: &Expr) -> i64 {
        inner.accept(self)
    }

    fn visit_call_expression(&mut self, callee: &str, _: &[Expr]) -> i64 {
        panic!("cannot evaluate call to {}", callee)
    }

    fn visit_expression_sequence(&mut self, _: &str, elements: &[Expr]) -> i64 {
        elements.iter().map(|e| e.accept(self)).last().unwrap_or(0)
    }
}

/// Leaves and operators in source order, parentheses dropped.
pub fn in_order(expr: &Expr) -> Vec<String> {
    match expr {
        Expr::Variable { name, .. } => vec![name.clone()],
        Expr::IntegralNumber { value, .. } => vec![value.to_string()],
        Expr::BinaryExpression { lexeme, lhs, rhs, .. } => {
            let mut out = in_order(lhs);
            out.push(lexeme.clone());
            out.extend(in_order(rhs));
            out
        }
        Expr::ParenthesizedExpression { inner, .. } => in_order(inner),
        Expr::CallExpression { callee, .. } => vec![callee.clone()],
        Expr::ExpressionSequence { elements, .. } => elements.iter().flat_map(in_order).collect(),
    }
}
