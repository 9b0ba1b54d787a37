//! Read-only traversal of expression trees.

use crate::ast::Expr;
use crate::syntax::TokenId;

/// One method per [`Expr`] variant. Implementations recurse through
/// [`Expr::accept`] as they see fit; the tree is only ever borrowed.
pub trait AstVisitor {
    type Output;

    fn visit_variable(&mut self, name: &str) -> Self::Output;
    fn visit_integral_number(&mut self, value: i64) -> Self::Output;
    fn visit_binary_expression(
        &mut self,
        lexeme: &str,
        operator: TokenId,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Self::Output;
    fn visit_parenthesized_expression(&mut self, inner: &Expr) -> Self::Output;
    fn visit_call_expression(&mut self, callee: &str, args: &[Expr]) -> Self::Output;
    fn visit_expression_sequence(&mut self, separator: &str, elements: &[Expr]) -> Self::Output;
}

/// Indented tree dump: one node per line, children prefixed with one `|--`
/// per level of depth.
#[derive(Debug, Default)]
pub struct AstPrinter {
    out: String,
    depth: usize,
}

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut printer = Self::default();
        expr.accept(&mut printer);
        printer.out
    }

    fn children<'e>(&mut self, label: String, children: impl IntoIterator<Item = &'e Expr>) {
        self.out.push_str(&label);
        self.depth += 1;
        for child in children {
            self.out.push('\n');
            self.out.push_str(&"|--".repeat(self.depth));
            child.accept(self);
        }
        self.depth -= 1;
    }
}

impl AstVisitor for AstPrinter {
    type Output = ();

    fn visit_variable(&mut self, name: &str) {
        self.out.push_str(&format!("Variable '{}'", name));
    }

    fn visit_integral_number(&mut self, value: i64) {
        self.out.push_str(&format!("Integral Number '{}'", value));
    }

    fn visit_binary_expression(&mut self, lexeme: &str, _operator: TokenId, lhs: &Expr, rhs: &Expr) {
        self.children(format!("Binary Expression '{}'", lexeme), [lhs, rhs]);
    }

    fn visit_parenthesized_expression(&mut self, inner: &Expr) {
        self.children("Parenthesized Expression '()'".to_string(), [inner]);
    }

    fn visit_call_expression(&mut self, callee: &str, args: &[Expr]) {
        self.children(format!("Call Expression '{}'", callee), args);
    }

    fn visit_expression_sequence(&mut self, separator: &str, elements: &[Expr]) {
        self.children(format!("Expression Sequence '{}'", separator), elements);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Location, Span, Token, TokenKind};

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name, Span::default(), Location::default())
    }

    /// Counts nodes without touching the tree.
    struct NodeCounter;

    impl AstVisitor for NodeCounter {
        type Output = usize;

        fn visit_variable(&mut self, _: &str) -> usize {
            1
        }
        fn visit_integral_number(&mut self, _: i64) -> usize {
            1
        }
        fn visit_binary_expression(&mut self, _: &str, _: TokenId, lhs: &Expr, rhs: &Expr) -> usize {
            1 + lhs.accept(self) + rhs.accept(self)
        }
        fn visit_parenthesized_expression(&mut self, inner: &Expr) -> usize {
            1 + inner.accept(self)
        }
        fn visit_call_expression(&mut self, _: &str, args: &[Expr]) -> usize {
            1 + args.iter().map(|a| a.accept(self)).sum::<usize>()
        }
        fn visit_expression_sequence(&mut self, _: &str, elements: &[Expr]) -> usize {
            1 + elements.iter().map(|e| e.accept(self)).sum::<usize>()
        }
    }

    fn sample() -> Expr {
        let assign = Token::new(TokenKind::Assignment, "=", Span::default(), Location::default());
        let call = Expr::call(
            &ident("add"),
            vec![Expr::variable(&ident("y")), Expr::integral_number(2, Span::default())],
            Span::default(),
        );
        Expr::sequence(";", vec![Expr::binary(&assign, Expr::variable(&ident("x")), call)])
    }

    #[test]
    fn printer_indents_by_depth() {
        let expected = "\
Expression Sequence ';'
|--Binary Expression '='
|--|--Variable 'x'
|--|--Call Expression 'add'
|--|--|--Variable 'y'
|--|--|--Integral Number '2'";
        assert_eq!(AstPrinter::print(&sample()), expected);
    }

    #[test]
    fn printing_a_clone_matches_the_original() {
        let original = sample();
        let copy = original.clone();
        assert_eq!(AstPrinter::print(&original), AstPrinter::print(&copy));
    }

    #[test]
    fn visitors_can_compute_values() {
        assert_eq!(sample().accept(&mut NodeCounter), 6);
    }
}
