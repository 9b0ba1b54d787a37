//! Precedence-climbing expression builder
//!
//! Splits a flat token run at its weakest-binding operator and recurses on
//! both sides, so the root of every subtree is the operator evaluated last.
//! Each level rescans its range, which is quadratic in the worst case.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use crate::ast::Expr;
use crate::errors::{to_source_span, unspanned, CowabungaError, ErrorKind, ErrorReporting};
use crate::syntax::{is_binary_operator, Token, TokenId, TokenKind};

// ============================================================================
// OPERATOR TABLE
// ============================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Associativity {
    #[serde(rename = "left")]
    LeftToRight,
    #[serde(rename = "right")]
    RightToLeft,
}

/// Precedence (higher binds tighter) and associativity per operator id, plus
/// the ids that open and close a parenthesized group.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorTable {
    precedence: HashMap<TokenId, i32>,
    associativity: HashMap<TokenId, Associativity>,
    open: TokenId,
    close: TokenId,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorTable {
    /// An empty table grouping with CBC parentheses.
    pub fn new() -> Self {
        Self {
            precedence: HashMap::new(),
            associativity: HashMap::new(),
            open: TokenKind::OpenParentheses.id(),
            close: TokenKind::CloseParentheses.id(),
        }
    }

    pub fn with_operator(
        mut self,
        operator: TokenId,
        precedence: i32,
        associativity: Associativity,
    ) -> Self {
        self.set(operator, precedence, associativity);
        self
    }

    /// Inserts or replaces an operator entry.
    pub fn set(&mut self, operator: TokenId, precedence: i32, associativity: Associativity) {
        self.precedence.insert(operator, precedence);
        self.associativity.insert(operator, associativity);
    }

    pub fn precedence(&self, operator: TokenId) -> Option<i32> {
        self.precedence.get(&operator).copied()
    }

    pub fn associativity(&self, operator: TokenId) -> Option<Associativity> {
        self.associativity.get(&operator).copied()
    }

    pub fn contains(&self, operator: TokenId) -> bool {
        self.precedence.contains_key(&operator) && self.associativity.contains_key(&operator)
    }

    /// Operators sorted by id.
    pub fn operators(&self) -> Vec<(TokenId, i32, Associativity)> {
        let mut entries: Vec<_> = self
            .precedence
            .iter()
            .filter_map(|(&id, &p)| self.associativity(id).map(|a| (id, p, a)))
            .collect();
        entries.sort_by_key(|&(id, _, _)| id);
        entries
    }

    pub fn open(&self) -> TokenId {
        self.open
    }

    pub fn close(&self) -> TokenId {
        self.close
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Parses operands that contain no top-level operator.
pub trait PrimaryParser {
    /// `tokens` is never empty and is not a single parenthesized group. Use
    /// `climber` for nested expressions such as call arguments.
    fn parse_primary(
        &self,
        tokens: &[Token],
        climber: &PrecedenceClimber<'_>,
    ) -> Result<Expr, CowabungaError>;
}

pub struct PrecedenceClimber<'a> {
    table: &'a OperatorTable,
    primary: &'a dyn PrimaryParser,
    reporter: &'a dyn ErrorReporting,
}

impl<'a> PrecedenceClimber<'a> {
    pub fn new(
        table: &'a OperatorTable,
        primary: &'a dyn PrimaryParser,
        reporter: &'a dyn ErrorReporting,
    ) -> Self {
        Self {
            table,
            primary,
            reporter,
        }
    }

    pub fn table(&self) -> &OperatorTable {
        self.table
    }

    pub fn reporter(&self) -> &dyn ErrorReporting {
        self.reporter
    }

    /// Builds the expression tree for `tokens`.
    pub fn build(&self, tokens: &[Token]) -> Result<Expr, CowabungaError> {
        if tokens.is_empty() {
            return Err(self.reporter.report(ErrorKind::EmptyExpression, unspanned()));
        }

        let Some(split) = self.find_split_point(tokens)? else {
            return self.build_operand(tokens);
        };

        let operator = &tokens[split];
        let (lhs, rhs) = (&tokens[..split], &tokens[split + 1..]);
        trace!(operator = %operator.lexeme, at = split, len = tokens.len(), "split");
        if lhs.is_empty() {
            return Err(self.missing_operand(operator, "left"));
        }
        if rhs.is_empty() {
            return Err(self.missing_operand(operator, "right"));
        }
        Ok(Expr::binary(operator, self.build(lhs)?, self.build(rhs)?))
    }

    /// Index of the operator to split at: the lowest precedence at depth 0,
    /// right-most among equal left-associative operators and left-most among
    /// equal right-associative ones. `None` if there is no top-level operator.
    pub fn find_split_point(&self, tokens: &[Token]) -> Result<Option<usize>, CowabungaError> {
        let mut open_groups: Vec<usize> = Vec::new();
        let mut best: Option<(usize, i32)> = None;

        for (index, token) in tokens.iter().enumerate() {
            if token.id == self.table.open {
                open_groups.push(index);
                continue;
            }
            if token.id == self.table.close {
                if open_groups.pop().is_none() {
                    return Err(self.unbalanced(token));
                }
                continue;
            }
            if !open_groups.is_empty() || !is_binary_operator(token.id) {
                continue;
            }

            let (Some(precedence), Some(associativity)) = (
                self.table.precedence(token.id),
                self.table.associativity(token.id),
            ) else {
                return Err(self.reporter.report(
                    ErrorKind::UnknownOperator {
                        operator: token.lexeme.clone(),
                    },
                    to_source_span(token.span),
                ));
            };

            let replace = match best {
                None => true,
                Some((_, lowest)) => {
                    precedence < lowest
                        || (precedence == lowest && associativity == Associativity::LeftToRight)
                }
            };
            if replace {
                best = Some((index, precedence));
            }
        }

        if let Some(&first) = open_groups.first() {
            return Err(self.unbalanced(&tokens[first]));
        }
        Ok(best.map(|(index, _)| index))
    }

    fn build_operand(&self, tokens: &[Token]) -> Result<Expr, CowabungaError> {
        if let Some(inner) = self.group_interior(tokens) {
            let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
                return Err(self.reporter.report(ErrorKind::EmptyExpression, unspanned()));
            };
            let span = first.span.join(last.span);
            if inner.is_empty() {
                return Err(self
                    .reporter
                    .report(ErrorKind::EmptyExpression, to_source_span(span)));
            }
            return Ok(Expr::parenthesized(self.build(inner)?, span));
        }
        self.primary.parse_primary(tokens, self)
    }

    /// The tokens between the parentheses when `tokens` is exactly one group.
    fn group_interior<'t>(&self, tokens: &'t [Token]) -> Option<&'t [Token]> {
        if tokens.len() < 2 || tokens[0].id != self.table.open {
            return None;
        }
        let mut depth = 0usize;
        for (index, token) in tokens.iter().enumerate() {
            if token.id == self.table.open {
                depth += 1;
            } else if token.id == self.table.close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return (index == tokens.len() - 1).then(|| &tokens[1..index]);
                }
            }
        }
        None
    }

    fn missing_operand(&self, operator: &Token, side: &str) -> CowabungaError {
        self.reporter.report(
            ErrorKind::MissingOperand {
                operator: operator.lexeme.clone(),
                side: side.to_string(),
            },
            to_source_span(operator.span),
        )
    }

    fn unbalanced(&self, token: &Token) -> CowabungaError {
        self.reporter
            .report(ErrorKind::UnbalancedParentheses, to_source_span(token.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ParseContext, SourceContext};
    use crate::syntax::{Location, Span};

    /// Identifiers only.
    struct Names;

    impl PrimaryParser for Names {
        fn parse_primary(&self, tokens: &[Token], climber: &PrecedenceClimber<'_>) -> Result<Expr, CowabungaError> {
            match tokens {
                [single] if single.is(TokenKind::Identifier) => Ok(Expr::variable(single)),
                _ => Err(climber.reporter().report(
                    ErrorKind::UnexpectedToken {
                        expected: "identifier".into(),
                        found: tokens[0].lexeme.clone(),
                    },
                    to_source_span(tokens[0].span),
                )),
            }
        }
    }

    fn table() -> OperatorTable {
        OperatorTable::new()
            .with_operator(TokenKind::Multiplication.id(), 8, Associativity::LeftToRight)
            .with_operator(TokenKind::Addition.id(), 7, Associativity::LeftToRight)
            .with_operator(TokenKind::Subtraction.id(), 7, Associativity::LeftToRight)
            .with_operator(TokenKind::Assignment.id(), 1, Associativity::RightToLeft)
    }

    /// Space-separated single-character tokens.
    fn tokens(text: &str) -> Vec<Token> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, lexeme)| {
                let kind = match lexeme {
                    "(" => TokenKind::OpenParentheses,
                    ")" => TokenKind::CloseParentheses,
                    op => TokenKind::operator_from_lexeme(op).unwrap_or(TokenKind::Identifier),
                };
                Token::new(kind, lexeme, Span::new(2 * i, 2 * i + lexeme.len()), Location::default())
            })
            .collect()
    }

    fn build(text: &str) -> Result<Expr, CowabungaError> {
        let table = table();
        let reporter = ParseContext::new(SourceContext::fallback(text), "expression");
        PrecedenceClimber::new(&table, &Names, &reporter).build(&tokens(text))
    }

    #[test]
    fn left_associative_operators_group_left() {
        assert_eq!(build("a + b - c").unwrap().pretty(), "(- (+ a b) c)");
    }

    #[test]
    fn right_associative_operators_group_right() {
        assert_eq!(build("a = b = c").unwrap().pretty(), "(= a (= b c))");
    }

    #[test]
    fn tighter_operators_sink() {
        assert_eq!(build("a + b * c").unwrap().pretty(), "(+ a (* b c))");
        assert_eq!(build("a * b + c").unwrap().pretty(), "(+ (* a b) c)");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(build("( a + b ) * c").unwrap().pretty(), "(* (paren (+ a b)) c)");
        assert_eq!(build("( ( a ) )").unwrap().pretty(), "(paren (paren a))");
    }

    #[test]
    fn split_point_ignores_nested_operators() {
        let table = table();
        let reporter = ParseContext::new(SourceContext::default(), "expression");
        let climber = PrecedenceClimber::new(&table, &Names, &reporter);
        assert_eq!(climber.find_split_point(&tokens("( a + b ) * c")).unwrap(), Some(5));
        assert_eq!(climber.find_split_point(&tokens("( a + b )")).unwrap(), None);
    }

    #[test]
    fn missing_operands_are_reported() {
        let err = build("a +").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MissingOperand {
                operator: "+".into(),
                side: "right".into()
            }
        );
        let err = build("* b").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingOperand { ref side, .. } if side == "left"));
    }

    #[test]
    fn unbalanced_and_empty_groups_fail() {
        assert_eq!(build("( a + b").unwrap_err().kind, ErrorKind::UnbalancedParentheses);
        assert_eq!(build("a ) + b").unwrap_err().kind, ErrorKind::UnbalancedParentheses);
        assert_eq!(build("( )").unwrap_err().kind, ErrorKind::EmptyExpression);
        assert_eq!(build("").unwrap_err().kind, ErrorKind::EmptyExpression);
    }

    #[test]
    fn operators_missing_from_the_table_are_rejected() {
        let err = build("a << b").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownOperator {
                operator: "<<".into()
            }
        );
    }

    #[test]
    fn operators_are_listed_by_id() {
        let ids: Vec<TokenId> = table().operators().into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(
            ids,
            vec![
                TokenKind::Assignment.id(),
                TokenKind::Addition.id(),
                TokenKind::Subtraction.id(),
                TokenKind::Multiplication.id()
            ]
        );
    }
}
