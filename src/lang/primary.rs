//! Operands for the precedence-climbing path.

use crate::ast::Expr;
use crate::errors::{to_source_span, unspanned, CowabungaError, ErrorKind, ErrorReporting};
use crate::precedence::{OperatorTable, PrecedenceClimber, PrimaryParser};
use crate::syntax::{Token, TokenKind};

/// Identifiers, integral numbers and calls `f(a, b)`. Call arguments are full
/// expressions built through the climber.
#[derive(Debug, Default, Clone, Copy)]
pub struct CbcPrimary;

impl PrimaryParser for CbcPrimary {
    fn parse_primary(
        &self,
        tokens: &[Token],
        climber: &PrecedenceClimber<'_>,
    ) -> Result<Expr, CowabungaError> {
        let reporter = climber.reporter();
        let open_id = climber.table().open();
        match tokens {
            [name] if name.is(TokenKind::Identifier) => Ok(Expr::variable(name)),
            [number] if number.is(TokenKind::IntegralNumber) => match number.lexeme.parse() {
                Ok(value) => Ok(Expr::integral_number(value, number.span)),
                Err(_) => Err(reporter.report(
                    ErrorKind::InvalidLiteral {
                        value: number.lexeme.clone(),
                    },
                    to_source_span(number.span),
                )),
            },
            [callee, open, ..] if callee.is(TokenKind::Identifier) && open.id == open_id => {
                parse_call(tokens, climber)
            }
            [_, next, ..] => Err(unexpected(reporter, next, "an operator")),
            [first] => Err(unexpected(reporter, first, "identifier, integral number or '('")),
            [] => Err(reporter.report(ErrorKind::EmptyExpression, unspanned())),
        }
    }
}

/// `tokens` starts with `identifier (`; its parentheses are balanced.
fn parse_call(tokens: &[Token], climber: &PrecedenceClimber<'_>) -> Result<Expr, CowabungaError> {
    let reporter = climber.reporter();
    let table = climber.table();
    let close = matching_close(tokens, 1, table)
        .ok_or_else(|| reporter.report(ErrorKind::UnbalancedParentheses, to_source_span(tokens[1].span)))?;
    if let Some(trailing) = tokens.get(close + 1) {
        return Err(unexpected(reporter, trailing, "an operator"));
    }

    let interior = &tokens[2..close];
    let mut args = Vec::new();
    if !interior.is_empty() {
        for arg in split_arguments(interior, table) {
            if arg.tokens.is_empty() {
                return Err(reporter.report(ErrorKind::EmptyExpression, to_source_span(arg.separator.span)));
            }
            args.push(climber.build(arg.tokens)?);
        }
    }
    let span = tokens[0].span.join(tokens[close].span);
    Ok(Expr::call(&tokens[0], args, span))
}

struct Argument<'t> {
    tokens: &'t [Token],
    /// The comma (or closing token) that ends this argument.
    separator: &'t Token,
}

/// Splits at commas outside nested parentheses. Never called on an empty slice.
fn split_arguments<'t>(interior: &'t [Token], table: &OperatorTable) -> Vec<Argument<'t>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in interior.iter().enumerate() {
        match token.id {
            id if id == table.open() => depth += 1,
            id if id == table.close() => depth = depth.saturating_sub(1),
            id if id == TokenKind::ArgumentSeparator.id() && depth == 0 => {
                args.push(Argument {
                    tokens: &interior[start..index],
                    separator: token,
                });
                start = index + 1;
            }
            _ => {}
        }
    }
    let last = &interior[interior.len() - 1];
    args.push(Argument {
        tokens: &interior[start..],
        separator: last,
    });
    args
}

fn matching_close(tokens: &[Token], open: usize, table: &OperatorTable) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.id == table.open() {
            depth += 1;
        } else if token.id == table.close() {
            depth -= 1;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

fn unexpected(reporter: &dyn ErrorReporting, token: &Token, expected: &str) -> CowabungaError {
    reporter.report(
        ErrorKind::UnexpectedToken {
            expected: expected.to_string(),
            found: token.lexeme.clone(),
        },
        to_source_span(token.span),
    )
}
