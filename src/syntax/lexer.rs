//! CBC tokenizer.
//!
//! Turns source text into a flat token vector. This is the only place that
//! touches characters; everything downstream works on token ids.

use pest::{iterators::Pair, Parser};
use pest_derive::Parser;
use tracing::debug;

use crate::errors::{to_source_span, CowabungaError, ErrorKind, ErrorReporting, ParseContext};
use crate::syntax::token::{Location, Span, Token, TokenKind};

#[derive(Parser)]
#[grammar = "syntax/tokens.pest"]
struct TokenGrammar;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Tokenize the source held by `ctx`.
pub fn tokenize(ctx: &ParseContext) -> Result<Vec<Token>, CowabungaError> {
    let text = ctx.source.content.as_str();
    let mut pairs = TokenGrammar::parse(Rule::program, text)
        .map_err(|e| convert_pest_error(e, ctx))?;

    let Some(program) = pairs.next() else {
        return Ok(vec![]);
    };

    let tokens: Vec<Token> = program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .filter_map(make_token)
        .collect();

    if let Some(literal) = tokens
        .iter()
        .find(|t| t.is(TokenKind::IntegralNumber) && t.lexeme.parse::<i64>().is_err())
    {
        return Err(ctx.report(
            ErrorKind::InvalidLiteral {
                value: literal.lexeme.clone(),
            },
            to_source_span(literal.span),
        ));
    }

    debug!(source = %ctx.source.name, count = tokens.len(), "tokenized");
    Ok(tokens)
}

// ============================================================================
// INTERNAL HELPERS
// ============================================================================

fn token_kind(rule: Rule) -> Option<TokenKind> {
    let kind = match rule {
        Rule::definition => TokenKind::Definition,
        Rule::external_declaration => TokenKind::ExternalDeclaration,
        Rule::identifier => TokenKind::Identifier,
        Rule::integral_number => TokenKind::IntegralNumber,
        Rule::shift_left => TokenKind::ShiftLeft,
        Rule::shift_right => TokenKind::ShiftRight,
        Rule::assignment => TokenKind::Assignment,
        Rule::addition => TokenKind::Addition,
        Rule::subtraction => TokenKind::Subtraction,
        Rule::multiplication => TokenKind::Multiplication,
        Rule::expression_separator => TokenKind::ExpressionSeparator,
        Rule::argument_separator => TokenKind::ArgumentSeparator,
        Rule::body_begin => TokenKind::BodyBegin,
        Rule::body_end => TokenKind::BodyEnd,
        Rule::open_parentheses => TokenKind::OpenParentheses,
        Rule::close_parentheses => TokenKind::CloseParentheses,
        _ => return None,
    };
    Some(kind)
}

fn make_token(pair: Pair<Rule>) -> Option<Token> {
    let kind = token_kind(pair.as_rule())?;
    let span = pair.as_span();
    let (line, begin_column) = span.start_pos().line_col();
    let width = pair.as_str().chars().count();
    let location = Location {
        line,
        begin_column,
        end_column: begin_column + width.saturating_sub(1),
    };
    Some(Token::new(
        kind,
        pair.as_str(),
        Span::new(span.start(), span.end()),
        location,
    ))
}

fn convert_pest_error(error: pest::error::Error<Rule>, ctx: &ParseContext) -> CowabungaError {
    let text = ctx.source.content.as_str();
    let start = match error.location {
        pest::error::InputLocation::Pos(pos) => pos,
        pest::error::InputLocation::Span((start, _)) => start,
    };
    let lexeme = text[start..].chars().next().map(String::from).unwrap_or_default();
    let end = start + lexeme.len();
    ctx.report(ErrorKind::UnknownToken { lexeme }, (start..end).into())
}
