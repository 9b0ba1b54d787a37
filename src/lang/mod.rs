//! The CBC language front end
//!
//! Two ways from source text to an [`Expr`]: [`parse_program`] runs the
//! backtracking grammar with [`AstBuilder`] actions, [`parse_expression`]
//! runs the precedence climber over a single expression.

use tracing::debug;

use crate::ast::{AstBuilder, Expr};
use crate::errors::{CowabungaError, ErrorKind, ParseContext, SourceContext};
use crate::precedence::{OperatorTable, PrecedenceClimber};
use crate::syntax::{tokenize, TokenKind};

pub mod operators;
pub mod parentheses;
pub mod primary;
pub mod rules;

pub use operators::default_operator_table;
pub use parentheses::{parentheses_grammar, parse_parentheses};
pub use primary::CbcPrimary;
pub use rules::cbc_grammar;

/// Parses a `;`-terminated expression sequence. Empty input is an empty sequence.
pub fn parse_program(source: &SourceContext) -> Result<Expr, CowabungaError> {
    let lexing = ParseContext::new(source.clone(), "lex");
    let tokens = tokenize(&lexing)?;
    if tokens.is_empty() {
        return Ok(Expr::sequence(";", Vec::new()));
    }

    let mut builder = AstBuilder::new();
    let reporter = lexing.for_phase("grammar");
    cbc_grammar()
        .parse(&tokens, &mut builder, &reporter)
        .map_err(with_grammar_help)?;

    let program = builder.release();
    debug!(source = %source.name, root = program.type_name(), "program parsed");
    Ok(program)
}

/// Parses one expression with operator precedence. A single trailing `;` is
/// allowed.
pub fn parse_expression(source: &SourceContext, table: &OperatorTable) -> Result<Expr, CowabungaError> {
    let lexing = ParseContext::new(source.clone(), "lex");
    let mut tokens = tokenize(&lexing)?;
    if tokens.last().is_some_and(|t| t.is(TokenKind::ExpressionSeparator)) {
        tokens.pop();
    }

    let reporter = lexing.for_phase("expression");
    let expr = PrecedenceClimber::new(table, &CbcPrimary, &reporter).build(&tokens)?;
    debug!(source = %source.name, root = expr.type_name(), "expression parsed");
    Ok(expr)
}

fn with_grammar_help(error: CowabungaError) -> CowabungaError {
    let help = match &error.kind {
        ErrorKind::UnexpectedEof { expected } if expected == "';'" => {
            Some("every expression ends with ';'")
        }
        ErrorKind::UnexpectedToken { found, .. } if TokenKind::operator_from_lexeme(found).is_some() => {
            Some("only '=' is allowed in programs; use `cbc expr` for arithmetic")
        }
        _ => None,
    };
    match help {
        Some(help) => error.with_help(help),
        None => error,
    }
}
