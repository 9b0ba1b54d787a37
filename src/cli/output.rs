//! Handles all user-facing output for the CLI.
//!
//! Trees, token listings and JSON all go to stdout from here; diagnostics go
//! to stderr through [`crate::errors::print_error`].

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::{AstPrinter, Expr};
use crate::cli::args::TreeOutput;
use crate::errors::{unspanned, CowabungaError, ErrorKind, ErrorReporting, ParseContext, SourceContext};
use crate::syntax::{Token, TokenKind};

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// One token per line: its kind, then its lexeme and position.
pub fn print_tokens(tokens: &[Token]) -> io::Result<()> {
    let mut stdout = stdout();
    for token in tokens {
        let kind = token
            .kind()
            .map(|k| format!("{:?}", k))
            .unwrap_or_else(|| format!("#{}", token.id));
        stdout.set_color(ColorSpec::new().set_fg(Some(kind_color(token))))?;
        write!(stdout, "{:<20}", kind)?;
        stdout.reset()?;
        writeln!(stdout, " {}", token)?;
    }
    Ok(())
}

/// Writes `expr` in the requested form.
pub fn print_tree(expr: &Expr, output: TreeOutput) -> Result<(), CowabungaError> {
    let text = if output.json {
        serde_json::to_string_pretty(expr).map_err(|e| stdout_error(e.to_string()))?
    } else if output.compact {
        expr.pretty()
    } else {
        AstPrinter::print(expr)
    };
    println!("{}", text);
    Ok(())
}

/// The productions fired by the parentheses grammar, then a verdict line.
pub fn print_productions(fired: &[String]) -> io::Result<()> {
    let mut stdout = stdout();
    for production in fired {
        writeln!(stdout, "{}", production)?;
    }
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(stdout, "accepted")?;
    stdout.reset()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn stdout() -> StandardStream {
    let choice = if io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

fn kind_color(token: &Token) -> Color {
    match token.kind() {
        Some(TokenKind::Identifier) => Color::Cyan,
        Some(TokenKind::IntegralNumber) => Color::Magenta,
        Some(TokenKind::Definition | TokenKind::ExternalDeclaration) => Color::Blue,
        Some(kind) if crate::syntax::is_binary_operator(kind.id()) => Color::Yellow,
        _ => Color::White,
    }
}

/// Failures writing to stdout.
pub fn stdout_error(message: String) -> CowabungaError {
    ParseContext::new(SourceContext::fallback("output"), "output").report(
        ErrorKind::Io {
            path: "<stdout>".to_string(),
            message,
        },
        unspanned(),
    )
}
