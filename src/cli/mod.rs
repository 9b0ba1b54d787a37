//! The `cbc` command-line interface.
//!
//! Reads files, wires the front end together and reports failures as miette
//! diagnostics with exit code 1.

use clap::Parser;
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::args::{CbcArgs, Command, TreeOutput};
use crate::config::OperatorConfig;
use crate::errors::{print_error, unspanned, CowabungaError, ErrorKind, ErrorReporting, ParseContext, SourceContext};
use crate::lang::{default_operator_table, parse_expression, parse_parentheses, parse_program};
use crate::syntax::tokenize;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = CbcArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Tokens { file } => handle_tokens(&file),
        Command::Ast { file, output } => handle_ast(&file, output),
        Command::Expr {
            file,
            operators,
            output,
        } => handle_expr(&file, operators.as_deref(), output),
        Command::Parens { text } => handle_parens(text),
    };

    if let Err(e) = result {
        print_error(e);
        process::exit(1);
    }
}

/// Logs to stderr. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,cowabunga=debug",
        _ => "warn,cowabunga=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_source(path: &Path) -> Result<SourceContext, CowabungaError> {
    let name = path.display().to_string();
    debug!(file = %name, "reading source");
    std::fs::read_to_string(path)
        .map(|content| SourceContext::from_file(name.clone(), content))
        .map_err(|e| {
            ParseContext::new(SourceContext::fallback(&name), "io").report(
                ErrorKind::Io {
                    path: name.clone(),
                    message: e.to_string(),
                },
                unspanned(),
            )
        })
}

fn handle_tokens(path: &Path) -> Result<(), CowabungaError> {
    let source = read_source(path)?;
    let tokens = tokenize(&ParseContext::new(source, "lex"))?;
    output::print_tokens(&tokens).map_err(|e| output::stdout_error(e.to_string()))
}

fn handle_ast(path: &Path, output: TreeOutput) -> Result<(), CowabungaError> {
    let program = parse_program(&read_source(path)?)?;
    output::print_tree(&program, output)
}

fn handle_expr(path: &Path, operators: Option<&Path>, output: TreeOutput) -> Result<(), CowabungaError> {
    let table = match operators {
        Some(config) => OperatorConfig::load(config)?.apply(default_operator_table())?,
        None => default_operator_table(),
    };
    let expr = parse_expression(&read_source(path)?, &table)?;
    output::print_tree(&expr, output)
}

fn handle_parens(text: String) -> Result<(), CowabungaError> {
    let fired = parse_parentheses(&SourceContext::from_file("<parens>", text))?;
    output::print_productions(&fired).map_err(|e| output::stdout_error(e.to_string()))
}
