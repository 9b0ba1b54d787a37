//! Defines the command-line arguments and subcommands for `cbc`.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "cbc",
    version,
    about = "Front end for the CBC language: tokens, grammar-built ASTs and precedence-climbed expressions."
)]
pub struct CbcArgs {
    /// Log more (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// How a tree is written to stdout.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct TreeOutput {
    /// Emit the tree as JSON.
    #[arg(long, conflicts_with = "compact")]
    pub json: bool,
    /// Emit the tree as a single s-expression line.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every token with its position.
    Tokens {
        /// The CBC source file.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse a program with the grammar engine and print its AST.
    Ast {
        /// The CBC source file.
        #[arg(required = true)]
        file: PathBuf,
        #[command(flatten)]
        output: TreeOutput,
    },
    /// Parse a single expression by precedence climbing and print its AST.
    Expr {
        /// File holding one expression.
        #[arg(required = true)]
        file: PathBuf,
        /// JSON file overriding operator precedence and associativity.
        #[arg(long)]
        operators: Option<PathBuf>,
        #[command(flatten)]
        output: TreeOutput,
    },
    /// Run the balanced-parentheses grammar on TEXT and list the productions used.
    Parens {
        /// Text such as "(())()".
        text: String,
    },
}
