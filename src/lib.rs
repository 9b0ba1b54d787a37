//! Cowabunga: a small-language front end.
//!
//! Tokens from [`syntax`] reach an [`ast::Expr`] either through the
//! backtracking [`grammar`] engine driving an [`ast::AstBuilder`], or through
//! the [`precedence`] climber.

pub use crate::errors::{CowabungaError, ErrorKind, ErrorReporting, ParseContext, SourceContext};

pub mod ast;
pub mod cli;
pub mod config;
pub mod errors;
pub mod grammar;
pub mod lang;
pub mod precedence;
pub mod syntax;
