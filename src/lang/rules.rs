//! CBC grammar
//!
//! ```text
//! TopLevelExpression -> CompoundExpression
//! CompoundExpression -> Expression ';' | Expression ';' CompoundExpression
//! Expression         -> LValue '=' Expression | RValue
//! RValue             -> identifier '(' ParamList ')' | identifier '(' ')'
//!                     | LValue | integral-number
//! LValue             -> identifier
//! ParamList          -> Expression | Expression ',' ParamList
//! ```
//!
//! Actions drive an [`AstBuilder`]; see its docs for the stack discipline.

use crate::ast::AstBuilder;
use crate::grammar::{Grammar, Production, Symbol};
use crate::syntax::{Token, TokenKind};

pub const TOP_LEVEL_EXPRESSION: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID);
pub const COMPOUND_EXPRESSION: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID + 1);
pub const EXPRESSION: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID + 2);
pub const RVALUE: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID + 3);
pub const LVALUE: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID + 4);
pub const PARAM_LIST: Symbol = Symbol::nonterminal(Symbol::FIRST_NONTERMINAL_ID + 5);

const IDENTIFIER: Symbol = Symbol::token(TokenKind::Identifier);
const INTEGRAL_NUMBER: Symbol = Symbol::token(TokenKind::IntegralNumber);
const SEMICOLON: Symbol = Symbol::token(TokenKind::ExpressionSeparator);
const COMMA: Symbol = Symbol::token(TokenKind::ArgumentSeparator);
const ASSIGN: Symbol = Symbol::token(TokenKind::Assignment);
const OPEN: Symbol = Symbol::token(TokenKind::OpenParentheses);
const CLOSE: Symbol = Symbol::token(TokenKind::CloseParentheses);

const NONTERMINAL_NAMES: [(Symbol, &str); 6] = [
    (TOP_LEVEL_EXPRESSION, "TopLevelExpression"),
    (COMPOUND_EXPRESSION, "CompoundExpression"),
    (EXPRESSION, "expression"),
    (RVALUE, "rvalue"),
    (LVALUE, "lvalue"),
    (PARAM_LIST, "parameter list"),
];

/// Diagnostic name of a CBC grammar symbol.
pub fn symbol_name(symbol: Symbol) -> String {
    if symbol.is_terminal() {
        return symbol.to_string();
    }
    NONTERMINAL_NAMES
        .iter()
        .find(|(nonterminal, _)| *nonterminal == symbol)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| symbol.to_string())
}

fn rule(lhs: Symbol, rhs: impl Into<Vec<Symbol>>) -> Production<AstBuilder> {
    Production::new(lhs, rhs).with_symbol_names(symbol_name)
}

pub fn cbc_grammar() -> Grammar<AstBuilder> {
    Grammar::new(TOP_LEVEL_EXPRESSION)
        .add_rule(
            rule(TOP_LEVEL_EXPRESSION, [COMPOUND_EXPRESSION])
                .with_action(|b: &mut AstBuilder, _: &Token| b.create_compound_expression(";")),
        )
        .add_rule(rule(COMPOUND_EXPRESSION, [EXPRESSION, SEMICOLON]))
        .add_rule(rule(
            COMPOUND_EXPRESSION,
            [EXPRESSION, SEMICOLON, COMPOUND_EXPRESSION],
        ))
        .add_rule(
            rule(EXPRESSION, [LVALUE, ASSIGN, EXPRESSION])
                .with_action(|b: &mut AstBuilder, _: &Token| b.create_assignment_expression("=")),
        )
        .add_rule(rule(EXPRESSION, [RVALUE]))
        .add_rule(
            rule(RVALUE, [IDENTIFIER, OPEN, PARAM_LIST, CLOSE])
                .with_action(|b: &mut AstBuilder, callee: &Token| b.create_function_call(callee)),
        )
        .add_rule(
            rule(RVALUE, [IDENTIFIER, OPEN, CLOSE]).with_action(|b: &mut AstBuilder, callee: &Token| {
                b.create_parameter_list();
                b.create_function_call(callee);
            }),
        )
        .add_rule(rule(RVALUE, [LVALUE]))
        .add_rule(
            rule(RVALUE, [INTEGRAL_NUMBER])
                .with_action(|b: &mut AstBuilder, number: &Token| b.create_integral_number(number)),
        )
        .add_rule(
            rule(LVALUE, [IDENTIFIER])
                .with_action(|b: &mut AstBuilder, name: &Token| b.create_variable(name)),
        )
        // The last parameter is derived deepest, so it opens the list.
        .add_rule(rule(PARAM_LIST, [EXPRESSION]).with_action(|b: &mut AstBuilder, _: &Token| {
            b.create_parameter_list();
            b.create_parameter();
        }))
        .add_rule(
            rule(PARAM_LIST, [EXPRESSION, COMMA, PARAM_LIST])
                .with_action(|b: &mut AstBuilder, _: &Token| b.create_parameter()),
        )
}
