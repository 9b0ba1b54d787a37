//! Default CBC operator table.

use crate::precedence::{Associativity, OperatorTable};
use crate::syntax::TokenKind;

/// `*` binds tightest, then `+`/`-`, then the shifts, then assignment.
pub fn default_operator_table() -> OperatorTable {
    use Associativity::*;
    OperatorTable::new()
        .with_operator(TokenKind::Multiplication.id(), 8, LeftToRight)
        .with_operator(TokenKind::Addition.id(), 7, LeftToRight)
        .with_operator(TokenKind::Subtraction.id(), 7, LeftToRight)
        .with_operator(TokenKind::ShiftLeft.id(), 4, LeftToRight)
        .with_operator(TokenKind::ShiftRight.id(), 4, LeftToRight)
        .with_operator(TokenKind::Assignment.id(), 1, RightToLeft)
}
