// tests/frontend_tests.rs
//
// Whole programs through the grammar-driven path.

mod support;

use cowabunga::ast::{AstPrinter, Expr};
use cowabunga::errors::{CowabungaError, ErrorCategory, ErrorKind};
use cowabunga::lang::parse_program;
use support::source;

fn parse(text: &str) -> Result<Expr, CowabungaError> {
    parse_program(&source(text))
}

#[test]
fn sequence_keeps_source_order() {
    let expr = parse("a;\nb;\nc;").unwrap();
    assert_eq!(expr.pretty(), "(seq a b c)");
}

#[test]
fn assignment_chains_group_right() {
    assert_eq!(parse("a = b = c;").unwrap().pretty(), "(seq (= a (= b c)))");
}

#[test]
fn nested_calls_keep_argument_order() {
    let expr = parse("r = f(g(x, 1), h(), y = 2);").unwrap();
    assert_eq!(expr.pretty(), "(seq (= r (call f (call g x 1) (call h) (= y 2))))");
}

#[test]
fn printed_tree_matches_the_classic_layout() {
    let expr = parse("x = add(y, 2);").unwrap();
    let expected = "\
Expression Sequence ';'
|--Binary Expression '='
|--|--Variable 'x'
|--|--Call Expression 'add'
|--|--|--Variable 'y'
|--|--|--Integral Number '2'";
    assert_eq!(AstPrinter::print(&expr), expected);
}

#[test]
fn clone_prints_identically() {
    let expr = parse("a = f(1, g(b));\nc;").unwrap();
    let copy = expr.clone();
    assert_eq!(AstPrinter::print(&expr), AstPrinter::print(&copy));
    assert_eq!(expr.pretty(), copy.pretty());
}

#[test]
fn repeated_parses_agree() {
    let text = "a = f(b, c);\nd = 4;";
    let first = parse(text).unwrap();
    for _ in 0..3 {
        assert_eq!(parse(text).unwrap(), first);
    }
}

#[test]
fn spans_point_back_into_the_source() {
    let text = "total = add(first, 10);";
    let expr = parse(text).unwrap();
    let Expr::ExpressionSequence { elements, .. } = &expr else {
        panic!("expected a sequence");
    };
    let Expr::BinaryExpression { lhs, rhs, .. } = &elements[0] else {
        panic!("expected an assignment");
    };
    let span = lhs.span();
    assert_eq!(&text[span.start..span.end], "total");
    assert_eq!(rhs.span().start, text.find("add").unwrap());
}

#[test]
fn unexpected_token_is_reported_where_the_search_stopped() {
    let text = "a = ;";
    let err = parse(text).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Grammar);
    assert!(matches!(&err.kind, ErrorKind::UnexpectedToken { found, .. } if found == ";"));
    assert_eq!(err.source_info.primary_span.offset(), 4);
}

#[test]
fn arithmetic_is_rejected_with_a_hint() {
    let err = parse("a = b + c;").unwrap_err();
    assert!(matches!(&err.kind, ErrorKind::UnexpectedToken { found, .. } if found == "+"));
    assert!(err.diagnostic_info.help.is_some());
}

#[test]
fn rendered_diagnostic_names_file_and_expectation() {
    let err = parse("f(a,\n  b").unwrap_err();
    let rendered = format!("{:?}", miette::Report::new(err));
    assert!(rendered.contains("test.cb"), "{}", rendered);
    assert!(rendered.contains("found EOF"), "{}", rendered);
}

#[test]
fn out_of_range_literal_is_a_lex_error() {
    let err = parse("a = 123456789012345678901234567890;").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Lex);
}
