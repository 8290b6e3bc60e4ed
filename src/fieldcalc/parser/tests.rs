//! Grammar tests: precedence, associativity, spans, start symbols and errors.

use super::*;
use crate::fieldcalc::error::ExprError;
use crate::fieldcalc::value::{FieldType, ValueKind};

fn no_plugins(_: &str) -> bool {
    false
}

fn parse_expr(source: &str) -> Expr {
    parse_source(source, &StartSymbol::Default, no_plugins)
        .expect("source to parse")
        .expr
        .expect("an expression")
}

/// Render a tree as an s-expression for compact assertions.
fn sexp(e: &Expr) -> String {
    match &e.kind {
        ExprKind::Number(n) => n.to_string(),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Unary(op, inner) => {
            let op = match op {
                UnaryOp::Negate => "neg",
                UnaryOp::Not => "not",
                UnaryOp::Hodge => "hodge",
            };
            format!("({} {})", op, sexp(inner))
        }
        ExprKind::Binary(op, l, r) => format!("({} {} {})", op, sexp(l), sexp(r)),
        ExprKind::Conditional(c, t, f) => {
            format!("(? {} {} {})", sexp(c), sexp(t), sexp(f))
        }
        ExprKind::Call { name, args } => {
            let args: Vec<String> = args.iter().map(sexp).collect();
            format!("({} {})", name, args.join(" "))
        }
        ExprKind::Component(inner, name) => format!("(.{} {})", name, sexp(inner)),
        ExprKind::Transpose(inner) => format!("(T {})", sexp(inner)),
        ExprKind::PluginCall {
            name, arguments, ..
        } => format!("(plugin {} {:?})", name, arguments),
    }
}

fn tree(source: &str) -> String {
    sexp(&parse_expr(source))
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(tree("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(tree("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(tree("(1 + 2) * 3"), "(* (+ 1 2) 3)");
    assert_eq!(tree("a % b / c"), "(/ (% a b) c)");
}

#[test]
fn test_products_bind_tighter_than_multiplication() {
    assert_eq!(tree("a & b * c"), "(* (& a b) c)");
    assert_eq!(tree("2 * a ^ b"), "(* 2 (^ a b))");
}

#[test]
fn test_unary_and_postfix() {
    assert_eq!(tree("-a.x"), "(neg (.x a))");
    assert_eq!(tree("!!flag"), "(not (not flag))");
    assert_eq!(tree("*T"), "(hodge T)");
    assert_eq!(tree("T.T().xx"), "(.xx (T T))");
    assert_eq!(tree("- -a"), "(neg (neg a))");
}

#[test]
fn test_comparison_and_logic_tiers() {
    assert_eq!(tree("a < b == c < d"), "(== (< a b) (< c d))");
    assert_eq!(tree("a || b && c"), "(|| a (&& b c))");
    assert_eq!(tree("a + 1 >= b"), "(>= (+ a 1) b)");
}

#[test]
fn test_conditional() {
    assert_eq!(tree("p > 5 ? p : 0"), "(? (> p 5) p 0)");
    assert_eq!(tree("a ? b : c ? d : e"), "(? a b (? c d e))");
    assert_eq!(tree("a ? b ? c : d : e"), "(? a (? b c d) e)");
}

#[test]
fn test_calls_and_names() {
    assert_eq!(tree("max(a, b)"), "(max a b)");
    assert_eq!(tree("pos()"), "(pos )");
    assert_eq!(tree("pi"), "pi");
    assert_eq!(tree("vector(1, 2, 3).y"), "(.y (vector 1 2 3))");
    assert_eq!(tree("true && false"), "(&& true false)");
}

#[test]
fn test_spans_cover_source() {
    let expr = parse_expr("2*mag(U)");
    assert_eq!(expr.span, 0..8);
    let ExprKind::Binary(_, lhs, rhs) = &expr.kind else {
        panic!("expected a binary node");
    };
    assert_eq!(lhs.span, 0..1);
    assert_eq!(rhs.span, 2..8);
}

#[test]
fn test_plugin_call_node() {
    let parsed = parse_source("1 + f(x; y)", &StartSymbol::Default, |n| n == "f")
        .expect("source to parse");
    assert_eq!(
        sexp(&parsed.expr.expect("an expression")),
        "(+ 1 (plugin f \"x; y)\"))"
    );
}

#[test]
fn test_syntax_errors() {
    let err = parse_source("1 +", &StartSymbol::Default, no_plugins).unwrap_err();
    assert!(matches!(err, ExprError::Syntax { .. }), "{:?}", err);

    let err = parse_source("a b", &StartSymbol::Default, no_plugins).unwrap_err();
    assert_eq!(err.span(), Some(2..3));

    let err = parse_source("(1 + 2", &StartSymbol::Default, no_plugins).unwrap_err();
    assert!(matches!(err, ExprError::Syntax { found: None, .. }), "{:?}", err);

    assert!(parse_source("a.foo()", &StartSymbol::Default, no_plugins).is_err());
    assert!(parse_source("", &StartSymbol::Default, no_plugins).is_err());
}

#[test]
fn test_argument_start_symbols() {
    let scalar = FieldType::cell(ValueKind::Scalar);

    let parsed = parse_source(
        "a + 1, rest of (text",
        &StartSymbol::Argument(scalar, Terminator::Comma),
        no_plugins,
    );
    // Unbalanced text after the terminator still has to tokenize, not parse.
    let parsed = parsed.expect("argument to parse");
    assert_eq!(parsed.end, 6);
    assert_eq!(sexp(&parsed.expr.expect("an expression")), "(+ a 1)");

    let parsed = parse_source(
        "max(a, b); c)",
        &StartSymbol::Argument(scalar, Terminator::Comma),
        no_plugins,
    )
    .expect("argument to parse");
    assert_eq!(parsed.end, 10);

    let parsed = parse_source(
        "mag(U))",
        &StartSymbol::Argument(scalar, Terminator::Close),
        no_plugins,
    )
    .expect("argument to parse");
    assert_eq!(parsed.end, 7);

    let err = parse_source(
        "mag(U),",
        &StartSymbol::Argument(scalar, Terminator::Close),
        no_plugins,
    );
    assert!(err.is_err());
}

#[test]
fn test_terminator_only() {
    let parsed = parse_source(" )", &StartSymbol::TerminatorOnly(Terminator::Close), no_plugins)
        .expect("terminator to parse");
    assert_eq!(parsed.expr, None);
    assert_eq!(parsed.end, 2);

    let err = parse_source("x)", &StartSymbol::TerminatorOnly(Terminator::Close), no_plugins);
    assert_eq!(err.map(|p| p.end).unwrap_err().span(), Some(0..1));
}
