use kiln::config::Context;
use kiln::error::Error;
use kiln::expr::Expr;
use serde_json::{json, Value};

fn context(pairs: &[(&str, Value)]) -> Context {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn eval(source: &str, ctx: &Context) -> bool {
    Expr::parse(source).unwrap().test(ctx).unwrap()
}

#[test]
fn test_identifier_truthiness() {
    let ctx = context(&[
        ("yes", json!(true)),
        ("no", json!(false)),
        ("empty", json!("")),
        ("word", json!("x")),
        ("zero", json!(0)),
        ("one", json!(1)),
        ("nothing", json!(null)),
    ]);
    assert!(eval("yes", &ctx));
    assert!(!eval("no", &ctx));
    assert!(!eval("empty", &ctx));
    assert!(eval("word", &ctx));
    assert!(!eval("zero", &ctx));
    assert!(eval("one", &ctx));
    assert!(!eval("nothing", &ctx));
}

#[test]
fn test_boolean_operators() {
    let ctx = context(&[("a", json!(true)), ("b", json!(false))]);
    assert!(eval("a and not b", &ctx));
    assert!(eval("a or b", &ctx));
    assert!(!eval("a and b", &ctx));
    assert!(eval("not b and a", &ctx));
    assert!(eval("b or (a and not b)", &ctx));
}

#[test]
fn test_operator_precedence() {
    // 'and' binds tighter than 'or'
    let ctx = context(&[("a", json!(true)), ("b", json!(false)), ("c", json!(false))]);
    assert!(eval("a or b and c", &ctx));
    assert!(!eval("(a or b) and c", &ctx));
}

#[test]
fn test_equality() {
    let ctx = context(&[("std", json!("17")), ("cpus", json!(4))]);
    assert!(eval("std == \"17\"", &ctx));
    assert!(!eval("std == \"11\"", &ctx));
    assert!(eval("std != \"11\"", &ctx));
    assert!(eval("cpus == 4", &ctx));
}

#[test]
fn test_membership() {
    let ctx = context(&[
        ("path", json!("templates/c/shared/")),
        ("choices", json!(["conan", "vcpkg"])),
    ]);
    assert!(eval("\"/c/\" in path", &ctx));
    assert!(!eval("\"/cpp/\" in path", &ctx));
    assert!(eval("\"conan\" in choices", &ctx));
    assert!(!eval("\"none\" in choices", &ctx));
}

#[test]
fn test_literals() {
    let ctx = Context::new();
    assert!(eval("true", &ctx));
    assert!(!eval("false", &ctx));
    assert!(eval("\"x\"", &ctx));
    assert!(!eval("0", &ctx));
}

#[test]
fn test_unknown_identifier_is_a_render_error() {
    let expr = Expr::parse("missing").unwrap();
    let err = expr.test(&Context::new()).unwrap_err();
    assert!(matches!(err, Error::UnknownKey(_)));
}

#[test]
fn test_malformed_expressions_fail_to_parse() {
    assert!(matches!(Expr::parse(""), Err(Error::TemplateSyntax(_))));
    assert!(matches!(Expr::parse("a and"), Err(Error::TemplateSyntax(_))));
    assert!(matches!(Expr::parse("(a"), Err(Error::TemplateSyntax(_))));
    assert!(matches!(Expr::parse("a ="), Err(Error::TemplateSyntax(_))));
    assert!(matches!(Expr::parse("\"open"), Err(Error::TemplateSyntax(_))));
    assert!(matches!(Expr::parse("a b"), Err(Error::TemplateSyntax(_))));
}
