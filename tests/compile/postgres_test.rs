//! Postgres override behaviors: enum casting, placeholder annotation,
//! function lowering, and exact-numeric cast insertion.

use prism::dialect::Dialect;
use prism::expr::{bind, col, func, lit_float, lit_int, lit_str, Expr, ExprExt};
use prism::value::TypedValue;

fn happy() -> Expr {
    bind(TypedValue::enum_text("mood", "happy"))
}

#[test]
fn enum_compared_against_text_gets_a_cast() {
    let expr = happy().eq(lit_str("happy"));
    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(compiled.sql, "CAST(?::\"mood\" AS TEXT) = 'happy'");

    // The base dialect needs neither the cast nor the annotation.
    let ansi = expr.compile(Dialect::Ansi).unwrap();
    assert_eq!(ansi.sql, "? = 'happy'");
}

#[test]
fn text_on_the_left_casts_the_enum_on_the_right() {
    let expr = lit_str("happy").ne(happy());
    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(compiled.sql, "'happy' <> CAST(?::\"mood\" AS TEXT)");
}

#[test]
fn enum_concatenated_with_text_is_cast_inside_the_lowered_call() {
    let expr = happy().concat(lit_str("!"));
    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(
        compiled.sql,
        "CONCAT(CAST(?::\"mood\" AS TEXT), '!')"
    );
}

#[test]
fn enum_compared_against_enum_needs_no_cast() {
    let expr = happy().eq(bind(TypedValue::enum_text("mood", "sad")));
    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(compiled.sql, "?::\"mood\" = ?::\"mood\"");
}

#[test]
fn enum_placeholders_carry_the_backing_type_annotation() {
    let expr = col("mood").eq(happy());
    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(compiled.sql, "\"mood\" = ?::\"mood\"");
    assert_eq!(compiled.params.len(), 1);
    assert_eq!(compiled.params[0].placeholder, "?::\"mood\"");

    // Plain placeholders stay unannotated.
    let plain = col("age").eq(bind(TypedValue::from(30i32)));
    let compiled = plain.compile(Dialect::Postgres).unwrap();
    assert_eq!(compiled.sql, "\"age\" = ?");
    assert_eq!(compiled.params[0].placeholder, "?");
}

#[test]
fn round_drops_a_zero_scale() {
    let expr = func("round", vec![col("price"), lit_int(0)]);
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "ROUND(\"price\")"
    );
    // The base rule keeps the argument.
    assert_eq!(
        expr.compile(Dialect::Ansi).unwrap().sql,
        "ROUND(\"price\", 0)"
    );
}

#[test]
fn round_casts_approximate_arguments_to_exact_numeric() {
    let expr = func("round", vec![lit_float(2.5), lit_int(2)]);
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "ROUND(CAST(2.5 AS NUMERIC), 2)"
    );
    assert_eq!(expr.compile(Dialect::Ansi).unwrap().sql, "ROUND(2.5, 2)");

    // Both overrides can combine.
    let expr = func("round", vec![lit_float(2.5), lit_int(0)]);
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "ROUND(CAST(2.5 AS NUMERIC))"
    );
}

#[test]
fn round_with_exact_arguments_uses_the_base_rule() {
    let expr = func("round", vec![col("price"), lit_int(2)]);
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "ROUND(\"price\", 2)"
    );
}

#[test]
fn modulus_routes_to_the_installed_helper() {
    let expr = func("mod", vec![col("n"), lit_int(3)]);
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "TRUNC_MOD(\"n\", 3)"
    );
    assert_eq!(expr.compile(Dialect::Ansi).unwrap().sql, "MOD(\"n\", 3)");
}
