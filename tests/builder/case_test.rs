//! CASE builder round-trips: state machine, widening, rendering, and local
//! evaluation.
//!
//! The builder's ordering guarantees are type-level: `end()` before a
//! `then`, `then` before a `when`, or another `when` after `otherwise` do
//! not compile, so there is nothing to assert at runtime for them - the
//! states below only ever exercise the legal orderings.

use prism::case::{case, case_of, enum_value};
use prism::dialect::Dialect;
use prism::expr::{col, lit_bool, Expr, ExprExt};
use prism::value::{SqlKind, TypedValue, Value};

#[test]
fn numeric_branches_widen_to_the_widest_kind() {
    // Branches of SMALLINT and INTEGER with a BIGINT else resolve to BIGINT.
    let expr = case()
        .when(lit_bool(false))
        .then(1i16)
        .when(lit_bool(false))
        .then(2i32)
        .otherwise(3i64)
        .end();

    let Expr::Case(command) = &expr else {
        panic!("expected a CASE node");
    };
    assert_eq!(*command.kind(), SqlKind::BigInt);

    // The unmatched path yields NULL of the resolved kind.
    let searched = case().when(lit_bool(false)).then(1i16).end();
    let got = searched.evaluate().unwrap();
    assert!(got.is_null());
    assert_eq!(*got.kind(), SqlKind::SmallInt);
}

#[test]
fn text_and_enum_branches_resolve_to_text() {
    let expr = case()
        .when(lit_bool(true))
        .then(enum_value("mood", "happy"))
        .otherwise("unknown")
        .end();

    let Expr::Case(command) = &expr else {
        panic!("expected a CASE node");
    };
    assert_eq!(*command.kind(), SqlKind::Text);
}

#[test]
fn enum_branches_force_the_text_cast_path_on_postgres() {
    let expr = case()
        .when(col("known").eq(lit_bool(true)))
        .then(enum_value("mood", "happy"))
        .otherwise("unknown")
        .end();

    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(
        compiled.sql,
        "CASE WHEN \"known\" = true THEN CAST(?::\"mood\" AS TEXT) ELSE ? END"
    );
    // Both branch values are bound in order; only the enum one is annotated.
    assert_eq!(compiled.params.len(), 2);
    assert_eq!(compiled.params[0].placeholder, "?::\"mood\"");
    assert_eq!(compiled.params[1].placeholder, "?");

    // The base dialect leaves enum operands alone.
    let ansi = expr.compile(Dialect::Ansi).unwrap();
    assert_eq!(ansi.sql, "CASE WHEN \"known\" = true THEN ? ELSE ? END");
}

#[test]
fn enum_only_case_stays_enumerated_and_uncast() {
    let expr = case()
        .when(lit_bool(true))
        .then(enum_value("mood", "happy"))
        .otherwise(enum_value("mood", "sad"))
        .end();

    let Expr::Case(command) = &expr else {
        panic!("expected a CASE node");
    };
    assert_eq!(
        *command.kind(),
        SqlKind::Enum {
            type_name: "mood".into()
        }
    );

    // No degradation, so no casts - just annotated placeholders.
    let compiled = expr.compile(Dialect::Postgres).unwrap();
    assert_eq!(
        compiled.sql,
        "CASE WHEN true THEN ?::\"mood\" ELSE ?::\"mood\" END"
    );
}

#[test]
fn searched_case_renders_without_a_subject() {
    let expr = case()
        .when(col("age").gte(65))
        .then("senior")
        .when(col("age").gte(18))
        .then("adult")
        .otherwise("minor")
        .end();

    let sql = expr.compile(Dialect::Ansi).unwrap().sql;
    assert_eq!(
        sql,
        "CASE WHEN \"age\" >= 65 THEN ? WHEN \"age\" >= 18 THEN ? ELSE ? END"
    );
}

#[test]
fn simple_case_renders_its_subject() {
    let expr = case_of(col("status")).when("A").then(1i32).end();
    let sql = expr.compile(Dialect::Ansi).unwrap().sql;
    // WHEN comparands are inline literals; THEN values are bound parameters.
    assert_eq!(sql, "CASE \"status\" WHEN 'A' THEN ? END");
}

#[test]
fn searched_evaluation_takes_the_first_true_branch() {
    let expr = case()
        .when(lit_bool(false))
        .then(1i32)
        .when(lit_bool(true))
        .then(2i32)
        .when(lit_bool(true))
        .then(3i32)
        .otherwise(0i32)
        .end();
    assert_eq!(expr.evaluate().unwrap().value(), Some(&Value::Int(2)));
}

#[test]
fn simple_evaluation_skips_null_comparisons() {
    let expr = case_of(Expr::Value(TypedValue::null(SqlKind::Text)))
        .when("A")
        .then(1i32)
        .otherwise(9i32)
        .end();
    // NULL never equals anything, so every branch skips.
    assert_eq!(expr.evaluate().unwrap().value(), Some(&Value::Int(9)));
}

#[test]
fn temporal_branches_widen_to_timestamp() {
    use chrono::{NaiveDate, NaiveDateTime};
    let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let ts: NaiveDateTime = d.and_hms_opt(12, 0, 0).unwrap();

    let expr = case()
        .when(lit_bool(true))
        .then(d)
        .otherwise(ts)
        .end();
    let Expr::Case(command) = &expr else {
        panic!("expected a CASE node");
    };
    assert_eq!(*command.kind(), SqlKind::Timestamp);
}
