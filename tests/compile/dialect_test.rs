//! Cross-dialect rendering: the same tree compiled with different vendors
//! must differ exactly at the documented override points and nowhere else.

use prism::compile::CompileError;
use prism::dialect::Dialect;
use prism::expr::{bind, col, func, interval, lit_bool, lit_bytes, lit_int, lit_str, Expr, ExprExt};
use prism::interval::{Interval, IntervalUnit};
use prism::ops::Operator;
use prism::value::TypedValue;

#[test]
fn neutral_trees_render_identically_on_ansi_and_postgres() {
    // Nothing here touches an override point: same quoting, same booleans,
    // same operators.
    let expr = col("age")
        .gte(lit_int(18))
        .and(col("active").eq(lit_bool(true)));

    let ansi = expr.compile(Dialect::Ansi).unwrap().sql;
    let postgres = expr.compile(Dialect::Postgres).unwrap().sql;
    assert_eq!(ansi, "\"age\" >= 18 AND \"active\" = true");
    assert_eq!(ansi, postgres);
}

#[test]
fn mysql_differs_only_in_quoting_and_booleans() {
    let expr = col("active").eq(lit_bool(true));
    assert_eq!(
        expr.compile(Dialect::Ansi).unwrap().sql,
        "\"active\" = true"
    );
    assert_eq!(expr.compile(Dialect::MySql).unwrap().sql, "`active` = 1");
}

#[test]
fn concat_lowering_is_an_override_point() {
    let expr = col("first").concat(col("last")).concat(lit_str("!"));

    // Base rule: infix operator chain.
    assert_eq!(
        expr.compile(Dialect::Ansi).unwrap().sql,
        "\"first\" || \"last\" || '!'"
    );
    // Vendors without the infix operator get one flattened n-ary call.
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "CONCAT(\"first\", \"last\", '!')"
    );
    assert_eq!(
        expr.compile(Dialect::MySql).unwrap().sql,
        "CONCAT(`first`, `last`, '!')"
    );
}

#[test]
fn function_remapping_is_an_override_point() {
    let expr = func("nvl", vec![col("nick"), lit_str("anon")]);
    assert_eq!(
        expr.compile(Dialect::Ansi).unwrap().sql,
        "NVL(\"nick\", 'anon')"
    );
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "COALESCE(\"nick\", 'anon')"
    );
    assert_eq!(
        expr.compile(Dialect::MySql).unwrap().sql,
        "IFNULL(`nick`, 'anon')"
    );
}

#[test]
fn interval_vocabulary_is_an_override_point() {
    let expr = interval(Interval::of(1, IntervalUnit::Quarter).and(15, IntervalUnit::Day));
    assert_eq!(
        expr.compile(Dialect::Ansi).unwrap().sql,
        "INTERVAL '1 QUARTER 15 DAY'"
    );
    // Composite units expand into base units.
    assert_eq!(
        expr.compile(Dialect::Postgres).unwrap().sql,
        "INTERVAL '3 MONTH 15 DAY'"
    );
}

#[test]
fn binary_literals_are_an_override_point() {
    let expr = lit_bytes(vec![0xDE, 0xAD]);
    assert_eq!(expr.compile(Dialect::Ansi).unwrap().sql, "X'DEAD'");
    assert_eq!(expr.compile(Dialect::Postgres).unwrap().sql, "'\\xdead'");
}

#[test]
fn placeholders_and_params_stay_in_order_across_dialects() {
    let expr = col("a")
        .eq(bind(TypedValue::from(1i32)))
        .and(col("b").eq(bind(TypedValue::from("x"))));

    for dialect in [Dialect::Ansi, Dialect::Postgres, Dialect::MySql] {
        let compiled = expr.compile(dialect).unwrap();
        assert_eq!(compiled.params.len(), 2);
        assert_eq!(compiled.params[0].value, TypedValue::from(1i32));
        assert_eq!(compiled.params[1].value, TypedValue::from("x"));
        assert_eq!(compiled.params[0].placeholder, "?");
    }
}

#[test]
fn unsupported_operators_fail_fast_everywhere() {
    let expr = Expr::Binary {
        op: Operator::Desc,
        left: Box::new(col("a")),
        right: Box::new(col("b")),
    };
    for dialect in [Dialect::Ansi, Dialect::Postgres, Dialect::MySql] {
        let err = expr.compile(dialect).unwrap_err();
        assert!(
            matches!(err, CompileError::UnsupportedOperator { .. }),
            "{dialect} should reject ordering markers in operand position"
        );
    }
}

#[test]
fn aliases_render_with_as() {
    let expr = col("total").mul(lit_int(2)).alias("doubled");
    assert_eq!(
        expr.compile(Dialect::Ansi).unwrap().sql,
        "\"total\" * 2 AS \"doubled\""
    );
    assert_eq!(
        expr.compile(Dialect::MySql).unwrap().sql,
        "`total` * 2 AS `doubled`"
    );
}
