//! Operator evaluation properties: promotion ladder selection, comparison
//! derivation invariants, NULL propagation, and interval delegation.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use num_bigint::BigInt;
use prism::interval::{Interval, IntervalUnit};
use prism::ops::{EvalError, Operator};
use prism::value::{SqlKind, TypedValue, Value};

#[test]
fn promotion_ladder_selects_specified_kinds() {
    let cases: Vec<(TypedValue, TypedValue, SqlKind)> = vec![
        (3i8.into(), 4i8.into(), SqlKind::TinyInt),
        (3i8.into(), 4000i16.into(), SqlKind::SmallInt),
        (3i16.into(), 4i32.into(), SqlKind::Int),
        (3i32.into(), 4i64.into(), SqlKind::BigInt),
        (3i64.into(), BigInt::from(4).into(), SqlKind::BigInteger),
        (3i32.into(), 4.0f32.into(), SqlKind::Real),
        (3.0f32.into(), 4.0f64.into(), SqlKind::Double),
        (3i64.into(), 4.0f64.into(), SqlKind::Double),
    ];
    for op in [Operator::Plus, Operator::Minus, Operator::Mul, Operator::Div] {
        for (a, b, expected) in &cases {
            let got = op.evaluate(a, b).unwrap();
            assert_eq!(
                got.kind(),
                expected,
                "{} over {} and {}",
                op.symbol(),
                a.kind(),
                b.kind()
            );
        }
    }
}

#[test]
fn small_integer_addition_matches_native_math() {
    // TINYINT(3) + SMALLINT(4000) computes at small-integer width.
    let got = Operator::Plus
        .evaluate(&TypedValue::from(3i8), &TypedValue::from(4000i16))
        .unwrap();
    assert_eq!(got.value(), Some(&Value::SmallInt(4003)));
}

#[test]
fn approximate_beside_arbitrary_precision_forces_decimal() {
    let got = Operator::Plus
        .evaluate(
            &TypedValue::from(1.5f64),
            &TypedValue::from(BigInt::from(2)),
        )
        .unwrap();
    assert!(matches!(got.kind(), SqlKind::Decimal { .. }));
    assert_eq!(
        got.value(),
        Some(&Value::Decimal("3.5".parse::<BigDecimal>().unwrap()))
    );
}

#[test]
fn decimal_arithmetic_is_exact() {
    let a = TypedValue::from("0.1".parse::<BigDecimal>().unwrap());
    let b = TypedValue::from("0.2".parse::<BigDecimal>().unwrap());
    let got = Operator::Plus.evaluate(&a, &b).unwrap();
    assert_eq!(
        got.value(),
        Some(&Value::Decimal("0.3".parse::<BigDecimal>().unwrap()))
    );
}

#[test]
fn division_by_zero_is_a_domain_error_for_exact_kinds() {
    let exact_zero_pairs: Vec<(TypedValue, TypedValue)> = vec![
        (6i32.into(), 0i32.into()),
        (BigInt::from(6).into(), BigInt::from(0).into()),
        (
            "6".parse::<BigDecimal>().unwrap().into(),
            "0".parse::<BigDecimal>().unwrap().into(),
        ),
    ];
    for (a, b) in exact_zero_pairs {
        assert!(matches!(
            Operator::Div.evaluate(&a, &b),
            Err(EvalError::DivisionByZero)
        ));
    }
}

#[test]
fn comparison_derivation_invariants() {
    let samples: Vec<TypedValue> = vec![
        2i32.into(),
        9i64.into(),
        2.5f64.into(),
        TypedValue::null(SqlKind::Int),
    ];
    for a in &samples {
        for b in &samples {
            let gt = Operator::Gt.evaluate(a, b).unwrap();
            let lt_swapped = Operator::Lt.evaluate(b, a).unwrap();
            assert_eq!(gt, lt_swapped);

            let gte = Operator::Gte.evaluate(a, b).unwrap();
            let lte_swapped = Operator::Lte.evaluate(b, a).unwrap();
            assert_eq!(gte, lte_swapped);
        }
    }
}

#[test]
fn ne_is_the_negation_of_eq_including_unset_operands() {
    let a = TypedValue::from(7i32);
    let null = TypedValue::null(SqlKind::Int);

    // Definite values: NE flips EQ.
    let eq = Operator::Eq.evaluate(&a, &a).unwrap();
    let ne = Operator::Ne.evaluate(&a, &a).unwrap();
    assert_eq!(eq.value(), Some(&Value::Bool(true)));
    assert_eq!(ne.value(), Some(&Value::Bool(false)));

    // Both sides unset: EQ is unknown, so NE is unknown - not true.
    assert!(Operator::Eq.evaluate(&null, &null).unwrap().is_null());
    assert!(Operator::Ne.evaluate(&null, &null).unwrap().is_null());
    assert!(Operator::Ne.evaluate(&a, &null).unwrap().is_null());
}

#[test]
fn boolean_connectives_return_unknown_when_either_side_is_unset() {
    let t = TypedValue::from(true);
    let f = TypedValue::from(false);
    let unknown = TypedValue::null(SqlKind::Bool);

    // Not three-valued logic: FALSE AND unknown is unknown, not FALSE.
    assert!(Operator::And.evaluate(&f, &unknown).unwrap().is_null());
    assert!(Operator::And.evaluate(&unknown, &f).unwrap().is_null());
    assert!(Operator::Or.evaluate(&t, &unknown).unwrap().is_null());

    assert_eq!(
        Operator::And.evaluate(&t, &t).unwrap().value(),
        Some(&Value::Bool(true))
    );
    assert_eq!(
        Operator::Or.evaluate(&f, &f).unwrap().value(),
        Some(&Value::Bool(false))
    );
}

#[test]
fn concat_propagates_null_and_joins_left_to_right() {
    let got = Operator::Concat
        .evaluate(&TypedValue::from("ab"), &TypedValue::from("cd"))
        .unwrap();
    assert_eq!(got.value(), Some(&Value::Text("abcd".into())));

    let got = Operator::Concat
        .evaluate(&TypedValue::from("ab"), &TypedValue::null(SqlKind::Text))
        .unwrap();
    assert!(got.is_null());
}

#[test]
fn interval_arithmetic_delegates_to_the_collaborator() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let month = Interval::of(1, IntervalUnit::Month);

    let got = Operator::Plus
        .evaluate(&TypedValue::from(date), &TypedValue::from(month.clone()))
        .unwrap();
    let expected = month.add_to(&Value::Date(date)).unwrap();
    assert_eq!(got.value(), Some(&expected));
    assert_eq!(*got.kind(), SqlKind::Date);

    let got = Operator::Minus
        .evaluate(&TypedValue::from(date), &TypedValue::from(month.clone()))
        .unwrap();
    let expected = month.subtract_from(&Value::Date(date)).unwrap();
    assert_eq!(got.value(), Some(&expected));
}

#[test]
fn ordering_markers_have_no_evaluation_semantics() {
    let a = TypedValue::from(1i32);
    for op in [Operator::Asc, Operator::Desc, Operator::Is, Operator::IsNot] {
        assert!(matches!(
            op.evaluate(&a, &a),
            Err(EvalError::NotEvaluable(_))
        ));
    }
}
