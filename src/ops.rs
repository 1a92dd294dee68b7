//! The SQL operator set.
//!
//! Every [`Operator`] is a process-wide constant with a rendering symbol and
//! a pure local-evaluation rule over [`TypedValue`]s. Evaluation never
//! mutates its inputs.
//!
//! Derivation keeps the comparison family consistent by construction:
//! `>` is `<` with the operands swapped, `>=` is `<=` swapped, and `<>` is
//! the logical negation of `=`. They are never implemented independently.

use std::cmp::Ordering;

use bigdecimal::{BigDecimal, FromPrimitive, Zero};
use num_bigint::BigInt;
use thiserror::Error;

use crate::interval::IntervalError;
use crate::value::{promote_numeric, SqlKind, TypedValue, Value};

// =============================================================================
// Errors
// =============================================================================

/// Errors from local expression evaluation.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("operator {op} cannot be applied to {left} and {right}")]
    InvalidOperands {
        op: &'static str,
        left: SqlKind,
        right: SqlKind,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{0} is a rendering marker with no evaluation semantics")]
    NotEvaluable(&'static str),

    #[error("cannot evaluate unbound column {0}")]
    UnboundColumn(String),

    #[error("cannot locally evaluate function call {0}")]
    UnsupportedFunction(String),

    #[error("cannot widen a non-finite float to decimal")]
    NonFiniteDecimal,

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

// =============================================================================
// Operators
// =============================================================================

/// A SQL operator: a display symbol plus an evaluation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    // Boolean
    And,
    Or,
    // Comparison
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    // String
    Concat,
    // Ordering markers - rendering only
    Is,
    IsNot,
    Asc,
    Desc,
}

impl Operator {
    /// Rendering symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Concat => "||",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::Asc => "ASC",
            Operator::Desc => "DESC",
        }
    }

    /// Evaluate this operator over two values, with SQL NULL propagation.
    pub fn evaluate(&self, a: &TypedValue, b: &TypedValue) -> Result<TypedValue, EvalError> {
        match self {
            Operator::Plus | Operator::Minus | Operator::Mul | Operator::Div => {
                self.arithmetic(a, b)
            }
            Operator::And | Operator::Or => self.boolean(a, b),
            Operator::Eq => equality(a, b, self.symbol()),
            Operator::Ne => Ok(negate(equality(a, b, self.symbol())?)),
            Operator::Lt => comparison(a, b, self.symbol(), |o| o == Ordering::Less),
            Operator::Lte => comparison(a, b, self.symbol(), |o| o != Ordering::Greater),
            Operator::Gt => Operator::Lt.evaluate(b, a),
            Operator::Gte => Operator::Lte.evaluate(b, a),
            Operator::Concat => concat(a, b),
            Operator::Is | Operator::IsNot | Operator::Asc | Operator::Desc => {
                Err(EvalError::NotEvaluable(self.symbol()))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------

    fn arithmetic(&self, a: &TypedValue, b: &TypedValue) -> Result<TypedValue, EvalError> {
        // Temporal +/- interval delegates to the interval collaborator.
        if matches!(self, Operator::Plus | Operator::Minus)
            && a.kind().is_temporal()
            && *b.kind() == SqlKind::Interval
        {
            return self.temporal(a, b);
        }

        let kind = promote_numeric(a.kind(), b.kind()).ok_or_else(|| self.invalid(a, b))?;
        let (Some(x), Some(y)) = (a.value(), b.value()) else {
            return Ok(TypedValue::null(kind));
        };
        let bad = || self.invalid(a, b);

        let value = match &kind {
            SqlKind::TinyInt => {
                Value::TinyInt(self.int_math(int_of(x).ok_or_else(bad)?, int_of(y).ok_or_else(bad)?)? as i8)
            }
            SqlKind::SmallInt => {
                Value::SmallInt(self.int_math(int_of(x).ok_or_else(bad)?, int_of(y).ok_or_else(bad)?)? as i16)
            }
            SqlKind::Int => {
                Value::Int(self.int_math(int_of(x).ok_or_else(bad)?, int_of(y).ok_or_else(bad)?)? as i32)
            }
            SqlKind::BigInt => {
                Value::BigInt(self.int_math(int_of(x).ok_or_else(bad)?, int_of(y).ok_or_else(bad)?)? as i64)
            }
            SqlKind::BigInteger => Value::BigInteger(
                self.bigint_math(bigint_of(x).ok_or_else(bad)?, bigint_of(y).ok_or_else(bad)?)?,
            ),
            SqlKind::Real => {
                Value::Real(self.float_math(f32_of(x).ok_or_else(bad)? as f64, f32_of(y).ok_or_else(bad)? as f64) as f32)
            }
            SqlKind::Double => {
                Value::Double(self.float_math(f64_of(x).ok_or_else(bad)?, f64_of(y).ok_or_else(bad)?))
            }
            SqlKind::Decimal { .. } => {
                Value::Decimal(self.decimal_math(decimal_of(x)?, decimal_of(y)?)?)
            }
            _ => return Err(bad()),
        };
        Ok(TypedValue::new(kind, Some(value)))
    }

    /// Fixed-width integer math at the promoted width. Computed in i128 and
    /// truncated back, which matches two's-complement native behavior.
    fn int_math(&self, x: i128, y: i128) -> Result<i128, EvalError> {
        Ok(match self {
            Operator::Plus => x + y,
            Operator::Minus => x - y,
            Operator::Mul => x * y,
            Operator::Div => {
                if y == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                x / y
            }
            _ => unreachable!("non-arithmetic operator"),
        })
    }

    fn float_math(&self, x: f64, y: f64) -> f64 {
        match self {
            Operator::Plus => x + y,
            Operator::Minus => x - y,
            Operator::Mul => x * y,
            // Native float semantics: division by zero yields infinity.
            Operator::Div => x / y,
            _ => unreachable!("non-arithmetic operator"),
        }
    }

    fn bigint_math(&self, x: BigInt, y: BigInt) -> Result<BigInt, EvalError> {
        Ok(match self {
            Operator::Plus => x + y,
            Operator::Minus => x - y,
            Operator::Mul => x * y,
            Operator::Div => {
                if y.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                x / y
            }
            _ => unreachable!("non-arithmetic operator"),
        })
    }

    fn decimal_math(&self, x: BigDecimal, y: BigDecimal) -> Result<BigDecimal, EvalError> {
        Ok(match self {
            Operator::Plus => x + y,
            Operator::Minus => x - y,
            Operator::Mul => x * y,
            Operator::Div => {
                if y.is_zero() {
                    return Err(EvalError::DivisionByZero);
                }
                x / y
            }
            _ => unreachable!("non-arithmetic operator"),
        })
    }

    fn temporal(&self, a: &TypedValue, b: &TypedValue) -> Result<TypedValue, EvalError> {
        let (Some(x), Some(Value::Interval(iv))) = (a.value(), b.value()) else {
            return Ok(TypedValue::null(a.kind().clone()));
        };
        let shifted = match self {
            Operator::Plus => iv.add_to(x)?,
            Operator::Minus => iv.subtract_from(x)?,
            _ => unreachable!("non-arithmetic operator"),
        };
        // The interval can promote a DATE to a TIMESTAMP, so take the kind
        // from the shifted payload.
        let kind = shifted.natural_kind();
        Ok(TypedValue::new(kind, Some(shifted)))
    }

    // -------------------------------------------------------------------------
    // Boolean
    // -------------------------------------------------------------------------

    /// AND/OR over two boolean conditions.
    ///
    /// Returns unknown (NULL) whenever either operand is unset, regardless of
    /// the other operand's definite value. This is deliberately not SQL
    /// three-valued logic; see DESIGN.md before relying on it for filtering.
    fn boolean(&self, a: &TypedValue, b: &TypedValue) -> Result<TypedValue, EvalError> {
        if *a.kind() != SqlKind::Bool || *b.kind() != SqlKind::Bool {
            return Err(self.invalid(a, b));
        }
        let (Some(Value::Bool(x)), Some(Value::Bool(y))) = (a.value(), b.value()) else {
            return Ok(TypedValue::null(SqlKind::Bool));
        };
        Ok(TypedValue::from(match self {
            Operator::And => *x && *y,
            Operator::Or => *x || *y,
            _ => unreachable!("non-boolean operator"),
        }))
    }

    fn invalid(&self, a: &TypedValue, b: &TypedValue) -> EvalError {
        EvalError::InvalidOperands {
            op: self.symbol(),
            left: a.kind().clone(),
            right: b.kind().clone(),
        }
    }
}

// =============================================================================
// Comparison
// =============================================================================

fn equality(a: &TypedValue, b: &TypedValue, op: &'static str) -> Result<TypedValue, EvalError> {
    if a.is_null() || b.is_null() {
        return Ok(TypedValue::null(SqlKind::Bool));
    }
    Ok(match compare(a, b, op)? {
        Some(ordering) => TypedValue::from(ordering == Ordering::Equal),
        None => TypedValue::null(SqlKind::Bool),
    })
}

fn comparison(
    a: &TypedValue,
    b: &TypedValue,
    op: &'static str,
    accept: fn(Ordering) -> bool,
) -> Result<TypedValue, EvalError> {
    if a.is_null() || b.is_null() {
        return Ok(TypedValue::null(SqlKind::Bool));
    }
    Ok(match compare(a, b, op)? {
        Some(ordering) => TypedValue::from(accept(ordering)),
        None => TypedValue::null(SqlKind::Bool),
    })
}

fn negate(v: TypedValue) -> TypedValue {
    match v.value() {
        Some(Value::Bool(b)) => TypedValue::from(!b),
        _ => TypedValue::null(SqlKind::Bool),
    }
}

/// Generic ordering over two non-null values.
///
/// Numeric operands are compared on their promoted representation; an
/// incomparable float pair (NaN) yields `None`, which the callers surface as
/// unknown. Non-numeric operands compare within their category only.
fn compare(
    a: &TypedValue,
    b: &TypedValue,
    op: &'static str,
) -> Result<Option<Ordering>, EvalError> {
    let invalid = || EvalError::InvalidOperands {
        op,
        left: a.kind().clone(),
        right: b.kind().clone(),
    };
    let (Some(x), Some(y)) = (a.value(), b.value()) else {
        return Ok(None);
    };

    if let Some(kind) = promote_numeric(a.kind(), b.kind()) {
        return numeric_compare(&kind, x, y, invalid);
    }

    match (x, y) {
        (Value::Bool(p), Value::Bool(q)) => Ok(Some(p.cmp(q))),
        (Value::Text(p), Value::Text(q)) => Ok(Some(p.cmp(q))),
        (Value::Bytes(p), Value::Bytes(q)) => Ok(Some(p.cmp(q))),
        (Value::Date(p), Value::Date(q)) => Ok(Some(p.cmp(q))),
        (Value::Time(p), Value::Time(q)) => Ok(Some(p.cmp(q))),
        (Value::Timestamp(p), Value::Timestamp(q)) => Ok(Some(p.cmp(q))),
        // Date/timestamp mixes compare at timestamp granularity.
        (Value::Date(p), Value::Timestamp(q)) => {
            Ok(Some(p.and_time(chrono::NaiveTime::MIN).cmp(q)))
        }
        (Value::Timestamp(p), Value::Date(q)) => {
            Ok(Some(p.cmp(&q.and_time(chrono::NaiveTime::MIN))))
        }
        _ => Err(invalid()),
    }
}

fn numeric_compare(
    kind: &SqlKind,
    x: &Value,
    y: &Value,
    invalid: impl Fn() -> EvalError,
) -> Result<Option<Ordering>, EvalError> {
    match kind {
        SqlKind::TinyInt | SqlKind::SmallInt | SqlKind::Int | SqlKind::BigInt => {
            let (p, q) = (int_of(x).ok_or_else(&invalid)?, int_of(y).ok_or_else(&invalid)?);
            Ok(Some(p.cmp(&q)))
        }
        SqlKind::BigInteger => {
            let (p, q) = (
                bigint_of(x).ok_or_else(&invalid)?,
                bigint_of(y).ok_or_else(&invalid)?,
            );
            Ok(Some(p.cmp(&q)))
        }
        SqlKind::Real | SqlKind::Double => {
            let (p, q) = (f64_of(x).ok_or_else(&invalid)?, f64_of(y).ok_or_else(&invalid)?);
            Ok(p.partial_cmp(&q))
        }
        SqlKind::Decimal { .. } => Ok(Some(decimal_of(x)?.cmp(&decimal_of(y)?))),
        _ => Err(invalid()),
    }
}

// =============================================================================
// Concatenation
// =============================================================================

fn concat(a: &TypedValue, b: &TypedValue) -> Result<TypedValue, EvalError> {
    if !a.kind().is_text() || !b.kind().is_text() {
        return Err(EvalError::InvalidOperands {
            op: Operator::Concat.symbol(),
            left: a.kind().clone(),
            right: b.kind().clone(),
        });
    }
    let (Some(Value::Text(x)), Some(Value::Text(y))) = (a.value(), b.value()) else {
        return Ok(TypedValue::null(SqlKind::Text));
    };
    Ok(TypedValue::from(format!("{x}{y}")))
}

// =============================================================================
// Payload extraction at the promoted representation
// =============================================================================

fn int_of(v: &Value) -> Option<i128> {
    match v {
        Value::TinyInt(n) => Some(*n as i128),
        Value::SmallInt(n) => Some(*n as i128),
        Value::Int(n) => Some(*n as i128),
        Value::BigInt(n) => Some(*n as i128),
        _ => None,
    }
}

fn bigint_of(v: &Value) -> Option<BigInt> {
    match v {
        Value::BigInteger(n) => Some(n.clone()),
        _ => int_of(v).map(BigInt::from),
    }
}

fn f32_of(v: &Value) -> Option<f32> {
    match v {
        Value::Real(f) => Some(*f),
        _ => int_of(v).map(|n| n as f32),
    }
}

fn f64_of(v: &Value) -> Option<f64> {
    match v {
        Value::Double(f) => Some(*f),
        Value::Real(f) => Some(*f as f64),
        _ => int_of(v).map(|n| n as f64),
    }
}

/// Widen any numeric payload to decimal.
///
/// A `REAL` operand goes through `from_f32`, so the resulting decimal
/// inherits single-precision rounding before the arbitrary-precision
/// operation runs. Preserved behavior - see DESIGN.md.
fn decimal_of(v: &Value) -> Result<BigDecimal, EvalError> {
    match v {
        Value::Decimal(d) => Ok(d.clone()),
        Value::BigInteger(n) => Ok(BigDecimal::from(n.clone())),
        Value::Real(f) => BigDecimal::from_f32(*f).ok_or(EvalError::NonFiniteDecimal),
        Value::Double(f) => BigDecimal::from_f64(*f).ok_or(EvalError::NonFiniteDecimal),
        _ => int_of(v)
            .map(|n| BigDecimal::from(BigInt::from(n)))
            .ok_or(EvalError::NonFiniteDecimal),
    }
}

// =============================================================================
// Tests
// =============================================================================
