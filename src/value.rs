//! Typed SQL scalar values.
//!
//! A [`TypedValue`] carries one SQL scalar: a semantic kind tag, the current
//! value (or unset, which is SQL NULL), a nullability flag, and an optional
//! back-reference to the column it came from. The kind never changes after
//! construction - widening produces a *new* value of a wider kind.
//!
//! This module also owns the two kind-level tables the rest of the engine
//! shares:
//!
//! - [`promote_numeric`] - the arithmetic promotion ladder
//! - [`SqlKind::widen`] - the CASE-branch widening table

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;

use crate::interval::Interval;

// =============================================================================
// Kinds
// =============================================================================

/// Semantic kind of a SQL scalar.
///
/// Every variant must be handled in the widening and promotion tables below -
/// the compiler enforces this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlKind {
    /// Boolean.
    Bool,

    /// 8-bit signed integer (TINYINT).
    TinyInt,

    /// 16-bit signed integer (SMALLINT).
    SmallInt,

    /// 32-bit signed integer (INTEGER).
    Int,

    /// 64-bit signed integer (BIGINT).
    BigInt,

    /// Arbitrary-precision integer.
    BigInteger,

    /// 32-bit floating point (REAL).
    Real,

    /// 64-bit floating point (DOUBLE PRECISION).
    Double,

    /// Fixed-precision decimal: total digits, digits after the point.
    Decimal { precision: u8, scale: u8 },

    /// Fixed-length character string.
    Char(u16),

    /// Variable-length character string.
    Text,

    /// Enumerated text. `type_name` names the backing SQL type, which some
    /// dialects need spelled out at parameter-binding time.
    Enum { type_name: String },

    /// Binary data (BLOB, BYTEA).
    Binary,

    /// Date without time.
    Date,

    /// Time without date.
    Time,

    /// Timestamp without timezone.
    Timestamp,

    /// Interval of (amount, unit) components.
    Interval,
}

impl SqlKind {
    /// Returns true if this is a numeric kind.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlKind::TinyInt
                | SqlKind::SmallInt
                | SqlKind::Int
                | SqlKind::BigInt
                | SqlKind::BigInteger
                | SqlKind::Real
                | SqlKind::Double
                | SqlKind::Decimal { .. }
        )
    }

    /// Returns true if this is an exact integer kind (fixed width or
    /// arbitrary precision).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            SqlKind::TinyInt
                | SqlKind::SmallInt
                | SqlKind::Int
                | SqlKind::BigInt
                | SqlKind::BigInteger
        )
    }

    /// Returns true if this is an approximate (floating point) kind.
    pub fn is_approximate(&self) -> bool {
        matches!(self, SqlKind::Real | SqlKind::Double)
    }

    /// Returns true if this is a text kind (fixed, variable, or enumerated).
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            SqlKind::Char(_) | SqlKind::Text | SqlKind::Enum { .. }
        )
    }

    /// Returns true if this is a temporal kind.
    pub fn is_temporal(&self) -> bool {
        matches!(self, SqlKind::Date | SqlKind::Time | SqlKind::Timestamp)
    }

    /// Compute the narrowest kind that both `self` and `other` widen to.
    ///
    /// Numeric pairs follow the arithmetic promotion ladder. Fixed-text pairs
    /// widen to the widest fixed length that fits both; any variable-text
    /// operand pulls the result to `Text`. Equal enumerated types stay
    /// enumerated; an enum mixed with plain text degrades to the text side.
    /// Temporal mixes widen to `Timestamp`. Cross-category pairs have no
    /// common kind and return `None`.
    pub fn widen(&self, other: &SqlKind) -> Option<SqlKind> {
        use SqlKind::*;

        if self == other {
            return Some(self.clone());
        }
        if self.is_numeric() && other.is_numeric() {
            return promote_numeric(self, other);
        }
        match (self, other) {
            (Char(a), Char(b)) => Some(Char(*a.max(b))),
            (Char(_), Text) | (Text, Char(_)) => Some(Text),
            (Enum { .. }, Text) | (Text, Enum { .. }) => Some(Text),
            (Enum { .. }, Char(n)) | (Char(n), Enum { .. }) => Some(Char(*n)),
            // Differing enum types have no common enum; fall back to text.
            (Enum { .. }, Enum { .. }) => Some(Text),
            (a, b) if a.is_temporal() && b.is_temporal() => Some(Timestamp),
            _ => None,
        }
    }
}

impl fmt::Display for SqlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlKind::Bool => write!(f, "BOOLEAN"),
            SqlKind::TinyInt => write!(f, "TINYINT"),
            SqlKind::SmallInt => write!(f, "SMALLINT"),
            SqlKind::Int => write!(f, "INTEGER"),
            SqlKind::BigInt => write!(f, "BIGINT"),
            SqlKind::BigInteger => write!(f, "BIGINTEGER"),
            SqlKind::Real => write!(f, "REAL"),
            SqlKind::Double => write!(f, "DOUBLE PRECISION"),
            SqlKind::Decimal { precision, scale } => {
                write!(f, "DECIMAL({}, {})", precision, scale)
            }
            SqlKind::Char(n) => write!(f, "CHAR({})", n),
            SqlKind::Text => write!(f, "TEXT"),
            SqlKind::Enum { type_name } => write!(f, "ENUM({})", type_name),
            SqlKind::Binary => write!(f, "BINARY"),
            SqlKind::Date => write!(f, "DATE"),
            SqlKind::Time => write!(f, "TIME"),
            SqlKind::Timestamp => write!(f, "TIMESTAMP"),
            SqlKind::Interval => write!(f, "INTERVAL"),
        }
    }
}

// =============================================================================
// Numeric promotion ladder
// =============================================================================

/// Select the kind two numeric operands promote to for arithmetic.
///
/// In order: both small integers stay in small-integer math; then 32-bit,
/// then 64-bit; an arbitrary-precision integer operand promotes both sides
/// to arbitrary-precision integer math; an approximate operand alongside an
/// arbitrary-precision kind promotes both to decimal; `REAL` alongside
/// `DOUBLE` (or a `DOUBLE` alongside integer kinds) promotes to double; any
/// decimal operand promotes to decimal.
///
/// Returns `None` when either kind is not numeric.
pub fn promote_numeric(a: &SqlKind, b: &SqlKind) -> Option<SqlKind> {
    use SqlKind::*;

    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    Some(match (a, b) {
        (Decimal { .. }, _) | (_, Decimal { .. }) => merge_decimal(a, b),
        (Real | Double, BigInteger) | (BigInteger, Real | Double) => default_decimal(),
        (BigInteger, _) | (_, BigInteger) => BigInteger,
        (Double, _) | (_, Double) => Double,
        (Real, _) | (_, Real) => Real,
        (BigInt, _) | (_, BigInt) => BigInt,
        (Int, _) | (_, Int) => Int,
        (SmallInt, _) | (_, SmallInt) => SmallInt,
        (TinyInt, TinyInt) => TinyInt,
        _ => return None,
    })
}

/// Decimal kind for results whose precision is not driven by an operand.
fn default_decimal() -> SqlKind {
    SqlKind::Decimal {
        precision: 38,
        scale: 18,
    }
}

fn merge_decimal(a: &SqlKind, b: &SqlKind) -> SqlKind {
    use SqlKind::Decimal;
    match (a, b) {
        (
            Decimal {
                precision: p1,
                scale: s1,
            },
            Decimal {
                precision: p2,
                scale: s2,
            },
        ) => Decimal {
            precision: *p1.max(p2),
            scale: *s1.max(s2),
        },
        (Decimal { precision, scale }, _) | (_, Decimal { precision, scale }) => Decimal {
            precision: (*precision).max(18),
            scale: *scale,
        },
        _ => default_decimal(),
    }
}

// =============================================================================
// Column identity
// =============================================================================

/// Identity of the table/column a value came from.
///
/// Used for diagnostics and placeholder annotation only - a value never owns
/// or outlives its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: &str) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    pub fn qualified(table: &str, column: &str) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(t) => write!(f, "{}.{}", t, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Runtime payload of a [`TypedValue`].
///
/// Text, fixed-length text, and enumerated text all carry their payload as
/// `Text` - the kind tag on the owning value distinguishes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    BigInteger(BigInt),
    Real(f32),
    Double(f64),
    Decimal(BigDecimal),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Interval(Interval),
}

impl Value {
    /// The natural kind of this payload, ignoring any narrowing the owning
    /// value's tag may apply (CHAR length, enum type).
    pub fn natural_kind(&self) -> SqlKind {
        match self {
            Value::Bool(_) => SqlKind::Bool,
            Value::TinyInt(_) => SqlKind::TinyInt,
            Value::SmallInt(_) => SqlKind::SmallInt,
            Value::Int(_) => SqlKind::Int,
            Value::BigInt(_) => SqlKind::BigInt,
            Value::BigInteger(_) => SqlKind::BigInteger,
            Value::Real(_) => SqlKind::Real,
            Value::Double(_) => SqlKind::Double,
            Value::Decimal(d) => decimal_kind(d),
            Value::Text(_) => SqlKind::Text,
            Value::Bytes(_) => SqlKind::Binary,
            Value::Date(_) => SqlKind::Date,
            Value::Time(_) => SqlKind::Time,
            Value::Timestamp(_) => SqlKind::Timestamp,
            Value::Interval(_) => SqlKind::Interval,
        }
    }
}

fn decimal_kind(d: &BigDecimal) -> SqlKind {
    let precision = d.digits().clamp(1, 38) as u8;
    let scale = d.fractional_digit_count().clamp(0, 38) as u8;
    SqlKind::Decimal { precision, scale }
}

// =============================================================================
// TypedValue
// =============================================================================

/// One SQL scalar: kind, current value (or unset), nullability, and the
/// optional owning column.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    kind: SqlKind,
    value: Option<Value>,
    nullable: bool,
    column: Option<ColumnRef>,
}

impl TypedValue {
    pub fn new(kind: SqlKind, value: Option<Value>) -> Self {
        Self {
            kind,
            value,
            nullable: true,
            column: None,
        }
    }

    /// An unset (SQL NULL) value of the given kind.
    pub fn null(kind: SqlKind) -> Self {
        Self::new(kind, None)
    }

    /// A fixed-length text value.
    pub fn char_text(s: &str, len: u16) -> Self {
        Self::new(SqlKind::Char(len), Some(Value::Text(s.into())))
    }

    /// An enumerated-text value. `type_name` names the backing SQL type.
    pub fn enum_text(type_name: &str, variant: &str) -> Self {
        Self::new(
            SqlKind::Enum {
                type_name: type_name.into(),
            },
            Some(Value::Text(variant.into())),
        )
    }

    pub fn kind(&self) -> &SqlKind {
        &self.kind
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn column(&self) -> Option<&ColumnRef> {
        self.column.as_ref()
    }

    /// Mark this value as non-nullable.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Attach the owning column's identity.
    pub fn for_column(mut self, column: ColumnRef) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => write!(f, "NULL ({})", self.kind),
            Some(v) => write!(f, "{:?} ({})", v, self.kind),
        }
    }
}

// =============================================================================
// Wrap constructors
// =============================================================================

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        Self::new(SqlKind::Bool, Some(Value::Bool(v)))
    }
}

impl From<i8> for TypedValue {
    fn from(v: i8) -> Self {
        Self::new(SqlKind::TinyInt, Some(Value::TinyInt(v)))
    }
}

impl From<i16> for TypedValue {
    fn from(v: i16) -> Self {
        Self::new(SqlKind::SmallInt, Some(Value::SmallInt(v)))
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        Self::new(SqlKind::Int, Some(Value::Int(v)))
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        Self::new(SqlKind::BigInt, Some(Value::BigInt(v)))
    }
}

impl From<BigInt> for TypedValue {
    fn from(v: BigInt) -> Self {
        Self::new(SqlKind::BigInteger, Some(Value::BigInteger(v)))
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        Self::new(SqlKind::Real, Some(Value::Real(v)))
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        Self::new(SqlKind::Double, Some(Value::Double(v)))
    }
}

impl From<BigDecimal> for TypedValue {
    fn from(v: BigDecimal) -> Self {
        Self::new(decimal_kind(&v), Some(Value::Decimal(v)))
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        Self::new(SqlKind::Text, Some(Value::Text(v.into())))
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        Self::new(SqlKind::Text, Some(Value::Text(v)))
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(v: Vec<u8>) -> Self {
        Self::new(SqlKind::Binary, Some(Value::Bytes(v)))
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(v: NaiveDate) -> Self {
        Self::new(SqlKind::Date, Some(Value::Date(v)))
    }
}

impl From<NaiveTime> for TypedValue {
    fn from(v: NaiveTime) -> Self {
        Self::new(SqlKind::Time, Some(Value::Time(v)))
    }
}

impl From<NaiveDateTime> for TypedValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::new(SqlKind::Timestamp, Some(Value::Timestamp(v)))
    }
}

impl From<Interval> for TypedValue {
    fn from(v: Interval) -> Self {
        Self::new(SqlKind::Interval, Some(Value::Interval(v)))
    }
}

// =============================================================================
// Tests
// =============================================================================
