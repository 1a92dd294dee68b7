//! Expression AST - the core of SQL expression building.
//!
//! An [`Expr`] is an immutable tree built bottom-up by application code.
//! Once the final node exists it is never mutated; it can be shared
//! read-only across any number of passes. A tree supports exactly two
//! operations:
//!
//! - [`Expr::compile`] - render to dialect-specific SQL text plus an ordered
//!   bound-parameter list, via the vendor's compile rules
//! - [`Expr::evaluate`] - walk the tree bottom-up into a [`TypedValue`]
//!   without any compiler or database involved

use crate::case::CaseCommand;
use crate::compile::{CompileContext, Compiled, CompileError};
use crate::dialect::{Dialect, SqlDialect};
use crate::interval::Interval;
use crate::ops::{EvalError, Operator};
use crate::value::{promote_numeric, ColumnRef, SqlKind, TypedValue};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
///
/// Every variant must be handled by the dialect compile rules - the compiler
/// enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column(ColumnRef),

    /// A bound value - rendered as a parameter placeholder
    Value(TypedValue),

    /// Inline literal - rendered directly into the SQL text
    Literal(Literal),

    /// Interval literal
    Interval(Interval),

    /// Aliased sub-expression: expr AS name
    Alias { expr: Box<Expr>, name: String },

    /// Binary operation: left op right
    Binary {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call: name(args...)
    Function { name: String, args: Vec<Expr> },

    /// Finalized CASE expression
    Case(CaseCommand),
}

/// Inline literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Null,
}

impl Expr {
    /// Render this expression for the given dialect.
    ///
    /// Each call obtains a fresh [`CompileContext`]; the tree itself is not
    /// consumed and can be compiled again, for the same or another dialect.
    pub fn compile(&self, dialect: Dialect) -> Result<Compiled, CompileError> {
        let mut ctx = CompileContext::new(dialect);
        dialect.compile_expr(self, &mut ctx)?;
        Ok(ctx.finish())
    }

    /// Evaluate this expression locally, bottom-up.
    ///
    /// Column references carry no value and fail with
    /// [`EvalError::UnboundColumn`]; function calls have no local semantics.
    pub fn evaluate(&self) -> Result<TypedValue, EvalError> {
        match self {
            Expr::Value(v) => Ok(v.clone()),
            Expr::Literal(lit) => Ok(lit.to_value()),
            Expr::Interval(iv) => Ok(TypedValue::from(iv.clone())),
            Expr::Column(c) => Err(EvalError::UnboundColumn(c.to_string())),
            Expr::Alias { expr, .. } => expr.evaluate(),
            Expr::Binary { op, left, right } => {
                op.evaluate(&left.evaluate()?, &right.evaluate()?)
            }
            Expr::Function { name, .. } => Err(EvalError::UnsupportedFunction(name.clone())),
            Expr::Case(case) => case.evaluate(),
        }
    }

    /// Static result-kind inference, where one is known without evaluating.
    ///
    /// Columns and function calls have no statically known kind. The
    /// Postgres rules use this to decide where explicit casts are needed.
    pub fn kind(&self) -> Option<SqlKind> {
        match self {
            Expr::Value(v) => Some(v.kind().clone()),
            Expr::Literal(lit) => lit.kind(),
            Expr::Interval(_) => Some(SqlKind::Interval),
            Expr::Column(_) => None,
            Expr::Alias { expr, .. } => expr.kind(),
            Expr::Binary { op, left, right } => match op {
                Operator::Plus | Operator::Minus | Operator::Mul | Operator::Div => {
                    if right.kind()? == SqlKind::Interval {
                        return left.kind();
                    }
                    promote_numeric(&left.kind()?, &right.kind()?)
                }
                Operator::Concat => Some(SqlKind::Text),
                Operator::Asc | Operator::Desc => None,
                _ => Some(SqlKind::Bool),
            },
            Expr::Function { .. } => None,
            Expr::Case(case) => Some(case.kind().clone()),
        }
    }
}

impl Literal {
    fn to_value(&self) -> TypedValue {
        match self {
            Literal::Int(n) => TypedValue::from(*n),
            Literal::Float(f) => TypedValue::from(*f),
            Literal::Str(s) => TypedValue::from(s.clone()),
            Literal::Bool(b) => TypedValue::from(*b),
            Literal::Bytes(b) => TypedValue::from(b.clone()),
            Literal::Null => TypedValue::null(SqlKind::Text),
        }
    }

    fn kind(&self) -> Option<SqlKind> {
        match self {
            Literal::Int(_) => Some(SqlKind::BigInt),
            Literal::Float(_) => Some(SqlKind::Double),
            Literal::Str(_) => Some(SqlKind::Text),
            Literal::Bool(_) => Some(SqlKind::Bool),
            Literal::Bytes(_) => Some(SqlKind::Binary),
            Literal::Null => None,
        }
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column(ColumnRef::new(name))
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column(ColumnRef::qualified(table, column))
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::Str(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// Create a binary literal.
pub fn lit_bytes(bytes: Vec<u8>) -> Expr {
    Expr::Literal(Literal::Bytes(bytes))
}

/// Create a NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Bind a typed value as a parameter placeholder.
pub fn bind(value: impl Into<TypedValue>) -> Expr {
    Expr::Value(value.into())
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// Create an interval literal.
pub fn interval(iv: Interval) -> Expr {
    Expr::Interval(iv)
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    // Comparison operators
    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Eq, self.into_expr(), other.into())
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Ne, self.into_expr(), other.into())
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Lt, self.into_expr(), other.into())
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Lte, self.into_expr(), other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Gt, self.into_expr(), other.into())
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Gte, self.into_expr(), other.into())
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::And, self.into_expr(), other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Or, self.into_expr(), other.into())
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Plus, self.into_expr(), other.into())
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Minus, self.into_expr(), other.into())
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Mul, self.into_expr(), other.into())
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Div, self.into_expr(), other.into())
    }

    // String operators
    fn concat(self, other: impl Into<Expr>) -> Expr {
        binary(Operator::Concat, self.into_expr(), other.into())
    }

    // NULL checks
    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Expr {
        binary(Operator::Is, self.into_expr(), lit_null())
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Expr {
        binary(Operator::IsNot, self.into_expr(), lit_null())
    }

    /// Alias this expression.
    fn alias(self, name: &str) -> Expr {
        Expr::Alias {
            expr: Box::new(self.into_expr()),
            name: name.into(),
        }
    }
}

fn binary(op: Operator, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::Str(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<TypedValue> for Expr {
    fn from(v: TypedValue) -> Self {
        Expr::Value(v)
    }
}

impl From<Interval> for Expr {
    fn from(iv: Interval) -> Self {
        Expr::Interval(iv)
    }
}

// =============================================================================
// Tests
// =============================================================================
