//! Type-safe CASE/WHEN expression builder.
//!
//! The builder is a chain of move-only states - each call consumes `self`
//! and returns the next state - so only grammatical orderings compile:
//!
//! ```text
//! case()/case_of(x) -> when(..) -> then(..) -> when(..) -> then(..)
//!                                          \-> otherwise(..) -> end()
//!                                           \-> end()
//! ```
//!
//! There is no way to reach `end()` without at least one `then`, to call
//! `then` before `when`, or to add another `when` after `otherwise`.
//!
//! The first `then` fixes the result *category* (boolean, numeric, textual,
//! binary, temporal) as a type parameter; every later branch value must come
//! from the same category, and the running result kind widens branch by
//! branch (SMALLINT then INTEGER then BIGINT resolves to BIGINT; TEXT mixed
//! with an enum degrades to TEXT).
//!
//! # Example
//!
//! ```ignore
//! use prism::case::{case, case_of};
//! use prism::expr::{col, ExprExt};
//!
//! // Searched CASE
//! let tier = case()
//!     .when(col("age").gte(65)).then("senior")
//!     .when(col("age").gte(18)).then("adult")
//!     .otherwise("minor")
//!     .end();
//!
//! // Simple CASE
//! let flag = case_of(col("status")).when("A").then(1i32).end();
//! ```

use std::marker::PhantomData;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_bigint::BigInt;

use crate::expr::Expr;
use crate::ops::{EvalError, Operator};
use crate::value::{SqlKind, TypedValue, Value};

// =============================================================================
// Branch value categories
// =============================================================================

/// Marker for a family of mutually widenable result kinds.
pub trait Category {}

/// Boolean branch values.
pub struct Logical;
/// Numeric branch values - the arithmetic promotion ladder applies.
pub struct Numeric;
/// Text branch values, including fixed-length and enumerated text.
pub struct Textual;
/// Binary branch values.
pub struct Bytes;
/// Date, time, and timestamp branch values.
pub struct Temporal;

impl Category for Logical {}
impl Category for Numeric {}
impl Category for Textual {}
impl Category for Bytes {}
impl Category for Temporal {}

/// A value usable as a CASE branch result, tagged with its category.
///
/// The category is part of the Rust type, which is what lets the builder
/// reject incompatible branch combinations at compile time.
pub trait CaseOperand {
    type Category: Category;

    fn into_value(self) -> TypedValue;
}

macro_rules! case_operand {
    ($($ty:ty => $cat:ident),* $(,)?) => {
        $(impl CaseOperand for $ty {
            type Category = $cat;

            fn into_value(self) -> TypedValue {
                TypedValue::from(self)
            }
        })*
    };
}

case_operand! {
    bool => Logical,
    i8 => Numeric,
    i16 => Numeric,
    i32 => Numeric,
    i64 => Numeric,
    f32 => Numeric,
    f64 => Numeric,
    BigInt => Numeric,
    BigDecimal => Numeric,
    &str => Textual,
    String => Textual,
    Vec<u8> => Bytes,
    NaiveDate => Temporal,
    NaiveTime => Temporal,
    NaiveDateTime => Temporal,
}

/// An enumerated-text branch value. Lives in the textual category, so a CASE
/// mixing enum and plain text branches resolves to text and routes the enum
/// operands through the vendor's text-cast path at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
}

/// Shorthand constructor for an [`EnumValue`].
pub fn enum_value(type_name: &str, variant: &str) -> EnumValue {
    EnumValue {
        type_name: type_name.into(),
        variant: variant.into(),
    }
}

impl CaseOperand for EnumValue {
    type Category = Textual;

    fn into_value(self) -> TypedValue {
        TypedValue::enum_text(&self.type_name, &self.variant)
    }
}

// =============================================================================
// Builder states
// =============================================================================

/// Accumulated branches, shared by every builder state.
#[derive(Debug, Clone)]
struct CaseParts {
    subject: Option<Expr>,
    branches: Vec<(Expr, Expr)>,
}

/// Start a searched CASE: each `when` takes a boolean condition.
pub fn case() -> CaseStart {
    CaseStart {
        parts: CaseParts {
            subject: None,
            branches: Vec::new(),
        },
    }
}

/// Start a simple CASE: each `when` takes a value compared for equality
/// against `subject`.
pub fn case_of(subject: impl Into<Expr>) -> CaseStart {
    CaseStart {
        parts: CaseParts {
            subject: Some(subject.into()),
            branches: Vec::new(),
        },
    }
}

/// Initial state - only `when` is available.
#[must_use = "a CASE builder does nothing until end() is called"]
pub struct CaseStart {
    parts: CaseParts,
}

impl CaseStart {
    pub fn when(self, when: impl Into<Expr>) -> CaseWhen {
        CaseWhen {
            parts: self.parts,
            pending: when.into(),
        }
    }
}

/// A WHEN waiting for its THEN. The first `then` fixes the result category.
#[must_use = "a CASE builder does nothing until end() is called"]
pub struct CaseWhen {
    parts: CaseParts,
    pending: Expr,
}

impl CaseWhen {
    pub fn then<V: CaseOperand>(mut self, value: V) -> CaseThen<V::Category> {
        let value = value.into_value();
        let kind = value.kind().clone();
        self.parts.branches.push((self.pending, Expr::Value(value)));
        CaseThen {
            parts: self.parts,
            kind,
            _category: PhantomData,
        }
    }
}

/// At least one complete branch exists; the result category is `C` and the
/// running result kind has been widened over every branch so far.
#[must_use = "a CASE builder does nothing until end() is called"]
pub struct CaseThen<C: Category> {
    parts: CaseParts,
    kind: SqlKind,
    _category: PhantomData<C>,
}

impl<C: Category> CaseThen<C> {
    /// Add another branch.
    pub fn when(self, when: impl Into<Expr>) -> CaseWhenMore<C> {
        CaseWhenMore {
            parts: self.parts,
            kind: self.kind,
            pending: when.into(),
            _category: PhantomData,
        }
    }

    /// Set the ELSE value. No further branches can be added.
    pub fn otherwise<V: CaseOperand<Category = C>>(mut self, value: V) -> CaseElse<C> {
        let value = value.into_value();
        self.kind = widened(&self.kind, value.kind());
        CaseElse {
            parts: self.parts,
            kind: self.kind,
            otherwise: Expr::Value(value),
            _category: PhantomData,
        }
    }

    /// Finish without an ELSE; unmatched inputs yield NULL.
    pub fn end(self) -> Expr {
        normalize(self.parts, self.kind, None)
    }
}

/// A subsequent WHEN waiting for its THEN, category already fixed.
#[must_use = "a CASE builder does nothing until end() is called"]
pub struct CaseWhenMore<C: Category> {
    parts: CaseParts,
    kind: SqlKind,
    pending: Expr,
    _category: PhantomData<C>,
}

impl<C: Category> CaseWhenMore<C> {
    pub fn then<V: CaseOperand<Category = C>>(mut self, value: V) -> CaseThen<C> {
        let value = value.into_value();
        self.kind = widened(&self.kind, value.kind());
        self.parts.branches.push((self.pending, Expr::Value(value)));
        CaseThen {
            parts: self.parts,
            kind: self.kind,
            _category: PhantomData,
        }
    }
}

/// Terminal-but-one state: the ELSE is set, only `end` remains.
#[must_use = "a CASE builder does nothing until end() is called"]
pub struct CaseElse<C: Category> {
    parts: CaseParts,
    kind: SqlKind,
    otherwise: Expr,
    _category: PhantomData<C>,
}

impl<C: Category> CaseElse<C> {
    pub fn end(self) -> Expr {
        normalize(self.parts, self.kind, Some(self.otherwise))
    }
}

// Widening is total within a category, so the typed builder never observes
// the incompatible (None) case.
fn widened(running: &SqlKind, branch: &SqlKind) -> SqlKind {
    running.widen(branch).unwrap_or_else(|| running.clone())
}

/// Collapse the consumed builder chain into one immutable command.
fn normalize(parts: CaseParts, kind: SqlKind, otherwise: Option<Expr>) -> Expr {
    Expr::Case(CaseCommand {
        subject: parts.subject.map(Box::new),
        branches: parts.branches,
        otherwise: otherwise.map(Box::new),
        kind,
    })
}

// =============================================================================
// CaseCommand
// =============================================================================

/// The finalized, immutable CASE: ordered branch pairs, the optional ELSE,
/// and the widened result kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseCommand {
    subject: Option<Box<Expr>>,
    branches: Vec<(Expr, Expr)>,
    otherwise: Option<Box<Expr>>,
    kind: SqlKind,
}

impl CaseCommand {
    /// The comparison variable of a simple CASE, if any.
    pub fn subject(&self) -> Option<&Expr> {
        self.subject.as_deref()
    }

    /// Ordered (condition-or-comparand, value) branch pairs.
    pub fn branches(&self) -> &[(Expr, Expr)] {
        &self.branches
    }

    pub fn otherwise(&self) -> Option<&Expr> {
        self.otherwise.as_deref()
    }

    /// The widened result kind.
    pub fn kind(&self) -> &SqlKind {
        &self.kind
    }

    /// First matching branch wins; NULL conditions and NULL comparisons skip
    /// their branch. Falls through to the ELSE value, else NULL.
    pub(crate) fn evaluate(&self) -> Result<TypedValue, EvalError> {
        match &self.subject {
            Some(subject) => {
                let subject = subject.evaluate()?;
                for (comparand, value) in &self.branches {
                    let matched = Operator::Eq.evaluate(&subject, &comparand.evaluate()?)?;
                    if is_true(&matched) {
                        return value.evaluate();
                    }
                }
            }
            None => {
                for (condition, value) in &self.branches {
                    if is_true(&condition.evaluate()?) {
                        return value.evaluate();
                    }
                }
            }
        }
        match &self.otherwise {
            Some(value) => value.evaluate(),
            None => Ok(TypedValue::null(self.kind.clone())),
        }
    }
}

fn is_true(v: &TypedValue) -> bool {
    matches!(v.value(), Some(Value::Bool(true)))
}

// =============================================================================
// Tests
// =============================================================================
