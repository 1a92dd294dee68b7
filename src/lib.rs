//! # Prism
//!
//! A typed SQL expression engine: build immutable expression trees, then
//! compile them to multi-dialect SQL text or evaluate them locally against
//! known values.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Application code (builder APIs)               │
//! │   operators · fluent ExprExt · typestate CASE builder    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [expr]
//! ┌─────────────────────────────────────────────────────────┐
//! │             Expression tree (immutable Expr)             │
//! └─────────────────────────────────────────────────────────┘
//!            │                               │
//!            ▼ [evaluate]                    ▼ [compile]
//! ┌───────────────────────┐   ┌─────────────────────────────┐
//! │ TypedValue            │   │ Dialect compile rules        │
//! │ (local, no database)  │   │ (base + vendor overrides)    │
//! └───────────────────────┘   └─────────────────────────────┘
//!                                            │
//!                                            ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │     SQL text + ordered bound parameters (Compiled)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous, pure computation: a compile or evaluate pass
//! is a plain tree walk on the caller's thread. Trees, operators, and
//! finished CASE commands are immutable and freely shareable; each compile
//! pass owns a fresh [`compile::CompileContext`].
//!
//! ## Example
//!
//! ```ignore
//! use prism::prelude::*;
//!
//! let tier = case()
//!     .when(col("age").gte(lit_int(65))).then("senior")
//!     .when(col("age").gte(lit_int(18))).then("adult")
//!     .otherwise("minor")
//!     .end();
//!
//! let compiled = tier.compile(Dialect::Postgres)?;
//! // CASE WHEN "age" >= 65 THEN ? ... END, with params bound in order
//! ```

pub mod case;
pub mod compile;
pub mod dialect;
pub mod expr;
pub mod interval;
pub mod ops;
pub mod session;
pub mod token;
pub mod value;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::case::{case, case_of, enum_value, CaseOperand, EnumValue};
    pub use crate::compile::{BoundParam, Compiled, CompileContext, CompileError};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::expr::{
        bind, col, func, interval, lit_bool, lit_bytes, lit_float, lit_int, lit_null, lit_str,
        table_col, Expr, ExprExt, Literal,
    };
    pub use crate::interval::{Interval, IntervalUnit};
    pub use crate::ops::{EvalError, Operator};
    pub use crate::session::{Connection, ConnectionError, SessionError};
    pub use crate::value::{ColumnRef, SqlKind, TypedValue, Value};
}
