//! PostgreSQL dialect.
//!
//! Postgres treats enumerated types as distinct, non-implicitly-convertible
//! types and cannot infer a parameter's enum type from context, which drives
//! most of the overrides here:
//!
//! - enum operands compared against (or concatenated with) plain text are
//!   wrapped in an explicit cast to text
//! - a CASE whose resolved kind degraded from enum to text routes every
//!   enumerated branch value through the same cast
//! - placeholders bound to enum values carry an inline `::"type"` annotation
//! - one-time session setup installs a truncating modulus and base-2/base-10
//!   logarithm helpers, tolerating "already exists"
//! - concatenation renders as an n-ary `CONCAT(..)` call
//! - `ROUND` casts approximate arguments to exact numeric and drops a zero
//!   scale argument
//! - interval vocabulary expands composite units into base units
//! - binary literals render in BYTEA hex form

use super::{cast_as, default_binary, helpers, operator_token, SqlDialect};
use crate::compile::{CompileContext, CompileError};
use crate::expr::{Expr, Literal};
use crate::interval::IntervalUnit;
use crate::ops::Operator;
use crate::session::{Connection, ConnectionError, SessionError};
use crate::token::Token;
use crate::value::SqlKind;

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        helpers::format_binary_postgres(bytes)
    }

    fn supports_concat_operator(&self) -> bool {
        false
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }

    fn placeholder_annotation(&self, kind: &SqlKind) -> Option<String> {
        match kind {
            SqlKind::Enum { type_name } => {
                Some(format!("::{}", helpers::quote_double(type_name)))
            }
            _ => None,
        }
    }

    fn interval_unit(&self, unit: IntervalUnit) -> (i64, &'static str) {
        match unit {
            IntervalUnit::Week => (7, "DAY"),
            IntervalUnit::Quarter => (3, "MONTH"),
            IntervalUnit::Century => (100, "YEAR"),
            IntervalUnit::Millennium => (1000, "YEAR"),
            other => (1, other.name()),
        }
    }

    fn compile_binary(
        &self,
        op: Operator,
        left: &Expr,
        right: &Expr,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        let cast_left = enum_against_text(left, right);
        let cast_right = enum_against_text(right, left);
        if !(cast_left || cast_right) {
            return default_binary(self, op, left, right, ctx);
        }

        // Enum vs plain text: wrap the enum side in an explicit text cast.
        if op == Operator::Concat {
            ctx.out().push(Token::FunctionName("CONCAT".into()));
            ctx.out().lparen();
            self.compile_operand(left, cast_left, ctx)?;
            ctx.out().comma().space();
            self.compile_operand(right, cast_right, ctx)?;
            ctx.out().rparen();
            return Ok(());
        }
        let Some(token) = operator_token(op) else {
            return Err(CompileError::UnsupportedOperator {
                dialect: self.name(),
                symbol: op.symbol(),
            });
        };
        self.compile_operand(left, cast_left, ctx)?;
        ctx.out().space().push(token);
        ctx.out().space();
        self.compile_operand(right, cast_right, ctx)
    }

    fn compile_case_value(
        &self,
        value: &Expr,
        resolved: &SqlKind,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        // A branch whose CASE degraded from enum to text must be readable as
        // text; enum values are not implicitly convertible.
        let degraded = matches!(resolved, SqlKind::Char(_) | SqlKind::Text)
            && matches!(value.kind(), Some(SqlKind::Enum { .. }));
        if degraded {
            cast_as(self, value, "TEXT", ctx)
        } else {
            self.compile_expr(value, ctx)
        }
    }

    fn compile_function(
        &self,
        name: &str,
        args: &[Expr],
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        // Two-argument ROUND only accepts exact numeric in Postgres; cast
        // approximate inputs, and omit a scale of exactly zero.
        if name.eq_ignore_ascii_case("round") && args.len() == 2 {
            let scale_is_zero = matches!(args[1], Expr::Literal(Literal::Int(0)));
            let needs_cast = args[0]
                .kind()
                .is_some_and(|kind| kind.is_approximate());
            if scale_is_zero || needs_cast {
                ctx.out().push(Token::FunctionName("ROUND".into()));
                ctx.out().lparen();
                if needs_cast {
                    cast_as(self, &args[0], "NUMERIC", ctx)?;
                } else {
                    self.compile_expr(&args[0], ctx)?;
                }
                if !scale_is_zero {
                    ctx.out().comma().space();
                    self.compile_expr(&args[1], ctx)?;
                }
                ctx.out().rparen();
                return Ok(());
            }
        }
        super::default_function(self, name, args, ctx)
    }

    fn register(&self, conn: &mut dyn Connection) -> Result<(), SessionError> {
        for routine in helpers::POSTGRES_SETUP_ROUTINES {
            match conn.execute(routine) {
                Ok(()) => {}
                // Idempotent: a routine installed earlier is not an error.
                Err(ConnectionError::DuplicateObject(_)) => {}
                Err(err) => return Err(SessionError::Setup(err)),
            }
        }
        Ok(())
    }
}

impl Postgres {
    fn compile_operand(
        &self,
        expr: &Expr,
        cast: bool,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        if cast {
            cast_as(self, expr, "TEXT", ctx)
        } else {
            self.compile_expr(expr, ctx)
        }
    }
}

/// True when `expr` is enum-kinded and `other` is plain (fixed or variable)
/// text, i.e. the pairing Postgres refuses to convert implicitly.
fn enum_against_text(expr: &Expr, other: &Expr) -> bool {
    matches!(expr.kind(), Some(SqlKind::Enum { .. }))
        && matches!(other.kind(), Some(SqlKind::Char(_) | SqlKind::Text))
}
