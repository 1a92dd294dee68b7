//! SQL dialect definitions and compile rules.
//!
//! A dialect is a visitor with one rendering rule per expression-node
//! variant. The [`SqlDialect`] trait carries two method families:
//!
//! - *Lexical hooks* - identifier/string quoting, boolean and binary literal
//!   formats, concat capability, function remapping. Applied at token
//!   serialization time.
//! - *Compile rules* - one `compile_*` method per node variant, with
//!   vendor-independent defaults. A vendor overrides only the rules where it
//!   differs; everything else falls back to the base rendering. The default
//!   rules recurse through `self`, so an override applies at every depth of
//!   the tree.
//!
//! Adding a new expression variant means adding one rule here; adding a new
//! vendor means a small struct overriding a handful of methods.

mod ansi;
pub mod helpers;
mod mysql;
mod postgres;

pub use ansi::Ansi;
pub use mysql::MySql;
pub use postgres::Postgres;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::case::CaseCommand;
use crate::compile::{CompileContext, CompileError};
use crate::expr::{Expr, Literal};
use crate::interval::{Interval, IntervalUnit};
use crate::ops::Operator;
use crate::session::{Connection, SessionError};
use crate::token::Token;
use crate::value::{ColumnRef, SqlKind, TypedValue};

// =============================================================================
// SqlDialect trait
// =============================================================================

/// SQL dialect - lexical formatting plus per-node compile rules.
///
/// Implementations are stateless aside from their vendor identity and are
/// safe to share across threads. The default rules follow ANSI SQL.
pub trait SqlDialect: fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Lexical hooks
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal. All dialects use single quotes with `''`
    /// escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Format an inline binary literal.
    fn format_binary(&self, bytes: &[u8]) -> String {
        helpers::format_binary_ansi(bytes)
    }

    /// String concatenation operator.
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// Whether this dialect renders `||` as an infix operator. When false,
    /// the base binary rule lowers concatenation into an n-ary `CONCAT(..)`
    /// function call.
    fn supports_concat_operator(&self) -> bool {
        true
    }

    /// Remap a function name for this dialect. Matched case-insensitively;
    /// `None` keeps the original name.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    /// Inline annotation appended to a parameter placeholder for values of
    /// the given kind (e.g. a cast naming an enum's backing type).
    fn placeholder_annotation(&self, kind: &SqlKind) -> Option<String> {
        let _ = kind;
        None
    }

    /// Interval unit vocabulary: the (multiplier, keyword) this dialect
    /// renders a unit with. Dialects without composite units expand them
    /// into a base unit here.
    fn interval_unit(&self, unit: IntervalUnit) -> (i64, &'static str) {
        (1, unit.name())
    }

    // =========================================================================
    // Compile rules
    // =========================================================================

    /// Dispatch on the expression variant. Rarely overridden - vendors
    /// override the per-variant rules instead.
    fn compile_expr(&self, expr: &Expr, ctx: &mut CompileContext) -> Result<(), CompileError> {
        match expr {
            Expr::Column(column) => self.compile_column(column, ctx),
            Expr::Value(value) => self.compile_value(value, ctx),
            Expr::Literal(literal) => self.compile_literal(literal, ctx),
            Expr::Interval(interval) => self.compile_interval(interval, ctx),
            Expr::Alias { expr, name } => self.compile_alias(expr, name, ctx),
            Expr::Binary { op, left, right } => self.compile_binary(*op, left, right, ctx),
            Expr::Function { name, args } => self.compile_function(name, args, ctx),
            Expr::Case(case) => self.compile_case(case, ctx),
        }
    }

    /// Render a column reference: `"table"."column"`.
    fn compile_column(
        &self,
        column: &ColumnRef,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        if let Some(table) = &column.table {
            ctx.out().push(Token::Ident(table.clone())).push(Token::Dot);
        }
        ctx.out().push(Token::Ident(column.column.clone()));
        Ok(())
    }

    /// Render an inline literal.
    fn compile_literal(
        &self,
        literal: &Literal,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        ctx.out().push(match literal {
            Literal::Int(n) => Token::LitInt(*n),
            Literal::Float(f) => Token::LitFloat(*f),
            Literal::Str(s) => Token::LitString(s.clone()),
            Literal::Bool(b) => Token::LitBool(*b),
            Literal::Bytes(b) => Token::LitBytes(b.clone()),
            Literal::Null => Token::LitNull,
        });
        Ok(())
    }

    /// Render a bound value as a positional placeholder and record the
    /// parameter in order.
    fn compile_value(
        &self,
        value: &TypedValue,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        let annotation = self.placeholder_annotation(value.kind());
        let placeholder = match &annotation {
            Some(a) => format!("?{}", a),
            None => "?".to_string(),
        };
        ctx.out().push(Token::Placeholder { annotation });
        ctx.bind(value.clone(), placeholder);
        Ok(())
    }

    /// Render `expr AS "name"`.
    fn compile_alias(
        &self,
        expr: &Expr,
        name: &str,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compile_expr(expr, ctx)?;
        ctx.out().space().push(Token::As);
        ctx.out().space().push(Token::Ident(name.into()));
        Ok(())
    }

    /// Render `left op right`, or an unsupported-operator error for
    /// rendering markers that cannot appear in operand position.
    fn compile_binary(
        &self,
        op: Operator,
        left: &Expr,
        right: &Expr,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        default_binary(self, op, left, right, ctx)
    }

    /// Render `NAME(arg, arg, ...)`.
    fn compile_function(
        &self,
        name: &str,
        args: &[Expr],
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        default_function(self, name, args, ctx)
    }

    /// Render `CASE <subject?> WHEN .. THEN .. ELSE .. END`.
    fn compile_case(
        &self,
        case: &CaseCommand,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        default_case(self, case, ctx)
    }

    /// Render one CASE branch (THEN/ELSE) value. The hook exists so vendors
    /// can coerce branch values whose kind degraded during widening.
    fn compile_case_value(
        &self,
        value: &Expr,
        resolved: &SqlKind,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        let _ = resolved;
        self.compile_expr(value, ctx)
    }

    /// Render an interval literal: ordered components joined into one
    /// vendor literal, through the unit vocabulary hook.
    fn compile_interval(
        &self,
        interval: &Interval,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        let mut text = String::new();
        for (i, (amount, unit)) in interval.components().iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            let (factor, keyword) = self.interval_unit(*unit);
            text.push_str(&format!("{} {}", amount.saturating_mul(factor), keyword));
        }
        ctx.out().push(Token::Interval);
        ctx.out().space().push(Token::LitString(text));
        Ok(())
    }

    // =========================================================================
    // Session setup
    // =========================================================================

    /// One-time setup against a live connection before first use. The
    /// default is a no-op. Serializing calls per connection is the caller's
    /// responsibility.
    fn register(&self, conn: &mut dyn Connection) -> Result<(), SessionError> {
        let _ = conn;
        Ok(())
    }
}

// =============================================================================
// Base rules
// =============================================================================
//
// Free functions so a vendor override can fall back to the base rendering
// for the cases it does not change.

pub(crate) fn default_binary<D: SqlDialect + ?Sized>(
    dialect: &D,
    op: Operator,
    left: &Expr,
    right: &Expr,
    ctx: &mut CompileContext,
) -> Result<(), CompileError> {
    // Lower || into CONCAT(..) for dialects without the infix operator,
    // flattening nested concat chains into one n-ary call.
    if op == Operator::Concat && !dialect.supports_concat_operator() {
        let mut args = Vec::new();
        flatten_concat(left, &mut args);
        flatten_concat(right, &mut args);
        ctx.out().push(Token::FunctionName("CONCAT".into()));
        ctx.out().lparen();
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                ctx.out().comma().space();
            }
            dialect.compile_expr(arg, ctx)?;
        }
        ctx.out().rparen();
        return Ok(());
    }

    let Some(token) = operator_token(op) else {
        return Err(CompileError::UnsupportedOperator {
            dialect: dialect.name(),
            symbol: op.symbol(),
        });
    };
    dialect.compile_expr(left, ctx)?;
    ctx.out().space().push(token);
    ctx.out().space();
    dialect.compile_expr(right, ctx)
}

pub(crate) fn default_function<D: SqlDialect + ?Sized>(
    dialect: &D,
    name: &str,
    args: &[Expr],
    ctx: &mut CompileContext,
) -> Result<(), CompileError> {
    ctx.out().push(Token::FunctionName(name.into()));
    ctx.out().lparen();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            ctx.out().comma().space();
        }
        dialect.compile_expr(arg, ctx)?;
    }
    ctx.out().rparen();
    Ok(())
}

pub(crate) fn default_case<D: SqlDialect + ?Sized>(
    dialect: &D,
    case: &CaseCommand,
    ctx: &mut CompileContext,
) -> Result<(), CompileError> {
    ctx.out().push(Token::Case);
    if let Some(subject) = case.subject() {
        ctx.out().space();
        dialect.compile_expr(subject, ctx)?;
    }
    for (when, then) in case.branches() {
        ctx.out().space().push(Token::When);
        ctx.out().space();
        dialect.compile_expr(when, ctx)?;
        ctx.out().space().push(Token::Then);
        ctx.out().space();
        dialect.compile_case_value(then, case.kind(), ctx)?;
    }
    if let Some(value) = case.otherwise() {
        ctx.out().space().push(Token::Else);
        ctx.out().space();
        dialect.compile_case_value(value, case.kind(), ctx)?;
    }
    ctx.out().space().push(Token::End);
    Ok(())
}

/// Wrap an operand in an explicit cast: `CAST(expr AS TYPE)`.
pub(crate) fn cast_as<D: SqlDialect + ?Sized>(
    dialect: &D,
    expr: &Expr,
    sql_type: &'static str,
    ctx: &mut CompileContext,
) -> Result<(), CompileError> {
    ctx.out().push(Token::Cast).push(Token::LParen);
    dialect.compile_expr(expr, ctx)?;
    ctx.out().space().push(Token::As);
    ctx.out().space().push(Token::Raw(sql_type.into()));
    ctx.out().rparen();
    Ok(())
}

/// Token for an operator that may appear in operand position. `ASC`/`DESC`
/// are ordering markers only and have no infix rendering.
pub(crate) fn operator_token(op: Operator) -> Option<Token> {
    Some(match op {
        Operator::Eq => Token::Eq,
        Operator::Ne => Token::Ne,
        Operator::Lt => Token::Lt,
        Operator::Gt => Token::Gt,
        Operator::Lte => Token::Lte,
        Operator::Gte => Token::Gte,
        Operator::Plus => Token::Plus,
        Operator::Minus => Token::Minus,
        Operator::Mul => Token::Mul,
        Operator::Div => Token::Div,
        Operator::And => Token::And,
        Operator::Or => Token::Or,
        Operator::Concat => Token::Concat,
        Operator::Is => Token::Is,
        Operator::IsNot => Token::IsNot,
        Operator::Asc | Operator::Desc => return None,
    })
}

fn flatten_concat<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
    if let Expr::Binary {
        op: Operator::Concat,
        left,
        right,
    } = expr
    {
        flatten_concat(left, out);
        flatten_concat(right, out);
    } else {
        out.push(expr);
    }
}

// =============================================================================
// Dialect registry
// =============================================================================

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Ansi,
    Postgres,
    MySql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn compiler(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Ansi => &Ansi,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
        }
    }

    /// Run this dialect's one-time session setup against a connection.
    pub fn register(&self, conn: &mut dyn Connection) -> Result<(), SessionError> {
        self.compiler().register(conn)
    }
}

// Implement SqlDialect for Dialect by delegating to the concrete types.
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.compiler().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.compiler().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.compiler().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.compiler().format_bool(b)
    }

    fn format_null(&self) -> &'static str {
        self.compiler().format_null()
    }

    fn format_binary(&self, bytes: &[u8]) -> String {
        self.compiler().format_binary(bytes)
    }

    fn concat_operator(&self) -> &'static str {
        self.compiler().concat_operator()
    }

    fn supports_concat_operator(&self) -> bool {
        self.compiler().supports_concat_operator()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.compiler().remap_function(name)
    }

    fn placeholder_annotation(&self, kind: &SqlKind) -> Option<String> {
        self.compiler().placeholder_annotation(kind)
    }

    fn interval_unit(&self, unit: IntervalUnit) -> (i64, &'static str) {
        self.compiler().interval_unit(unit)
    }

    fn compile_expr(&self, expr: &Expr, ctx: &mut CompileContext) -> Result<(), CompileError> {
        self.compiler().compile_expr(expr, ctx)
    }

    fn compile_column(
        &self,
        column: &ColumnRef,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_column(column, ctx)
    }

    fn compile_literal(
        &self,
        literal: &Literal,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_literal(literal, ctx)
    }

    fn compile_value(
        &self,
        value: &TypedValue,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_value(value, ctx)
    }

    fn compile_alias(
        &self,
        expr: &Expr,
        name: &str,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_alias(expr, name, ctx)
    }

    fn compile_binary(
        &self,
        op: Operator,
        left: &Expr,
        right: &Expr,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_binary(op, left, right, ctx)
    }

    fn compile_function(
        &self,
        name: &str,
        args: &[Expr],
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_function(name, args, ctx)
    }

    fn compile_case(
        &self,
        case: &CaseCommand,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_case(case, ctx)
    }

    fn compile_case_value(
        &self,
        value: &Expr,
        resolved: &SqlKind,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_case_value(value, resolved, ctx)
    }

    fn compile_interval(
        &self,
        interval: &Interval,
        ctx: &mut CompileContext,
    ) -> Result<(), CompileError> {
        self.compiler().compile_interval(interval, ctx)
    }

    fn register(&self, conn: &mut dyn Connection) -> Result<(), SessionError> {
        self.compiler().register(conn)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.compiler().name())
    }
}
