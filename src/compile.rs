//! Compilation context and output.
//!
//! A [`CompileContext`] is the single-pass accumulator threaded through one
//! compile operation: the growing token buffer, the target vendor tag, and
//! the ordered list of bound parameters. It owns no expression state and
//! must not be shared or reused across concurrent compiles - every compile
//! obtains a fresh one.

use thiserror::Error;

use crate::dialect::Dialect;
use crate::token::TokenStream;
use crate::value::TypedValue;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while rendering an expression tree to SQL.
///
/// A dialect that has no rule for a node/operator combination fails fast
/// rather than emitting partial or incorrect text.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{dialect} has no rendering rule for operator {symbol}")]
    UnsupportedOperator {
        dialect: &'static str,
        symbol: &'static str,
    },

    #[error("{dialect} cannot render {what}")]
    Unsupported { dialect: &'static str, what: String },
}

// =============================================================================
// Context
// =============================================================================

/// Mutable accumulator for one compile pass.
#[derive(Debug)]
pub struct CompileContext {
    dialect: Dialect,
    tokens: TokenStream,
    params: Vec<BoundParam>,
}

impl CompileContext {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tokens: TokenStream::new(),
            params: Vec::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The growing output buffer.
    pub fn out(&mut self) -> &mut TokenStream {
        &mut self.tokens
    }

    /// Record a bound value in placeholder order.
    pub fn bind(&mut self, value: TypedValue, placeholder: String) {
        self.params.push(BoundParam { value, placeholder });
    }

    /// Serialize the buffer and hand back the finished compilation.
    pub fn finish(self) -> Compiled {
        Compiled {
            sql: self.tokens.serialize(self.dialect),
            params: self.params,
            dialect: self.dialect,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// One bound parameter: the typed value and the exact placeholder text that
/// was emitted for it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub value: TypedValue,
    pub placeholder: String,
}

/// Result of compiling an expression tree.
#[derive(Debug, Clone)]
pub struct Compiled {
    /// The rendered SQL text.
    pub sql: String,

    /// Bound values, in placeholder order.
    pub params: Vec<BoundParam>,

    /// The dialect used for rendering.
    pub dialect: Dialect,
}
