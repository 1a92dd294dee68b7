//! ANSI SQL reference dialect.
//!
//! Pure base rules: double-quoted identifiers, true/false booleans, infix
//! `||` concatenation, standard interval vocabulary. Useful as the neutral
//! rendering target and as the baseline vendor overrides are diffed against.

use super::{helpers, SqlDialect};

/// ANSI SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Ansi;

impl SqlDialect for Ansi {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }
}
