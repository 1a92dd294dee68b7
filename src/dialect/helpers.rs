//! Shared helper functions for SQL dialect implementations.
//!
//! Reusable building blocks that dialects compose to implement the
//! `SqlDialect` trait with minimal duplication.

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Ansi, Postgres
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: all dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal true/false.
/// Used by: Ansi, Postgres
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: MySQL
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Binary Literals
// =============================================================================

/// Standard SQL hex literal: X'4142'.
pub fn format_binary_ansi(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        hex.push_str(&format!("{:02X}", b));
    }
    format!("X'{}'", hex)
}

/// Postgres BYTEA hex literal: '\x4142'.
pub fn format_binary_postgres(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        hex.push_str(&format!("{:02x}", b));
    }
    format!("'\\x{}'", hex)
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for the Postgres dialect.
///
/// `MOD` routes to the installed truncating-toward-zero helper; see the
/// session setup routines below.
pub fn remap_function_postgres(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "MOD" => Some("TRUNC_MOD"),
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for the MySQL dialect.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "SUBSTR" => Some("SUBSTRING"),
        _ => None,
    }
}

// =============================================================================
// Session Setup
// =============================================================================

/// Helper routines Postgres lacks natively, installed once per connection.
///
/// Installation tolerates "already exists" so registration is idempotent.
pub const POSTGRES_SETUP_ROUTINES: [&str; 3] = [
    // Integer % in Postgres already truncates toward zero; the named routine
    // pins that behavior for callers that lower MOD to it.
    "CREATE FUNCTION trunc_mod(bigint, bigint) RETURNS bigint \
     AS 'SELECT $1 % $2' LANGUAGE SQL IMMUTABLE",
    "CREATE FUNCTION log2(double precision) RETURNS double precision \
     AS 'SELECT ln($1) / ln(2)' LANGUAGE SQL IMMUTABLE",
    "CREATE FUNCTION log10(double precision) RETURNS double precision \
     AS 'SELECT ln($1) / ln(10)' LANGUAGE SQL IMMUTABLE",
];
