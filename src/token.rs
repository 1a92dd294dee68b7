//! SQL tokens - the atomic units of SQL output.
//!
//! Tokens are dialect-agnostic representations that serialize to
//! dialect-specific strings. Structural decisions (which tokens to emit)
//! belong to the dialect compile rules; lexical decisions (quoting, literal
//! formats) happen here at serialization time.

use crate::dialect::{Dialect, SqlDialect};

/// SQL token - every element an expression can render to.
///
/// Adding a new variant here will cause compile errors everywhere it needs
/// to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Case,
    When,
    Then,
    Else,
    End,
    As,
    Is,
    IsNot,
    Asc,
    Desc,
    Interval,
    Cast,
    And,
    Or,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Concat,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Identifier (table, column, alias)
    Ident(String),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// Binary literal
    LitBytes(Vec<u8>),
    /// NULL literal
    LitNull,

    /// Function name - rendered uppercase, after dialect remapping
    FunctionName(String),

    /// Positional parameter mark, with an optional dialect annotation
    /// (e.g. an inline cast naming an enum's backing type)
    Placeholder { annotation: Option<String> },

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping. Only for trusted,
    /// static fragments - never user input.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            // Keywords
            Token::Case => "CASE".into(),
            Token::When => "WHEN".into(),
            Token::Then => "THEN".into(),
            Token::Else => "ELSE".into(),
            Token::End => "END".into(),
            Token::As => "AS".into(),
            Token::Is => "IS".into(),
            Token::IsNot => "IS NOT".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Interval => "INTERVAL".into(),
            Token::Cast => "CAST".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Mul => "*".into(),
            Token::Div => "/".into(),
            Token::Concat => dialect.concat_operator().into(),

            // Whitespace
            Token::Space => " ".into(),

            // Dynamic - dialect-specific formatting
            Token::Ident(name) => dialect.quote_identifier(name),
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                if f.is_nan() {
                    panic!("Cannot serialize NaN to SQL")
                }
                if f.is_infinite() {
                    panic!("Cannot serialize Infinity to SQL")
                }
                // ryu for fast, accurate float formatting
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitBool(b) => dialect.format_bool(*b).into(),
            Token::LitBytes(bytes) => dialect.format_binary(bytes),
            Token::LitNull => dialect.format_null().into(),

            // Function names, remapped per dialect
            Token::FunctionName(name) => match dialect.remap_function(name) {
                Some(remapped) => remapped.to_uppercase(),
                None => name.to_uppercase(),
            },

            Token::Placeholder { annotation } => match annotation {
                Some(a) => format!("?{}", a),
                None => "?".into(),
            },

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_serialize() {
        assert_eq!(Token::Case.serialize(Dialect::Ansi), "CASE");
        assert_eq!(Token::IsNot.serialize(Dialect::Postgres), "IS NOT");
    }

    #[test]
    fn test_ident_serialize() {
        let tok = Token::Ident("users".into());
        assert_eq!(tok.serialize(Dialect::Ansi), "\"users\"");
        assert_eq!(tok.serialize(Dialect::Postgres), "\"users\"");
        assert_eq!(tok.serialize(Dialect::MySql), "`users`");
    }

    #[test]
    fn test_string_and_bool_literals() {
        let s = Token::LitString("it's".into());
        assert_eq!(s.serialize(Dialect::Ansi), "'it''s'");
        assert_eq!(Token::LitBool(true).serialize(Dialect::Postgres), "true");
        assert_eq!(Token::LitBool(true).serialize(Dialect::MySql), "1");
    }

    #[test]
    fn test_bytes_literal() {
        let tok = Token::LitBytes(vec![0xAB, 0x01]);
        assert_eq!(tok.serialize(Dialect::Ansi), "X'AB01'");
        assert_eq!(tok.serialize(Dialect::Postgres), "'\\xab01'");
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(
            Token::Placeholder { annotation: None }.serialize(Dialect::Ansi),
            "?"
        );
        assert_eq!(
            Token::Placeholder {
                annotation: Some("::\"mood\"".into())
            }
            .serialize(Dialect::Postgres),
            "?::\"mood\""
        );
    }

    #[test]
    fn test_float_serialize() {
        assert_eq!(Token::LitFloat(3.14).serialize(Dialect::Ansi), "3.14");
        assert_eq!(Token::LitFloat(1.0).serialize(Dialect::Ansi), "1.0");
    }

    #[test]
    #[should_panic(expected = "Cannot serialize NaN")]
    fn test_float_nan_panics() {
        Token::LitFloat(f64::NAN).serialize(Dialect::Ansi);
    }

    #[test]
    #[should_panic(expected = "Cannot serialize Infinity")]
    fn test_float_infinity_panics() {
        Token::LitFloat(f64::INFINITY).serialize(Dialect::Ansi);
    }

    #[test]
    fn test_token_stream() {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident("age".into()))
            .space()
            .push(Token::Gte)
            .space()
            .push(Token::LitInt(18));
        assert_eq!(ts.serialize(Dialect::Postgres), "\"age\" >= 18");
    }
}
