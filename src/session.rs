//! Connection collaborator for one-time dialect session setup.
//!
//! The engine never talks to a database itself. The single exception is the
//! per-vendor `register` hook, which some dialects use to install helper
//! routines before first use against a connection; this module defines the
//! opaque handle that hook runs against.
//!
//! Serializing registration (at most once per live connection) is the
//! caller's responsibility - running it concurrently on the same connection
//! risks duplicate-definition races the engine cannot guard against.

use thiserror::Error;

/// An opaque live connection the execution layer hands in for setup.
pub trait Connection {
    /// Execute one SQL statement for its side effect.
    fn execute(&mut self, sql: &str) -> Result<(), ConnectionError>;
}

/// Errors a connection can report back.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The object being created already exists. Dialect setup treats this as
    /// success so registration stays idempotent.
    #[error("object already exists: {0}")]
    DuplicateObject(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors from one-time session setup.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session setup failed: {0}")]
    Setup(#[from] ConnectionError),
}
