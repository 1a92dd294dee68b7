//! One-time session setup: helper routine installation and idempotency.

use prism::dialect::Dialect;
use prism::session::{Connection, ConnectionError};

/// Mock connection that records executed SQL and can simulate an already
/// provisioned session.
#[derive(Default)]
struct MockConnection {
    executed: Vec<String>,
    installed: bool,
    fail_with: Option<String>,
}

impl Connection for MockConnection {
    fn execute(&mut self, sql: &str) -> Result<(), ConnectionError> {
        if let Some(message) = &self.fail_with {
            return Err(ConnectionError::Backend(message.clone()));
        }
        if self.installed {
            return Err(ConnectionError::DuplicateObject(sql.into()));
        }
        self.executed.push(sql.into());
        Ok(())
    }
}

#[test]
fn postgres_setup_installs_helper_routines() {
    let mut conn = MockConnection::default();
    Dialect::Postgres.register(&mut conn).unwrap();

    assert_eq!(conn.executed.len(), 3);
    assert!(conn.executed[0].contains("trunc_mod"));
    assert!(conn.executed[1].contains("log2"));
    assert!(conn.executed[2].contains("log10"));
}

#[test]
fn registering_twice_is_not_an_error() {
    let mut conn = MockConnection::default();
    Dialect::Postgres.register(&mut conn).unwrap();

    // Everything now reports "already exists"; setup treats that as done.
    conn.installed = true;
    Dialect::Postgres.register(&mut conn).unwrap();
    assert_eq!(conn.executed.len(), 3);
}

#[test]
fn other_backend_errors_propagate() {
    let mut conn = MockConnection {
        fail_with: Some("permission denied".into()),
        ..MockConnection::default()
    };
    let err = Dialect::Postgres.register(&mut conn).unwrap_err();
    assert!(err.to_string().contains("permission denied"));
}

#[test]
fn base_dialects_have_no_session_setup() {
    let mut conn = MockConnection::default();
    Dialect::Ansi.register(&mut conn).unwrap();
    Dialect::MySql.register(&mut conn).unwrap();
    assert!(conn.executed.is_empty());
}
