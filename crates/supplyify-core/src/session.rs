use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle returned by a successful login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live sessions mapped to the email they belong to
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<SessionToken, String>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, email: &str) -> SessionToken {
        let token = SessionToken::generate();
        self.sessions.insert(token, email.to_string());
        token
    }

    /// Email behind a token, if the session is still open
    pub fn email(&self, token: &SessionToken) -> Option<&str> {
        self.sessions.get(token).map(String::as_str)
    }

    /// Returns false if the token wasn't open
    pub fn close(&mut self, token: &SessionToken) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let mut table = SessionTable::new();
        let token = table.open("a@example.com");

        assert_eq!(table.email(&token), Some("a@example.com"));
        assert!(table.close(&token));
        assert_eq!(table.email(&token), None);
        assert!(!table.close(&token));
    }

    #[test]
    fn test_tokens_are_unique_per_login() {
        let mut table = SessionTable::new();
        let first = table.open("a@example.com");
        let second = table.open("a@example.com");

        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
    }
}
