//! Wire data types for the Remote Todo/Auth Service contract.
//!
//! These mirror what the server returns. Identifiers are opaque strings the
//! server assigns; the client never fabricates one.

use serde::{Deserialize, Serialize};

/// Unique identifier for a todo item, assigned by the server on creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap a server-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier, unique within the list
    pub id: TodoId,
    /// Free-form text
    pub text: String,
    /// Completion flag
    pub completed: bool,
}

/// Server response to a toggle: the new completion flag for `id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleReceipt {
    /// The toggled item
    pub id: TodoId,
    /// Completion flag after the toggle
    pub completed: bool,
}

/// Server response to a text update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReceipt {
    /// The updated item
    pub id: TodoId,
    /// Text after the update
    pub text: String,
}

/// Server response to a deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    /// The removed item
    pub id: TodoId,
}

/// Unique identifier for a user account, assigned by the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Wrap a server-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user account as returned by login/register.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Server-assigned identifier
    pub id: UserId,
    /// The account's email address
    pub email: String,
}

/// Successful outcome of a login or register operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated account
    pub user: UserAccount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_id_round_trips_as_plain_string() {
        let id = TodoId::new("a1b2c3");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"a1b2c3\"");

        let back: TodoId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn todo_decodes_from_server_shape() {
        let todo: Todo =
            serde_json::from_str(r#"{"id":"x1","text":"buy milk","completed":false}"#).unwrap();
        assert_eq!(todo.id.as_str(), "x1");
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
    }
}
