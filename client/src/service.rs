//! Service traits for the Remote Todo/Auth Service.
//!
//! These traits use explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so they stay dyn-compatible: the machines hold them as
//! `Arc<dyn TodoService>` / `Arc<dyn AuthService>` inside their
//! environments.

use std::future::Future;
use std::pin::Pin;

use crate::error::RemoteError;
use crate::types::{AuthSession, DeleteReceipt, Todo, TodoId, ToggleReceipt, UpdateReceipt};

/// The future returned by every service operation.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// Remote todo operations.
///
/// The server is authoritative for every field it returns: `create_todo`
/// assigns the id and starts `completed` at `false`; mutations return
/// receipts the caller merges back into its own copy of the list.
pub trait TodoService: Send + Sync {
    /// Fetch the full list, in server order.
    fn list_todos(&self) -> ServiceFuture<'_, Vec<Todo>>;

    /// Create a todo with the given text.
    fn create_todo(&self, text: String) -> ServiceFuture<'_, Todo>;

    /// Flip the completion flag of the todo with `id`.
    fn toggle_todo(&self, id: TodoId) -> ServiceFuture<'_, ToggleReceipt>;

    /// Replace the text of the todo with `id`.
    fn update_todo_text(&self, id: TodoId, text: String) -> ServiceFuture<'_, UpdateReceipt>;

    /// Delete the todo with `id`.
    fn delete_todo(&self, id: TodoId) -> ServiceFuture<'_, DeleteReceipt>;
}

/// Remote authentication operations.
///
/// Both operations fail with a server-reported message on credential
/// mismatch or duplicate email; the caller propagates that message as-is.
pub trait AuthService: Send + Sync {
    /// Authenticate with email and password.
    fn login(&self, email: String, password: String) -> ServiceFuture<'_, AuthSession>;

    /// Create an account with email and password.
    fn register(&self, email: String, password: String) -> ServiceFuture<'_, AuthSession>;
}
