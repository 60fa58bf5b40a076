//! In-memory reference implementation of the remote service.
//!
//! Backs demos and integration tests with the same observable behavior as
//! the real backend: server-assigned ids, server-authoritative receipts, and
//! the same failure messages for credential mismatch, duplicate email, and
//! unknown ids.

use std::collections::HashMap;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::service::{AuthService, ServiceFuture, TodoService};
use crate::types::{
    AuthSession, DeleteReceipt, Todo, TodoId, ToggleReceipt, UpdateReceipt, UserAccount, UserId,
};

/// Message reported on a failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message reported when registering an email that already has an account.
pub const DUPLICATE_EMAIL: &str = "Email already registered";

/// Message reported when a todo id does not exist.
pub const UNKNOWN_TODO: &str = "Todo not found";

struct UserRecord {
    id: UserId,
    password: String,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    todos: Vec<Todo>,
}

impl Inner {
    fn find_mut(&mut self, id: &TodoId) -> Result<&mut Todo, RemoteError> {
        self.todos
            .iter_mut()
            .find(|todo| todo.id == *id)
            .ok_or_else(|| RemoteError::Api(UNKNOWN_TODO.to_string()))
    }
}

/// In-process implementation of both service traits.
///
/// # Example
///
/// ```ignore
/// let remote = Arc::new(InMemoryRemote::new());
/// remote.seed_user("ada@example.com", "hunter2").await;
///
/// let todos: Arc<dyn TodoService> = Arc::clone(&remote) as _;
/// let auth: Arc<dyn AuthService> = remote as _;
/// ```
#[derive(Default)]
pub struct InMemoryRemote {
    inner: Mutex<Inner>,
}

impl InMemoryRemote {
    /// An empty service: no accounts, no todos.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account directly, bypassing the register operation.
    pub async fn seed_user(&self, email: impl Into<String>, password: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.users.insert(
            email.into(),
            UserRecord {
                id: UserId::new(Uuid::new_v4().to_string()),
                password: password.into(),
            },
        );
    }

    /// Current todo list, in server order. Test inspection helper.
    pub async fn todos(&self) -> Vec<Todo> {
        self.inner.lock().await.todos.clone()
    }
}

impl TodoService for InMemoryRemote {
    fn list_todos(&self) -> ServiceFuture<'_, Vec<Todo>> {
        Box::pin(async move { Ok(self.inner.lock().await.todos.clone()) })
    }

    fn create_todo(&self, text: String) -> ServiceFuture<'_, Todo> {
        Box::pin(async move {
            let todo = Todo {
                id: TodoId::new(Uuid::new_v4().to_string()),
                text,
                completed: false,
            };

            let mut inner = self.inner.lock().await;
            inner.todos.push(todo.clone());
            Ok(todo)
        })
    }

    fn toggle_todo(&self, id: TodoId) -> ServiceFuture<'_, ToggleReceipt> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            let todo = inner.find_mut(&id)?;
            todo.completed = !todo.completed;

            Ok(ToggleReceipt {
                id,
                completed: todo.completed,
            })
        })
    }

    fn update_todo_text(&self, id: TodoId, text: String) -> ServiceFuture<'_, UpdateReceipt> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            let todo = inner.find_mut(&id)?;
            todo.text.clone_from(&text);

            Ok(UpdateReceipt { id, text })
        })
    }

    fn delete_todo(&self, id: TodoId) -> ServiceFuture<'_, DeleteReceipt> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            inner.find_mut(&id)?;
            inner.todos.retain(|todo| todo.id != id);

            Ok(DeleteReceipt { id })
        })
    }
}

impl AuthService for InMemoryRemote {
    fn login(&self, email: String, password: String) -> ServiceFuture<'_, AuthSession> {
        Box::pin(async move {
            let inner = self.inner.lock().await;

            match inner.users.get(&email) {
                Some(record) if record.password == password => Ok(AuthSession {
                    user: UserAccount {
                        id: record.id.clone(),
                        email,
                    },
                }),
                _ => Err(RemoteError::Api(INVALID_CREDENTIALS.to_string())),
            }
        })
    }

    fn register(&self, email: String, password: String) -> ServiceFuture<'_, AuthSession> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;

            if inner.users.contains_key(&email) {
                return Err(RemoteError::Api(DUPLICATE_EMAIL.to_string()));
            }

            let record = UserRecord {
                id: UserId::new(Uuid::new_v4().to_string()),
                password,
            };
            let user = UserAccount {
                id: record.id.clone(),
                email: email.clone(),
            };
            inner.users.insert(email, record);

            Ok(AuthSession { user })
        })
    }
}
