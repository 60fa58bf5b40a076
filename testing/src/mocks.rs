//! Remote-service stand-ins for tests.
//!
//! The in-memory reference service in `todoflow-client` covers happy paths;
//! the mocks here cover the rest: services that always fail with a chosen
//! message, and a wrapper that counts calls so tests can assert an
//! operation was — or was not — invoked.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use todoflow_client::{
    AuthService, AuthSession, DeleteReceipt, RemoteError, ServiceFuture, Todo, TodoId,
    TodoService, ToggleReceipt, UpdateReceipt,
};

/// A todo service whose every operation fails with the same message.
pub struct FailingTodoService {
    message: String,
}

impl FailingTodoService {
    /// Service failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> ServiceFuture<'_, T>
    where
        T: Send,
    {
        let message = self.message.clone();
        Box::pin(async move { Err(RemoteError::Api(message)) })
    }
}

impl TodoService for FailingTodoService {
    fn list_todos(&self) -> ServiceFuture<'_, Vec<Todo>> {
        self.fail()
    }

    fn create_todo(&self, _text: String) -> ServiceFuture<'_, Todo> {
        self.fail()
    }

    fn toggle_todo(&self, _id: TodoId) -> ServiceFuture<'_, ToggleReceipt> {
        self.fail()
    }

    fn update_todo_text(&self, _id: TodoId, _text: String) -> ServiceFuture<'_, UpdateReceipt> {
        self.fail()
    }

    fn delete_todo(&self, _id: TodoId) -> ServiceFuture<'_, DeleteReceipt> {
        self.fail()
    }
}

/// An auth service whose every operation fails with the same message.
pub struct FailingAuthService {
    message: String,
}

impl FailingAuthService {
    /// Service failing with `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl AuthService for FailingAuthService {
    fn login(&self, _email: String, _password: String) -> ServiceFuture<'_, AuthSession> {
        let message = self.message.clone();
        Box::pin(async move { Err(RemoteError::Api(message)) })
    }

    fn register(&self, _email: String, _password: String) -> ServiceFuture<'_, AuthSession> {
        let message = self.message.clone();
        Box::pin(async move { Err(RemoteError::Api(message)) })
    }
}

/// Per-operation call counts observed by [`CountingTodoService`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoCallCounts {
    /// `list_todos` calls
    pub list: usize,
    /// `create_todo` calls
    pub create: usize,
    /// `toggle_todo` calls
    pub toggle: usize,
    /// `update_todo_text` calls
    pub update: usize,
    /// `delete_todo` calls
    pub delete: usize,
}

/// Counts calls per operation, delegating to an inner service.
///
/// Lets a test assert that a guard-refused event issued no remote call.
pub struct CountingTodoService {
    inner: Arc<dyn TodoService>,
    list: AtomicUsize,
    create: AtomicUsize,
    toggle: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
}

impl CountingTodoService {
    /// Wrap `inner`, counting every call that reaches it.
    #[must_use]
    pub fn new(inner: Arc<dyn TodoService>) -> Self {
        Self {
            inner,
            list: AtomicUsize::new(0),
            create: AtomicUsize::new(0),
            toggle: AtomicUsize::new(0),
            update: AtomicUsize::new(0),
            delete: AtomicUsize::new(0),
        }
    }

    /// Snapshot of the counts so far.
    #[must_use]
    pub fn counts(&self) -> TodoCallCounts {
        TodoCallCounts {
            list: self.list.load(Ordering::Relaxed),
            create: self.create.load(Ordering::Relaxed),
            toggle: self.toggle.load(Ordering::Relaxed),
            update: self.update.load(Ordering::Relaxed),
            delete: self.delete.load(Ordering::Relaxed),
        }
    }
}

impl TodoService for CountingTodoService {
    fn list_todos(&self) -> ServiceFuture<'_, Vec<Todo>> {
        self.list.fetch_add(1, Ordering::Relaxed);
        self.inner.list_todos()
    }

    fn create_todo(&self, text: String) -> ServiceFuture<'_, Todo> {
        self.create.fetch_add(1, Ordering::Relaxed);
        self.inner.create_todo(text)
    }

    fn toggle_todo(&self, id: TodoId) -> ServiceFuture<'_, ToggleReceipt> {
        self.toggle.fetch_add(1, Ordering::Relaxed);
        self.inner.toggle_todo(id)
    }

    fn update_todo_text(&self, id: TodoId, text: String) -> ServiceFuture<'_, UpdateReceipt> {
        self.update.fetch_add(1, Ordering::Relaxed);
        self.inner.update_todo_text(id, text)
    }

    fn delete_todo(&self, id: TodoId) -> ServiceFuture<'_, DeleteReceipt> {
        self.delete.fetch_add(1, Ordering::Relaxed);
        self.inner.delete_todo(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoflow_client::InMemoryRemote;

    #[tokio::test]
    async fn failing_service_reports_its_message() {
        let service = FailingTodoService::new("boom");
        let err = service.list_todos().await.unwrap_err();
        assert_eq!(err, RemoteError::Api("boom".to_string()));
    }

    #[tokio::test]
    async fn counting_service_counts_only_what_runs() {
        let counting = CountingTodoService::new(Arc::new(InMemoryRemote::new()));

        counting.create_todo("milk".to_string()).await.unwrap();
        counting.list_todos().await.unwrap();
        counting.list_todos().await.unwrap();

        let counts = counting.counts();
        assert_eq!(counts.create, 1);
        assert_eq!(counts.list, 2);
        assert_eq!(counts.toggle, 0);
    }
}
