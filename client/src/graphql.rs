//! GraphQL-over-HTTP client for the Remote Todo/Auth Service.
//!
//! Speaks the backend's schema: `getTodos` plus the `addTodo`, `toggleTodo`,
//! `updateTodo`, `removeTodo`, `login`, and `register` mutations. Inputs go
//! through GraphQL variables, never string interpolation.
//!
//! The server reports failures inside a `200 OK` envelope (`errors: [...]`);
//! the first error's message becomes [`RemoteError::Api`]. Anything that
//! prevents a usable envelope — connection failure, non-success status,
//! decode failure — becomes [`RemoteError::Transport`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::service::{AuthService, ServiceFuture, TodoService};
use crate::types::{AuthSession, DeleteReceipt, Todo, TodoId, ToggleReceipt, UpdateReceipt};

const LIST_TODOS: &str = "query { getTodos { id text completed } }";
const ADD_TODO: &str =
    "mutation AddTodo($text: String!) { addTodo(text: $text) { id text completed } }";
const TOGGLE_TODO: &str = "mutation ToggleTodo($id: ID!) { toggleTodo(id: $id) { id completed } }";
const UPDATE_TODO: &str =
    "mutation UpdateTodo($id: ID!, $text: String!) { updateTodo(id: $id, text: $text) { id text } }";
const REMOVE_TODO: &str = "mutation RemoveTodo($id: ID!) { removeTodo(id: $id) { id } }";
const LOGIN: &str = "mutation Login($email: String!, $password: String!) { login(email: $email, password: $password) { user { id email } } }";
const REGISTER: &str = "mutation Register($email: String!, $password: String!) { register(email: $email, password: $password) { user { id email } } }";

/// The standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<Vec<EnvelopeError>>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    message: String,
}

impl<T> Envelope<T> {
    /// Collapse the envelope into the operation's outcome.
    fn into_result(self) -> Result<T, RemoteError> {
        if let Some(errors) = self.errors {
            if let Some(first) = errors.into_iter().next() {
                return Err(RemoteError::Api(first.message));
            }
        }

        self.data
            .ok_or_else(|| RemoteError::Transport("response carried no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct GetTodosData {
    #[serde(rename = "getTodos")]
    todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
struct AddTodoData {
    #[serde(rename = "addTodo")]
    todo: Todo,
}

#[derive(Debug, Deserialize)]
struct ToggleTodoData {
    #[serde(rename = "toggleTodo")]
    receipt: ToggleReceipt,
}

#[derive(Debug, Deserialize)]
struct UpdateTodoData {
    #[serde(rename = "updateTodo")]
    receipt: UpdateReceipt,
}

#[derive(Debug, Deserialize)]
struct RemoveTodoData {
    #[serde(rename = "removeTodo")]
    receipt: DeleteReceipt,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    login: AuthSession,
}

#[derive(Debug, Deserialize)]
struct RegisterData {
    register: AuthSession,
}

/// GraphQL client for the todo backend.
#[derive(Clone, Debug)]
pub struct GraphQlRemote {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlRemote {
    /// Client pointing at the configured endpoint.
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint,
        }
    }

    /// Execute one operation and unwrap its envelope.
    #[tracing::instrument(skip(self, variables), fields(endpoint = %self.endpoint))]
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<T, RemoteError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "backend returned non-success status");
            return Err(RemoteError::Transport(format!("unexpected status {status}")));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        envelope.into_result()
    }
}

impl TodoService for GraphQlRemote {
    fn list_todos(&self) -> ServiceFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            let data: GetTodosData = self.execute(LIST_TODOS, json!({})).await?;
            Ok(data.todos)
        })
    }

    fn create_todo(&self, text: String) -> ServiceFuture<'_, Todo> {
        Box::pin(async move {
            let data: AddTodoData = self.execute(ADD_TODO, json!({ "text": text })).await?;
            Ok(data.todo)
        })
    }

    fn toggle_todo(&self, id: TodoId) -> ServiceFuture<'_, ToggleReceipt> {
        Box::pin(async move {
            let data: ToggleTodoData = self
                .execute(TOGGLE_TODO, json!({ "id": id.as_str() }))
                .await?;
            Ok(data.receipt)
        })
    }

    fn update_todo_text(&self, id: TodoId, text: String) -> ServiceFuture<'_, UpdateReceipt> {
        Box::pin(async move {
            let data: UpdateTodoData = self
                .execute(UPDATE_TODO, json!({ "id": id.as_str(), "text": text }))
                .await?;
            Ok(data.receipt)
        })
    }

    fn delete_todo(&self, id: TodoId) -> ServiceFuture<'_, DeleteReceipt> {
        Box::pin(async move {
            let data: RemoveTodoData = self
                .execute(REMOVE_TODO, json!({ "id": id.as_str() }))
                .await?;
            Ok(data.receipt)
        })
    }
}

impl AuthService for GraphQlRemote {
    fn login(&self, email: String, password: String) -> ServiceFuture<'_, AuthSession> {
        Box::pin(async move {
            let data: LoginData = self
                .execute(LOGIN, json!({ "email": email, "password": password }))
                .await?;
            Ok(data.login)
        })
    }

    fn register(&self, email: String, password: String) -> ServiceFuture<'_, AuthSession> {
        Box::pin(async move {
            let data: RegisterData = self
                .execute(REGISTER, json!({ "email": email, "password": password }))
                .await?;
            Ok(data.register)
        })
    }
}
