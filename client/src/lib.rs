//! # Todoflow Client
//!
//! The Remote Todo/Auth Service contract and its client implementations.
//!
//! The machines never talk to a transport directly; they capture
//! `Arc<dyn TodoService>` / `Arc<dyn AuthService>` handles from their
//! environment and describe calls as invocation effects. This crate defines
//! that contract plus two implementations:
//!
//! - [`graphql::GraphQlRemote`]: the production client, speaking the todo
//!   backend's GraphQL schema over HTTP (`getTodos`, `addTodo`, `toggleTodo`,
//!   `updateTodo`, `removeTodo`, `login`, `register`)
//! - [`memory::InMemoryRemote`]: an in-process reference implementation for
//!   demos and tests
//!
//! Every operation is request/response. Any non-success outcome collapses to
//! a single human-readable message ([`error::RemoteError`]) — that string is
//! all the machines ever record.

pub mod config;
pub mod error;
pub mod graphql;
pub mod memory;
pub mod service;
pub mod types;

pub use config::RemoteConfig;
pub use error::RemoteError;
pub use graphql::GraphQlRemote;
pub use memory::InMemoryRemote;
pub use service::{AuthService, ServiceFuture, TodoService};
pub use types::{
    AuthSession, DeleteReceipt, Todo, TodoId, ToggleReceipt, UpdateReceipt, UserAccount, UserId,
};
