//! Injected dependencies for the machines.
//!
//! Each machine sees exactly the slice of the remote service it invokes,
//! behind a trait object so production (GraphQL) and test (in-memory,
//! failing) implementations swap freely.

use std::sync::Arc;

use todoflow_client::{AuthService, TodoService};

/// Dependencies of the authentication machine.
#[derive(Clone)]
pub struct AuthEnvironment {
    /// Remote login/register operations.
    pub service: Arc<dyn AuthService>,
}

impl AuthEnvironment {
    /// Environment backed by `service`.
    #[must_use]
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

/// Dependencies of the todo machine.
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Remote todo CRUD operations.
    pub service: Arc<dyn TodoService>,
}

impl TodoEnvironment {
    /// Environment backed by `service`.
    #[must_use]
    pub fn new(service: Arc<dyn TodoService>) -> Self {
        Self { service }
    }
}
