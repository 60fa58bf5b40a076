//! # Todoflow Machines
//!
//! The three cooperating machines behind the todo application, plus the
//! supervising shell that wires them together:
//!
//! - [`auth::AuthMachine`]: credential submission (login/register) with
//!   transient, self-clearing failure and confirmation messages
//! - [`todo::TodoMachine`]: the remote-backed todo CRUD lifecycle, one
//!   invocation in flight at a time
//! - [`supervisor::SupervisorMachine`] + [`shell::Supervisor`]: the
//!   parent that owns both children, stopping the auth child on successful
//!   login and handing the session over to the todo child (and back on
//!   logout)
//!
//! Machines are pure transition tables over `{phase, context}` state; all
//! I/O is described as effects and executed by `todoflow-runtime` actors.
//! The UI layer holds [`ActorHandle`](todoflow_runtime::ActorHandle) clones,
//! subscribes to snapshots, and dispatches events — nothing else crosses the
//! boundary.
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_machines::prelude::*;
//!
//! let remote = Arc::new(InMemoryRemote::new());
//! let supervisor = Supervisor::spawn(
//!     AuthEnvironment::new(Arc::clone(&remote) as _),
//!     TodoEnvironment::new(remote as _),
//!     SupervisorConfig::default(),
//! );
//!
//! let auth = supervisor.auth().await.expect("auth child");
//! auth.send(AuthEvent::Login {
//!     email: "ada@example.com".into(),
//!     password: "hunter2".into(),
//! })?;
//! ```

pub mod auth;
pub mod environment;
pub mod shell;
pub mod supervisor;
pub mod todo;

/// Everything a frontend needs to drive the machines.
pub mod prelude {
    pub use crate::auth::{
        AuthContext, AuthEvent, AuthMachine, AuthOutput, AuthPhase, AuthState,
    };
    pub use crate::environment::{AuthEnvironment, TodoEnvironment};
    pub use crate::shell::Supervisor;
    pub use crate::supervisor::{
        RespawnPolicy, Role, SupervisorConfig, SupervisorEvent, SupervisorPhase,
    };
    pub use crate::todo::{
        TodoEvent, TodoListContext, TodoMachine, TodoPhase, TodoState, UpdateRequest,
    };
}
