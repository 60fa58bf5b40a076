//! # Todoflow Runtime
//!
//! Actor runtime for Todoflow machines.
//!
//! This crate turns a pure [`Machine`](todoflow_core::machine::Machine) into
//! a running **actor**: a task owning the machine's state exclusively,
//! draining a FIFO event queue one event to completion at a time, and
//! executing the effects each transition returns.
//!
//! ## Core Components
//!
//! - **Actor**: spawns a machine onto its own task with its own queue
//! - **`ActorHandle`**: the live reference collaborators hold — `send(event)`
//!   plus a snapshot accessor and change subscription for the UI layer
//! - **Children**: a role-keyed registry of child actors for supervisors
//!   that own the spawn/stop lifecycle of other actors
//!
//! ## Scheduling model
//!
//! Single event to completion per actor. An `Effect::Invoke` is the only
//! suspension point: the actor parks on the invocation future, later events
//! queue behind it, and the settled event is processed before the queue
//! resumes. Other actors keep running — each has its own queue and task.
//!
//! Stopping an actor cancels its in-flight invocation and every pending
//! timer, so nothing can mutate a destroyed actor's state.
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_runtime::Actor;
//!
//! let handle = Actor::spawn("todo", TodoMachine::new(), TodoState::default(), env);
//!
//! handle.send(TodoEvent::Load)?;
//! let state = handle.snapshot();
//! handle.stop();
//! ```

pub mod actor;
pub mod children;

/// Error types for the actor runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur when interacting with an actor.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ActorError {
        /// The actor has been stopped and no longer accepts events.
        ///
        /// Sends into a stopped actor are expected during teardown; callers
        /// that race against a supervisor's stop may discard this error.
        #[error("actor has stopped")]
        Stopped,
    }
}

pub use actor::{Actor, ActorHandle};
pub use children::Children;
pub use error::ActorError;
