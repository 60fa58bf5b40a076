//! The supervisor's pure transition function.
//!
//! The supervisor is split the same way the other machines are: a pure core
//! deciding *what* should happen on each event, and an imperative shell
//! ([`crate::shell::Supervisor`]) that owns the child actors and executes
//! the commands. This keeps the lifecycle table directly testable without
//! spawning anything.

use todoflow_core::{SmallVec, smallvec};

/// The roles a supervisor's children play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The authentication machine.
    Auth,
    /// The todo machine.
    Todo,
}

/// Where the session currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SupervisorPhase {
    /// No authenticated session; the auth child is the active one.
    #[default]
    AwaitingAuth,
    /// A session is live; the todo child is the active one.
    Authenticated,
}

/// Inputs to the supervisor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// The auth child reported a successful login.
    AuthSucceeded,
    /// The UI requested a logout.
    LogoutRequested,
}

/// Lifecycle commands the pure core hands to the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorCommand {
    /// Stop the child in the given role, cancelling its pending work and
    /// removing it from the child mapping.
    StopChild(Role),
    /// Tell the todo child to begin fetching. This is the sole trigger of
    /// todo loading — the todo machine never fetches on its own.
    BeginTodoLoad,
}

/// Whether children stopped by a transition are recreated later.
///
/// Under [`RespawnPolicy::Never`] a logout ends the session for good: the
/// auth child stopped on the first successful login is gone, so no further
/// login can succeed. [`RespawnPolicy::OnTransition`] recreates children as
/// the session cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RespawnPolicy {
    /// Stopped children stay gone.
    #[default]
    Never,
    /// A fresh auth child is spawned on logout, and a fresh todo child on
    /// the next successful authentication if the previous one was stopped.
    OnTransition,
}

/// Supervisor configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Child respawn behavior across auth transitions.
    pub respawn: RespawnPolicy,
}

/// The supervisor's transition table.
///
/// Unmatched events are no-ops, never errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct SupervisorMachine;

impl SupervisorMachine {
    /// Process one event: advance the phase, return the lifecycle commands
    /// for the shell to execute in order.
    pub fn handle(
        self,
        phase: &mut SupervisorPhase,
        event: SupervisorEvent,
    ) -> SmallVec<[SupervisorCommand; 2]> {
        match (*phase, event) {
            (SupervisorPhase::AwaitingAuth, SupervisorEvent::AuthSucceeded) => {
                tracing::info!("authenticated; handing over to the todo child");
                *phase = SupervisorPhase::Authenticated;
                smallvec![
                    SupervisorCommand::StopChild(Role::Auth),
                    SupervisorCommand::BeginTodoLoad,
                ]
            }
            (SupervisorPhase::Authenticated, SupervisorEvent::LogoutRequested) => {
                tracing::info!("logged out; stopping the todo child");
                *phase = SupervisorPhase::AwaitingAuth;
                smallvec![SupervisorCommand::StopChild(Role::Todo)]
            }
            // Everything else is ignored in the current phase.
            _ => smallvec![],
        }
    }
}
