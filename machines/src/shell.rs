//! The supervising shell: owns the child actors and executes lifecycle
//! commands from the pure supervisor core.
//!
//! The shell is itself an actor in everything but name — it has its own
//! event queue, processes one event at a time, and owns its children
//! exclusively. Parent→child signaling (`BeginTodoLoad`, stop) is event
//! delivery into the child's queue, never a synchronous call into the
//! child's machine.

use std::sync::Arc;

use todoflow_runtime::{Actor, ActorError, ActorHandle, Children};
use tokio::sync::{RwLock, mpsc, watch};

use crate::auth::{AuthMachine, AuthOutput, AuthState};
use crate::environment::{AuthEnvironment, TodoEnvironment};
use crate::supervisor::{
    RespawnPolicy, Role, SupervisorCommand, SupervisorConfig, SupervisorEvent, SupervisorMachine,
    SupervisorPhase,
};
use crate::todo::{TodoEvent, TodoMachine, TodoState};

/// Live child handles exposed to the UI layer.
///
/// These are clones of the same handles the supervisor owns: the UI
/// subscribes to their snapshots and dispatches events into them directly.
/// Once a child is stopped its handle stays observable but rejects sends.
#[derive(Default)]
struct ChildHandles {
    auth: Option<ActorHandle<AuthMachine>>,
    todo: Option<ActorHandle<TodoMachine>>,
}

/// The top-level supervisor.
///
/// Spawns one auth child and one todo child at startup, stops the auth
/// child when authentication succeeds (telling the todo child to load), and
/// reverses the handover on logout. Whether stopped children are recreated
/// is governed by [`RespawnPolicy`].
pub struct Supervisor {
    events: mpsc::UnboundedSender<SupervisorEvent>,
    phase: watch::Receiver<SupervisorPhase>,
    handles: Arc<RwLock<ChildHandles>>,
    stop: Arc<watch::Sender<bool>>,
}

impl Supervisor {
    /// Spawn the supervisor and both children.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; panics otherwise (tasks
    /// cannot be spawned without one).
    #[must_use]
    pub fn spawn(
        auth_env: AuthEnvironment,
        todo_env: TodoEnvironment,
        config: SupervisorConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(SupervisorPhase::default());
        let (stop_tx, stop_rx) = watch::channel(false);

        // Children exist before the shell task runs, so handles are
        // observable the moment spawn returns.
        let auth = spawn_auth(&events_tx, auth_env.clone());
        let todo = spawn_todo(todo_env.clone());

        let mut children = Children::new();
        children.adopt(Role::Auth, &auth);
        children.adopt(Role::Todo, &todo);

        let handles = Arc::new(RwLock::new(ChildHandles {
            auth: Some(auth),
            todo: Some(todo),
        }));

        let shell = Shell {
            machine: SupervisorMachine,
            phase: SupervisorPhase::default(),
            config,
            auth_env,
            todo_env,
            children,
            handles: Arc::clone(&handles),
            events: events_rx,
            raise: events_tx.clone(),
            phase_tx,
            stop: stop_rx,
        };

        tokio::spawn(shell.run());

        Self {
            events: events_tx,
            phase: phase_rx,
            handles,
            stop: Arc::new(stop_tx),
        }
    }

    /// Enqueue an event for the supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Stopped`] if the supervisor has been stopped.
    pub fn send(&self, event: SupervisorEvent) -> Result<(), ActorError> {
        if *self.stop.borrow() {
            return Err(ActorError::Stopped);
        }

        self.events.send(event).map_err(|_| ActorError::Stopped)
    }

    /// Request a logout.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Stopped`] if the supervisor has been stopped.
    pub fn logout(&self) -> Result<(), ActorError> {
        self.send(SupervisorEvent::LogoutRequested)
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(&self) -> SupervisorPhase {
        *self.phase.borrow()
    }

    /// Subscribe to session phase changes.
    #[must_use]
    pub fn watch_phase(&self) -> watch::Receiver<SupervisorPhase> {
        self.phase.clone()
    }

    /// Live handle to the auth child, if one was ever spawned.
    ///
    /// The handle stays available after the child is stopped; sends into it
    /// then fail with [`ActorError::Stopped`].
    pub async fn auth(&self) -> Option<ActorHandle<AuthMachine>> {
        self.handles.read().await.auth.clone()
    }

    /// Live handle to the todo child, if one was ever spawned.
    pub async fn todo(&self) -> Option<ActorHandle<TodoMachine>> {
        self.handles.read().await.todo.clone()
    }

    /// Stop the supervisor and both children.
    pub fn stop(&self) {
        tracing::debug!("supervisor stop requested");
        let _ = self.stop.send(true);
    }

    /// Whether [`Supervisor::stop`] has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

fn spawn_auth(
    raise: &mpsc::UnboundedSender<SupervisorEvent>,
    env: AuthEnvironment,
) -> ActorHandle<AuthMachine> {
    let raise = raise.clone();
    Actor::spawn_with_outbox(
        "auth",
        AuthMachine::new(),
        AuthState::default(),
        env,
        move |output| match output {
            AuthOutput::Authenticated => {
                let _ = raise.send(SupervisorEvent::AuthSucceeded);
            }
        },
    )
}

fn spawn_todo(env: TodoEnvironment) -> ActorHandle<TodoMachine> {
    Actor::spawn("todo", TodoMachine::new(), TodoState::default(), env)
}

/// Task-side half of the supervisor.
struct Shell {
    machine: SupervisorMachine,
    phase: SupervisorPhase,
    config: SupervisorConfig,
    auth_env: AuthEnvironment,
    todo_env: TodoEnvironment,
    children: Children<Role>,
    handles: Arc<RwLock<ChildHandles>>,
    events: mpsc::UnboundedReceiver<SupervisorEvent>,
    /// Sender into our own queue, wired into respawned auth children.
    raise: mpsc::UnboundedSender<SupervisorEvent>,
    phase_tx: watch::Sender<SupervisorPhase>,
    stop: watch::Receiver<bool>,
}

impl Shell {
    async fn run(mut self) {
        tracing::debug!("supervisor started");

        loop {
            let event = tokio::select! {
                _ = self.stop.wait_for(|stopped| *stopped) => break,
                next = self.events.recv() => match next {
                    Some(event) => event,
                    None => break,
                },
            };
            self.process(event).await;
        }

        self.children.stop_all();
        tracing::debug!("supervisor stopped");
    }

    async fn process(&mut self, event: SupervisorEvent) {
        let commands = self.machine.handle(&mut self.phase, event);
        let _ = self.phase_tx.send(self.phase);

        for command in commands {
            self.execute(command).await;
        }
    }

    async fn execute(&mut self, command: SupervisorCommand) {
        match command {
            SupervisorCommand::StopChild(role) => {
                self.children.stop(&role);

                // A logout under the respawn policy readies a fresh auth
                // child for the next login attempt.
                if role == Role::Todo && self.config.respawn == RespawnPolicy::OnTransition {
                    let auth = spawn_auth(&self.raise, self.auth_env.clone());
                    self.children.adopt(Role::Auth, &auth);
                    self.handles.write().await.auth = Some(auth);
                }
            }
            SupervisorCommand::BeginTodoLoad => {
                if self.config.respawn == RespawnPolicy::OnTransition {
                    let needs_fresh = {
                        let handles = self.handles.read().await;
                        handles.todo.as_ref().is_none_or(|todo| todo.is_stopped())
                    };

                    if needs_fresh {
                        let todo = spawn_todo(self.todo_env.clone());
                        self.children.adopt(Role::Todo, &todo);
                        self.handles.write().await.todo = Some(todo);
                    }
                }

                let handles = self.handles.read().await;
                match handles.todo.as_ref() {
                    Some(todo) => {
                        // Under RespawnPolicy::Never this send fails against
                        // a todo child stopped by an earlier logout; the
                        // event is dropped.
                        if todo.send(TodoEvent::Load).is_err() {
                            tracing::warn!("todo load dropped: child is stopped");
                        }
                    }
                    None => tracing::warn!("todo load dropped: no child"),
                }
            }
        }
    }
}
