//! The authentication machine.
//!
//! Collects credentials, invokes the remote login/register operations, and
//! reports a successful login to its parent. Failure and confirmation
//! messages are transient: a keyed 2-second timer raises the matching clear
//! event back into the machine, which keeps "toast" UX out of the UI layer
//! entirely.

use std::sync::Arc;
use std::time::Duration;

use todoflow_client::{AuthSession, RemoteError};
use todoflow_core::effect::{Effect, TimerKey};
use todoflow_core::machine::Machine;
use todoflow_core::{SmallVec, invoke, schedule, smallvec};

use crate::environment::AuthEnvironment;

/// Confirmation shown after a successful registration.
pub const REGISTRATION_CONFIRMATION: &str = "Registration is successful";

/// How long a failure or confirmation message stays before it self-clears.
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(2000);

const CLEAR_ERROR_TIMER: TimerKey = "auth.clear-error";
const CLEAR_MESSAGE_TIMER: TimerKey = "auth.clear-message";

/// Where the authentication flow currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// Waiting for the user to submit credentials.
    #[default]
    EnteringCredentials,
    /// Login invocation in flight.
    LoggingIn,
    /// Register invocation in flight.
    Registering,
    /// Terminal: authenticated, no further events accepted.
    LoginSuccessful,
}

/// Data the authentication machine carries across transitions.
///
/// `email` and `password` are transient copies of the last submission; the
/// machine never scrubs them (clearing the form is the UI's business).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Email of the last submission.
    pub email: String,
    /// Password of the last submission.
    pub password: String,
    /// Last failure message, if any.
    pub error: Option<String>,
    /// Transient informational message, if any.
    pub message: Option<String>,
}

/// Snapshot of the authentication machine: phase plus context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Current phase.
    pub phase: AuthPhase,
    /// Current context.
    pub context: AuthContext,
}

/// Inputs to the authentication machine.
///
/// `LoginSettled` / `RegisterSettled` are raised by the runtime when an
/// invocation completes; the UI never sends them.
#[derive(Clone, Debug)]
pub enum AuthEvent {
    /// Submit credentials for login.
    Login {
        /// Email to authenticate with.
        email: String,
        /// Password to authenticate with.
        password: String,
    },
    /// Submit credentials for registration.
    Register {
        /// Email to register.
        email: String,
        /// Password to register.
        password: String,
    },
    /// Clear the transient informational message.
    ClearMessage,
    /// Clear the failure message.
    ClearError,
    /// Outcome of the login invocation.
    LoginSettled(Result<AuthSession, RemoteError>),
    /// Outcome of the register invocation.
    RegisterSettled(Result<AuthSession, RemoteError>),
}

/// Messages the authentication machine emits to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOutput {
    /// A login succeeded; emitted exactly once, on entering the terminal phase.
    Authenticated,
}

/// The authentication machine.
pub struct AuthMachine {
    clear_after: Duration,
}

impl AuthMachine {
    /// Machine with the standard 2-second message clear delay.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clear_after: DEFAULT_CLEAR_DELAY,
        }
    }

    /// Override the clear delay.
    #[must_use]
    pub const fn with_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_after = delay;
        self
    }

    fn failure(&self, context: &mut AuthContext, err: &RemoteError) -> Effect<AuthEvent, AuthOutput> {
        tracing::debug!(error = %err, "credential submission failed");
        context.error = Some(err.message());

        schedule! {
            timer: CLEAR_ERROR_TIMER,
            after: self.clear_after,
            event: AuthEvent::ClearError
        }
    }
}

impl Default for AuthMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for AuthMachine {
    type State = AuthState;
    type Event = AuthEvent;
    type Output = AuthOutput;
    type Environment = AuthEnvironment;

    fn handle(
        &self,
        state: &mut Self::State,
        event: Self::Event,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Event, Self::Output>; 4]> {
        match state.phase {
            AuthPhase::EnteringCredentials => match event {
                AuthEvent::Login { email, password } => {
                    state.context.email.clone_from(&email);
                    state.context.password.clone_from(&password);
                    state.phase = AuthPhase::LoggingIn;

                    let service = Arc::clone(&env.service);
                    smallvec![
                        // Leaving the phase disarms any pending clears.
                        Effect::CancelTimer {
                            timer: CLEAR_ERROR_TIMER
                        },
                        Effect::CancelTimer {
                            timer: CLEAR_MESSAGE_TIMER
                        },
                        invoke! {
                            Some(AuthEvent::LoginSettled(service.login(email, password).await))
                        },
                    ]
                }
                AuthEvent::Register { email, password } => {
                    state.context.email.clone_from(&email);
                    state.context.password.clone_from(&password);
                    state.phase = AuthPhase::Registering;

                    let service = Arc::clone(&env.service);
                    smallvec![
                        Effect::CancelTimer {
                            timer: CLEAR_ERROR_TIMER
                        },
                        Effect::CancelTimer {
                            timer: CLEAR_MESSAGE_TIMER
                        },
                        invoke! {
                            Some(AuthEvent::RegisterSettled(
                                service.register(email, password).await
                            ))
                        },
                    ]
                }
                AuthEvent::ClearMessage => {
                    state.context.message = None;
                    smallvec![]
                }
                AuthEvent::ClearError => {
                    state.context.error = None;
                    smallvec![]
                }
                AuthEvent::LoginSettled(_) | AuthEvent::RegisterSettled(_) => smallvec![],
            },

            AuthPhase::LoggingIn => match event {
                AuthEvent::LoginSettled(Ok(session)) => {
                    tracing::info!(email = %session.user.email, "login succeeded");
                    state.phase = AuthPhase::LoginSuccessful;
                    smallvec![Effect::Emit(AuthOutput::Authenticated)]
                }
                AuthEvent::LoginSettled(Err(err)) => {
                    state.phase = AuthPhase::EnteringCredentials;
                    smallvec![self.failure(&mut state.context, &err)]
                }
                _ => smallvec![],
            },

            AuthPhase::Registering => match event {
                AuthEvent::RegisterSettled(Ok(session)) => {
                    tracing::info!(email = %session.user.email, "registration succeeded");
                    state.phase = AuthPhase::EnteringCredentials;
                    state.context.message = Some(REGISTRATION_CONFIRMATION.to_string());
                    smallvec![schedule! {
                        timer: CLEAR_MESSAGE_TIMER,
                        after: self.clear_after,
                        event: AuthEvent::ClearMessage
                    }]
                }
                AuthEvent::RegisterSettled(Err(err)) => {
                    state.phase = AuthPhase::EnteringCredentials;
                    smallvec![self.failure(&mut state.context, &err)]
                }
                _ => smallvec![],
            },

            // Terminal: the machine no longer reacts to anything.
            AuthPhase::LoginSuccessful => smallvec![],
        }
    }
}
