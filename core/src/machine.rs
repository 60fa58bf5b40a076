//! The Machine trait — core abstraction for state-machine business logic.

use crate::effect::Effect;
use smallvec::SmallVec;

/// A finite-state machine: a pure transition function over owned state.
///
/// # Type Parameters
///
/// - `State`: the `{phase, context}` record this machine carries across
///   transitions
/// - `Event`: the closed sum type of inputs (UI commands and settled
///   invocation outcomes); dispatch is an exhaustive pattern match, so a new
///   variant is a compile error until every machine arm handles it
/// - `Output`: messages delivered to the parent actor via
///   [`Effect::Emit`]; `()` for machines that never notify a parent
/// - `Environment`: injected dependencies (service handles) the machine's
///   invocations capture
///
/// # Contract
///
/// `handle` must not block or perform I/O; anything asynchronous is returned
/// as an [`Effect`]. Events that have no transition in the current phase are
/// ignored — the machine returns no effects and leaves state untouched,
/// never an error.
///
/// # Example
///
/// ```ignore
/// impl Machine for TodoMachine {
///     type State = TodoState;
///     type Event = TodoEvent;
///     type Output = ();
///     type Environment = TodoEnvironment;
///
///     fn handle(
///         &self,
///         state: &mut TodoState,
///         event: TodoEvent,
///         env: &TodoEnvironment,
///     ) -> SmallVec<[Effect<TodoEvent, ()>; 4]> {
///         // transition table goes here
///     }
/// }
/// ```
pub trait Machine {
    /// The state record this machine operates on
    type State;

    /// The event type this machine processes
    type Event;

    /// The message type emitted to the parent actor
    type Output;

    /// The environment type with injected dependencies
    type Environment;

    /// Process one event to completion.
    ///
    /// Mutates `state` in place and returns effect descriptions for the
    /// runtime to execute.
    fn handle(
        &self,
        state: &mut Self::State,
        event: Self::Event,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Event, Self::Output>; 4]>;
}
