//! Effect descriptions returned by machines.
//!
//! Effects are NOT executed when a machine returns them. They are values
//! describing what the runtime should do next: suspend the actor on a remote
//! call, arm or disarm a named timer, or hand a message to the parent actor.
//! Keeping effects as data is what keeps machines pure and directly testable.

use futures::future::BoxFuture;
use std::time::Duration;

/// The future an [`Effect::Invoke`] suspends on.
///
/// Resolves to `Some(event)` to feed a settled outcome back into the machine,
/// or `None` when the invocation produces nothing to report.
pub type InvokeFuture<Event> = BoxFuture<'static, Option<Event>>;

/// Identifier for a scheduled timer.
///
/// Scheduling under a key that is already armed replaces the pending timer,
/// so a machine that re-enters a phase gets a fresh countdown rather than a
/// stale one.
pub type TimerKey = &'static str;

/// Effect type — describes a side effect to be executed by the actor runtime.
///
/// # Type Parameters
///
/// - `Event`: the machine's own event type (feedback loop)
/// - `Output`: the message type delivered to the parent actor via [`Effect::Emit`]
pub enum Effect<Event, Output> {
    /// No-op effect
    None,

    /// Asynchronous invocation (remote call).
    ///
    /// The actor suspends until the future settles: queued events wait, and
    /// the settled event (if any) is processed before the queue resumes.
    /// Stopping the actor cancels the future.
    Invoke(InvokeFuture<Event>),

    /// Arm a cancellable timer that raises `event` into the actor's own
    /// queue after `after` elapses.
    Schedule {
        /// Timer identity; re-scheduling the same key replaces the pending timer
        timer: TimerKey,
        /// How long to wait
        after: Duration,
        /// Event raised into the actor's own queue on expiry
        event: Event,
    },

    /// Disarm a pending timer. No-op if the key is not armed.
    CancelTimer {
        /// Timer identity to disarm
        timer: TimerKey,
    },

    /// Deliver a message to the parent actor's queue.
    ///
    /// Delivery is an event send, not a synchronous call; an actor with no
    /// parent wired drops the message.
    Emit(Output),
}

// Manual Debug implementation since the invoke future doesn't implement Debug
impl<Event, Output> std::fmt::Debug for Effect<Event, Output>
where
    Event: std::fmt::Debug,
    Output: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Invoke(_) => write!(f, "Effect::Invoke(<future>)"),
            Effect::Schedule {
                timer,
                after,
                event,
            } => f
                .debug_struct("Effect::Schedule")
                .field("timer", timer)
                .field("after", after)
                .field("event", event)
                .finish(),
            Effect::CancelTimer { timer } => f
                .debug_struct("Effect::CancelTimer")
                .field("timer", timer)
                .finish(),
            Effect::Emit(output) => f.debug_tuple("Effect::Emit").field(output).finish(),
        }
    }
}

impl<Event, Output> Effect<Event, Output> {
    /// Returns `true` if this effect suspends the actor on an invocation.
    #[must_use]
    pub const fn is_invoke(&self) -> bool {
        matches!(self, Effect::Invoke(_))
    }

    /// Returns `true` if this effect is a no-op.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestEvent {
        Tick,
    }

    #[test]
    fn debug_formats_without_future_contents() {
        let effect: Effect<TestEvent, ()> = Effect::Invoke(Box::pin(async { None }));
        assert_eq!(format!("{effect:?}"), "Effect::Invoke(<future>)");
    }

    #[test]
    fn schedule_carries_timer_key() {
        let effect: Effect<TestEvent, ()> = Effect::Schedule {
            timer: "tick",
            after: Duration::from_millis(5),
            event: TestEvent::Tick,
        };
        assert!(format!("{effect:?}").contains("tick"));
        assert!(!effect.is_invoke());
    }

    #[test]
    fn effect_predicates() {
        let none: Effect<TestEvent, ()> = Effect::None;
        assert!(none.is_none());
        assert!(!none.is_invoke());
    }
}
