//! Declarative macros for ergonomic effect construction.
//!
//! These macros reduce boilerplate when creating `Effect` variants from
//! inside machine transition arms.

/// Create an `Effect::Invoke` from an async block.
///
/// The block must evaluate to `Option<Event>`; the settled event is fed back
/// into the machine before the actor's queue resumes.
///
/// # Example
///
/// ```rust,ignore
/// use todoflow_core::invoke;
///
/// invoke! {
///     let outcome = service.list_todos().await;
///     Some(TodoEvent::LoadSettled(outcome))
/// }
/// ```
#[macro_export]
macro_rules! invoke {
    ($($body:tt)*) => {
        $crate::effect::Effect::Invoke(::std::boxed::Box::pin(async move { $($body)* }))
    };
}

/// Create an `Effect::Schedule` for a keyed, cancellable delayed event.
///
/// # Example
///
/// ```rust,ignore
/// use todoflow_core::schedule;
/// use std::time::Duration;
///
/// schedule! {
///     timer: "clear-error",
///     after: Duration::from_millis(2000),
///     event: AuthEvent::ClearError
/// }
/// ```
#[macro_export]
macro_rules! schedule {
    (
        timer: $timer:expr,
        after: $after:expr,
        event: $event:expr
    ) => {
        $crate::effect::Effect::Schedule {
            timer: $timer,
            after: $after,
            event: $event,
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestEvent {
        Settled { value: i32 },
        TimeoutExpired,
    }

    #[test]
    fn test_invoke_macro() {
        let effect: Effect<TestEvent, ()> = invoke! {
            // Simulate async work
            Some(TestEvent::Settled { value: 42 })
        };

        assert!(matches!(effect, Effect::Invoke(_)));
    }

    #[test]
    fn test_schedule_macro() {
        let effect: Effect<TestEvent, ()> = schedule! {
            timer: "timeout",
            after: Duration::from_secs(30),
            event: TestEvent::TimeoutExpired
        };

        assert!(matches!(effect, Effect::Schedule { timer: "timeout", .. }));
    }
}
