//! Actor spawning and the live handle collaborators hold.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use todoflow_core::effect::{Effect, TimerKey};
use todoflow_core::machine::Machine;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::ActorError;

/// Callback receiving the messages a machine emits to its parent.
///
/// Wired at spawn time; typically a closure forwarding into the parent
/// actor's own queue.
pub type Outbox<Output> = Box<dyn Fn(Output) + Send + Sync>;

/// Spawns machines onto their own tasks.
///
/// An actor owns its machine's state exclusively and processes its queue one
/// event to completion at a time. All coordination with the rest of the
/// system happens through [`ActorHandle`].
pub struct Actor;

impl Actor {
    /// Spawn a machine as an actor with no parent wired.
    ///
    /// [`Effect::Emit`] messages from such an actor are dropped (logged at
    /// trace level).
    pub fn spawn<M>(
        name: &'static str,
        machine: M,
        initial_state: M::State,
        environment: M::Environment,
    ) -> ActorHandle<M>
    where
        M: Machine + Send + 'static,
        M::State: Clone + Send + Sync + 'static,
        M::Event: Send + 'static,
        M::Output: Send + 'static,
        M::Environment: Send + 'static,
    {
        Self::spawn_inner(name, machine, initial_state, environment, None)
    }

    /// Spawn a machine as a child actor, wiring its emitted messages into
    /// `outbox`.
    ///
    /// The outbox runs on the actor's task; it should do nothing heavier
    /// than forwarding into another actor's queue.
    pub fn spawn_with_outbox<M, F>(
        name: &'static str,
        machine: M,
        initial_state: M::State,
        environment: M::Environment,
        outbox: F,
    ) -> ActorHandle<M>
    where
        M: Machine + Send + 'static,
        M::State: Clone + Send + Sync + 'static,
        M::Event: Send + 'static,
        M::Output: Send + 'static,
        M::Environment: Send + 'static,
        F: Fn(M::Output) + Send + Sync + 'static,
    {
        Self::spawn_inner(name, machine, initial_state, environment, Some(Box::new(outbox)))
    }

    fn spawn_inner<M>(
        name: &'static str,
        machine: M,
        initial_state: M::State,
        environment: M::Environment,
        outbox: Option<Outbox<M::Output>>,
    ) -> ActorHandle<M>
    where
        M: Machine + Send + 'static,
        M::State: Clone + Send + Sync + 'static,
        M::Event: Send + 'static,
        M::Output: Send + 'static,
        M::Environment: Send + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(initial_state.clone());
        let (stop_tx, stop_rx) = watch::channel(false);

        let worker = Worker {
            name,
            machine,
            state: initial_state,
            environment,
            outbox,
            events: events_rx,
            raise: events_tx.clone(),
            snapshot: snapshot_tx,
            stop: stop_rx,
            timers: Timers::new(name),
        };

        tokio::spawn(worker.run());

        ActorHandle {
            name,
            events: events_tx,
            snapshot: snapshot_rx,
            stop: Arc::new(stop_tx),
        }
    }
}

/// Live reference to a running actor.
///
/// Clonable: the UI layer and the supervisor hold clones of the same handle.
/// A handle offers exactly the surface the architecture allows collaborators:
/// `send(event)`, a snapshot accessor, a change subscription, and `stop()`.
///
/// The actor task runs until one of:
/// - [`ActorHandle::stop`] is called on any clone,
/// - every clone of the handle has been dropped.
pub struct ActorHandle<M: Machine> {
    name: &'static str,
    events: mpsc::UnboundedSender<M::Event>,
    snapshot: watch::Receiver<M::State>,
    stop: Arc<watch::Sender<bool>>,
}

impl<M: Machine> Clone for ActorHandle<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            events: self.events.clone(),
            snapshot: self.snapshot.clone(),
            stop: Arc::clone(&self.stop),
        }
    }
}

impl<M: Machine> ActorHandle<M>
where
    M::State: Clone,
{
    /// Enqueue an event for the actor.
    ///
    /// Delivery is FIFO and non-blocking; the event is processed after
    /// everything already queued, and after the in-flight invocation settles
    /// if the actor is currently suspended.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Stopped`] if the actor has been stopped.
    pub fn send(&self, event: M::Event) -> Result<(), ActorError> {
        if *self.stop.borrow() {
            metrics::counter!("actor.sends.rejected", "actor" => self.name).increment(1);
            tracing::trace!(actor = self.name, "event dropped: actor stopped");
            return Err(ActorError::Stopped);
        }

        self.events.send(event).map_err(|_| ActorError::Stopped)
    }

    /// Current `{phase, context}` snapshot of the actor's state.
    #[must_use]
    pub fn snapshot(&self) -> M::State {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to state changes.
    ///
    /// The returned receiver yields a fresh snapshot after every processed
    /// event; the UI layer re-renders from it.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<M::State> {
        self.snapshot.clone()
    }

    /// Stop the actor.
    ///
    /// Cancels the in-flight invocation (its callback can no longer mutate
    /// this actor's state) and every pending timer, then ends the actor
    /// task. Subsequent [`ActorHandle::send`] calls on any clone return
    /// [`ActorError::Stopped`].
    pub fn stop(&self) {
        tracing::debug!(actor = self.name, "stop requested");
        let _ = self.stop.send(true);
    }

    /// Whether [`ActorHandle::stop`] has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }

    /// The name this actor was spawned under (used in logs and metrics).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Control flow signal from event processing back to the actor loop.
#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Stopped,
}

/// The task-side half of an actor.
struct Worker<M: Machine> {
    name: &'static str,
    machine: M,
    state: M::State,
    environment: M::Environment,
    outbox: Option<Outbox<M::Output>>,
    events: mpsc::UnboundedReceiver<M::Event>,
    /// Sender into our own queue, handed to timers for delayed self-raises.
    raise: mpsc::UnboundedSender<M::Event>,
    snapshot: watch::Sender<M::State>,
    stop: watch::Receiver<bool>,
    timers: Timers,
}

impl<M> Worker<M>
where
    M: Machine + Send + 'static,
    M::State: Clone + Send + Sync + 'static,
    M::Event: Send + 'static,
    M::Output: Send + 'static,
    M::Environment: Send + 'static,
{
    async fn run(mut self) {
        tracing::debug!(actor = self.name, "actor started");

        loop {
            let event = tokio::select! {
                // Completes on stop() or when every handle clone is gone
                _ = self.stop.wait_for(|stopped| *stopped) => break,
                next = self.events.recv() => match next {
                    Some(event) => event,
                    None => break,
                },
            };
            if self.process(event).await == Flow::Stopped {
                break;
            }
        }

        // Dropping `timers` aborts every pending delayed self-raise.
        tracing::debug!(actor = self.name, "actor stopped");
    }

    /// Process one event to completion, including any settled invocation
    /// outcomes it leads to.
    ///
    /// Settled events are processed ahead of the main queue: the actor
    /// resumes from an invocation before it looks at anything that arrived
    /// while it was suspended.
    async fn process(&mut self, event: M::Event) -> Flow {
        let mut pending = VecDeque::with_capacity(1);
        pending.push_back(event);

        while let Some(event) = pending.pop_front() {
            let span = tracing::debug_span!("actor_process", actor = self.name);
            let effects = {
                let _enter = span.enter();
                self.machine.handle(&mut self.state, event, &self.environment)
            };
            metrics::counter!("actor.events.processed", "actor" => self.name).increment(1);

            // Publish before executing effects so observers see the working
            // phase while an invocation is in flight.
            let _ = self.snapshot.send(self.state.clone());

            for effect in effects {
                match effect {
                    Effect::None => {}
                    Effect::Emit(output) => {
                        metrics::counter!("actor.outputs.emitted", "actor" => self.name)
                            .increment(1);
                        match &self.outbox {
                            Some(outbox) => outbox(output),
                            None => {
                                tracing::trace!(actor = self.name, "output dropped: no parent wired");
                            }
                        }
                    }
                    Effect::Schedule {
                        timer,
                        after,
                        event,
                    } => self.timers.arm(timer, after, event, self.raise.clone()),
                    Effect::CancelTimer { timer } => self.timers.disarm(timer),
                    Effect::Invoke(invocation) => {
                        tracing::debug!(actor = self.name, "invocation started");
                        let started = std::time::Instant::now();

                        tokio::select! {
                            _ = self.stop.wait_for(|stopped| *stopped) => {
                                tracing::debug!(actor = self.name, "invocation cancelled by stop");
                                return Flow::Stopped;
                            }
                            settled = invocation => {
                                metrics::histogram!(
                                    "actor.invocation.duration_seconds",
                                    "actor" => self.name
                                )
                                .record(started.elapsed().as_secs_f64());
                                tracing::debug!(actor = self.name, "invocation settled");

                                if let Some(event) = settled {
                                    pending.push_back(event);
                                }
                            }
                        }
                    }
                }
            }
        }

        Flow::Continue
    }
}

/// Pending keyed timers for one actor.
///
/// Arming an already-armed key replaces the pending timer. Dropping the set
/// (actor stop) aborts everything still pending.
struct Timers {
    actor: &'static str,
    armed: HashMap<TimerKey, JoinHandle<()>>,
}

impl Timers {
    fn new(actor: &'static str) -> Self {
        Self {
            actor,
            armed: HashMap::new(),
        }
    }

    fn arm<E: Send + 'static>(
        &mut self,
        key: TimerKey,
        after: Duration,
        event: E,
        raise: mpsc::UnboundedSender<E>,
    ) {
        tracing::trace!(actor = self.actor, timer = key, delay_ms = after.as_millis(), "timer armed");
        metrics::counter!("actor.timers.armed", "actor" => self.actor).increment(1);

        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // The queue may already be closed during teardown.
            let _ = raise.send(event);
        });

        if let Some(previous) = self.armed.insert(key, task) {
            previous.abort();
        }
    }

    fn disarm(&mut self, key: TimerKey) {
        if let Some(task) = self.armed.remove(key) {
            task.abort();
            tracing::trace!(actor = self.actor, timer = key, "timer cancelled");
            metrics::counter!("actor.timers.cancelled", "actor" => self.actor).increment(1);
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for task in self.armed.values() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

    use super::*;
    use todoflow_core::machine::Machine;
    use todoflow_core::{SmallVec, smallvec};

    #[derive(Clone, Debug, Default)]
    struct RecorderState {
        seen: Vec<u32>,
    }

    #[derive(Clone, Debug)]
    enum RecorderEvent {
        Record(u32),
    }

    struct RecorderMachine;

    impl Machine for RecorderMachine {
        type State = RecorderState;
        type Event = RecorderEvent;
        type Output = ();
        type Environment = ();

        fn handle(
            &self,
            state: &mut Self::State,
            event: Self::Event,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Event, Self::Output>; 4]> {
            let RecorderEvent::Record(n) = event;
            state.seen.push(n);
            smallvec![]
        }
    }

    #[tokio::test]
    async fn events_process_in_arrival_order() {
        let handle = Actor::spawn("recorder", RecorderMachine, RecorderState::default(), ());

        for n in 0..8 {
            handle.send(RecorderEvent::Record(n)).unwrap();
        }

        let mut watch = handle.watch();
        while watch.borrow().seen.len() < 8 {
            watch.changed().await.unwrap();
        }

        assert_eq!(handle.snapshot().seen, (0..8).collect::<Vec<_>>());
        handle.stop();
    }

    #[tokio::test]
    async fn send_after_stop_is_rejected() {
        let handle = Actor::spawn("recorder", RecorderMachine, RecorderState::default(), ());

        handle.stop();
        assert!(handle.is_stopped());
        assert_eq!(
            handle.send(RecorderEvent::Record(1)),
            Err(ActorError::Stopped)
        );
    }
}
