//! Role-keyed child registry for supervising actors.
//!
//! A supervisor owns the spawn/stop lifecycle of its children. This registry
//! is the ownership structure: one slot per role, holding stop authority
//! over the child actor. Stopping a role cancels the child's in-flight
//! invocation and pending timers (via [`ActorHandle::stop`]) and removes the
//! slot, after which no further events are deliverable to that instance.
//!
//! Typed event dispatch stays on the [`ActorHandle`] clones the supervisor
//! hands out; the registry only carries lifecycle control, so children of
//! different machine types can share one mapping.

use std::collections::HashMap;
use std::hash::Hash;

use todoflow_core::machine::Machine;

use crate::actor::ActorHandle;

/// Lifecycle control over a child actor, independent of its machine type.
pub trait ChildControl: Send + Sync {
    /// Stop the child, cancelling its pending work.
    fn stop(&self);

    /// Whether the child has been stopped.
    fn is_stopped(&self) -> bool;

    /// The name the child was spawned under.
    fn name(&self) -> &'static str;
}

impl<M> ChildControl for ActorHandle<M>
where
    M: Machine,
    M::State: Clone + Send + Sync,
    M::Event: Send,
{
    fn stop(&self) {
        ActorHandle::stop(self);
    }

    fn is_stopped(&self) -> bool {
        ActorHandle::is_stopped(self)
    }

    fn name(&self) -> &'static str {
        ActorHandle::name(self)
    }
}

/// Child actors owned by a supervisor, keyed by role.
pub struct Children<Role> {
    slots: HashMap<Role, Box<dyn ChildControl>>,
}

impl<Role> Children<Role>
where
    Role: Eq + Hash + std::fmt::Debug,
{
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Take ownership of a child's lifecycle under `role`.
    ///
    /// A previous child under the same role is stopped first: a role holds
    /// at most one live instance.
    pub fn adopt<M>(&mut self, role: Role, child: &ActorHandle<M>)
    where
        M: Machine + 'static,
        M::State: Clone + Send + Sync + 'static,
        M::Event: Send + 'static,
    {
        tracing::debug!(?role, child = ActorHandle::name(child), "child adopted");
        if let Some(previous) = self.slots.insert(role, Box::new(child.clone())) {
            previous.stop();
        }
    }

    /// Stop the child under `role` and remove its slot.
    ///
    /// Returns `false` if no child was registered under the role.
    pub fn stop(&mut self, role: &Role) -> bool {
        match self.slots.remove(role) {
            Some(child) => {
                tracing::debug!(?role, child = child.name(), "child stopped");
                child.stop();
                true
            }
            None => false,
        }
    }

    /// Whether a live child is registered under `role`.
    #[must_use]
    pub fn contains(&self, role: &Role) -> bool {
        self.slots.contains_key(role)
    }

    /// Stop every child and clear the registry.
    pub fn stop_all(&mut self) {
        for (role, child) in self.slots.drain() {
            tracing::debug!(?role, child = child.name(), "child stopped");
            child.stop();
        }
    }

    /// Number of live children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<Role> Default for Children<Role>
where
    Role: Eq + Hash + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Role> std::fmt::Debug for Children<Role>
where
    Role: Eq + Hash + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Children")
            .field("roles", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}
