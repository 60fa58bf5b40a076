//! The todo-list machine.
//!
//! Remote-backed CRUD lifecycle: load the list, then add, toggle, update,
//! and remove items one invocation at a time. The server is authoritative —
//! the list only changes when a call settles successfully, never
//! optimistically. A failed mutation records its message and returns to the
//! steady phase; the list stays interactive after any failure.
//!
//! The one exception is loading: a failed load leaves the machine parked in
//! `Loading`. There is deliberately no retry transition — recovery takes a
//! fresh machine instance.

use std::sync::Arc;

use todoflow_client::{DeleteReceipt, RemoteError, Todo, TodoId, ToggleReceipt, UpdateReceipt};
use todoflow_core::effect::Effect;
use todoflow_core::guard::{Guard, Predicate};
use todoflow_core::machine::Machine;
use todoflow_core::{SmallVec, invoke, smallvec};

use crate::environment::TodoEnvironment;

/// Where the todo lifecycle currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TodoPhase {
    /// Spawned, not yet told to fetch. Only `Load` is recognized here, so
    /// the supervisor controls when fetching starts.
    #[default]
    Idle,
    /// List fetch in flight. A failed fetch stays here.
    Loading,
    /// Steady state: the list is interactive.
    Loaded,
    /// Create invocation in flight.
    Adding,
    /// Toggle invocation in flight.
    Toggling,
    /// Text-update invocation in flight.
    Updating,
    /// Delete invocation in flight.
    Removing,
}

/// Data the todo machine carries across transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoListContext {
    /// The list, in server order (load) with created items appended.
    /// Entries have unique ids.
    pub list: Vec<Todo>,
    /// Last failure message. Never auto-cleared; overwritten by the next
    /// failure and left stale by successes.
    pub error: Option<String>,
}

impl TodoListContext {
    fn record_failure(&mut self, err: &RemoteError) {
        tracing::debug!(error = %err, "todo operation failed");
        self.error = Some(err.message());
    }

    /// Merge a toggle receipt; a stale id merges into nothing.
    fn apply_toggle(&mut self, receipt: &ToggleReceipt) {
        if let Some(todo) = self.list.iter_mut().find(|todo| todo.id == receipt.id) {
            todo.completed = receipt.completed;
        }
    }

    /// Merge an update receipt; a stale id merges into nothing.
    fn apply_update(&mut self, receipt: &UpdateReceipt) {
        if let Some(todo) = self.list.iter_mut().find(|todo| todo.id == receipt.id) {
            todo.text.clone_from(&receipt.text);
        }
    }

    fn apply_remove(&mut self, receipt: &DeleteReceipt) {
        self.list.retain(|todo| todo.id != receipt.id);
    }
}

/// Snapshot of the todo machine: phase plus context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Current phase.
    pub phase: TodoPhase,
    /// Current context.
    pub context: TodoListContext,
}

/// Payload of [`TodoEvent::Update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Item to edit.
    pub id: TodoId,
    /// Replacement text.
    pub text: String,
    /// The item's current completion flag as the UI sees it; editing a
    /// completed item is refused at the machine level.
    pub completed: bool,
}

/// Inputs to the todo machine.
///
/// The `…Settled` variants are raised by the runtime when an invocation
/// completes; the UI never sends them.
#[derive(Clone, Debug)]
pub enum TodoEvent {
    /// Begin fetching the list. Recognized only in `Idle`.
    Load,
    /// Create an item with the given text.
    Add {
        /// Text of the new item; must be non-empty to pass the guard.
        text: String,
    },
    /// Flip an item's completion flag.
    Toggle {
        /// Item to toggle.
        id: TodoId,
    },
    /// Replace an item's text.
    Update(UpdateRequest),
    /// Delete an item.
    Remove {
        /// Item to delete.
        id: TodoId,
    },
    /// Outcome of the list fetch.
    LoadSettled(Result<Vec<Todo>, RemoteError>),
    /// Outcome of the create invocation.
    AddSettled(Result<Todo, RemoteError>),
    /// Outcome of the toggle invocation.
    ToggleSettled(Result<ToggleReceipt, RemoteError>),
    /// Outcome of the update invocation.
    UpdateSettled(Result<UpdateReceipt, RemoteError>),
    /// Outcome of the delete invocation.
    RemoveSettled(Result<DeleteReceipt, RemoteError>),
}

fn add_text_present(text: &String, _context: &TodoListContext) -> bool {
    !text.trim().is_empty()
}

fn update_text_present(request: &UpdateRequest, _context: &TodoListContext) -> bool {
    !request.text.trim().is_empty()
}

fn update_not_completed(request: &UpdateRequest, _context: &TodoListContext) -> bool {
    !request.completed
}

/// The todo machine.
pub struct TodoMachine {
    add_guard: Guard<String, TodoListContext>,
    update_guard: Guard<UpdateRequest, TodoListContext>,
}

impl TodoMachine {
    /// Machine with the standard guards.
    #[must_use]
    pub fn new() -> Self {
        Self {
            add_guard: Guard::all([add_text_present as Predicate<String, TodoListContext>]),
            update_guard: Guard::all([
                update_text_present as Predicate<UpdateRequest, TodoListContext>,
                update_not_completed,
            ]),
        }
    }
}

impl Default for TodoMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for TodoMachine {
    type State = TodoState;
    type Event = TodoEvent;
    type Output = ();
    type Environment = TodoEnvironment;

    #[allow(clippy::too_many_lines)] // one arm per transition
    fn handle(
        &self,
        state: &mut Self::State,
        event: Self::Event,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Event, Self::Output>; 4]> {
        match state.phase {
            TodoPhase::Idle => match event {
                TodoEvent::Load => {
                    state.phase = TodoPhase::Loading;
                    let service = Arc::clone(&env.service);
                    smallvec![invoke! {
                        Some(TodoEvent::LoadSettled(service.list_todos().await))
                    }]
                }
                _ => smallvec![],
            },

            TodoPhase::Loading => match event {
                TodoEvent::LoadSettled(Ok(list)) => {
                    tracing::debug!(count = list.len(), "todo list loaded");
                    state.context.list = list;
                    state.phase = TodoPhase::Loaded;
                    smallvec![]
                }
                TodoEvent::LoadSettled(Err(err)) => {
                    // Stays in Loading: there is no retry transition.
                    state.context.record_failure(&err);
                    smallvec![]
                }
                _ => smallvec![],
            },

            TodoPhase::Loaded => match event {
                TodoEvent::Add { text } => {
                    if !self.add_guard.check(&text, &state.context) {
                        tracing::trace!("add refused by guard");
                        return smallvec![];
                    }

                    state.phase = TodoPhase::Adding;
                    let service = Arc::clone(&env.service);
                    smallvec![invoke! {
                        Some(TodoEvent::AddSettled(service.create_todo(text).await))
                    }]
                }
                TodoEvent::Toggle { id } => {
                    state.phase = TodoPhase::Toggling;
                    let service = Arc::clone(&env.service);
                    smallvec![invoke! {
                        Some(TodoEvent::ToggleSettled(service.toggle_todo(id).await))
                    }]
                }
                TodoEvent::Update(request) => {
                    if !self.update_guard.check(&request, &state.context) {
                        tracing::trace!("update refused by guard");
                        return smallvec![];
                    }

                    state.phase = TodoPhase::Updating;
                    let service = Arc::clone(&env.service);
                    smallvec![invoke! {
                        Some(TodoEvent::UpdateSettled(
                            service.update_todo_text(request.id, request.text).await
                        ))
                    }]
                }
                TodoEvent::Remove { id } => {
                    state.phase = TodoPhase::Removing;
                    let service = Arc::clone(&env.service);
                    smallvec![invoke! {
                        Some(TodoEvent::RemoveSettled(service.delete_todo(id).await))
                    }]
                }
                _ => smallvec![],
            },

            TodoPhase::Adding => match event {
                TodoEvent::AddSettled(outcome) => {
                    match outcome {
                        Ok(todo) => state.context.list.push(todo),
                        Err(err) => state.context.record_failure(&err),
                    }
                    state.phase = TodoPhase::Loaded;
                    smallvec![]
                }
                _ => smallvec![],
            },

            TodoPhase::Toggling => match event {
                TodoEvent::ToggleSettled(outcome) => {
                    match outcome {
                        Ok(receipt) => state.context.apply_toggle(&receipt),
                        Err(err) => state.context.record_failure(&err),
                    }
                    state.phase = TodoPhase::Loaded;
                    smallvec![]
                }
                _ => smallvec![],
            },

            TodoPhase::Updating => match event {
                TodoEvent::UpdateSettled(outcome) => {
                    match outcome {
                        Ok(receipt) => state.context.apply_update(&receipt),
                        Err(err) => state.context.record_failure(&err),
                    }
                    state.phase = TodoPhase::Loaded;
                    smallvec![]
                }
                _ => smallvec![],
            },

            TodoPhase::Removing => match event {
                TodoEvent::RemoveSettled(outcome) => {
                    match outcome {
                        Ok(receipt) => state.context.apply_remove(&receipt),
                        Err(err) => state.context.record_failure(&err),
                    }
                    state.phase = TodoPhase::Loaded;
                    smallvec![]
                }
                _ => smallvec![],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todoflow_testing::mocks::FailingTodoService;
    use todoflow_testing::{MachineTest, assertions};

    fn test_env() -> TodoEnvironment {
        // Invocation futures are only constructed in these tests, never run.
        TodoEnvironment::new(Arc::new(FailingTodoService::new("unused")))
    }

    fn todo(id: &str, text: &str, completed: bool) -> Todo {
        Todo {
            id: TodoId::new(id),
            text: text.to_string(),
            completed,
        }
    }

    fn loaded_state(list: Vec<Todo>) -> TodoState {
        TodoState {
            phase: TodoPhase::Loaded,
            context: TodoListContext { list, error: None },
        }
    }

    #[test]
    fn idle_only_reacts_to_load() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState::default())
            .when_event(TodoEvent::Add {
                text: "too early".to_string(),
            })
            .then_state(|state| assert_eq!(state.phase, TodoPhase::Idle))
            .then_effects(assertions::assert_no_effects)
            .run();

        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState::default())
            .when_event(TodoEvent::Load)
            .then_state(|state| assert_eq!(state.phase, TodoPhase::Loading))
            .then_effects(assertions::assert_has_invoke)
            .run();
    }

    #[test]
    fn successful_load_replaces_the_list_wholesale() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState {
                phase: TodoPhase::Loading,
                context: TodoListContext {
                    list: vec![todo("stale", "old", false)],
                    error: None,
                },
            })
            .when_event(TodoEvent::LoadSettled(Ok(vec![
                todo("a", "first", false),
                todo("b", "second", true),
            ])))
            .then_state(|state| {
                assert_eq!(state.phase, TodoPhase::Loaded);
                let ids: Vec<_> = state.context.list.iter().map(|t| t.id.as_str()).collect();
                assert_eq!(ids, vec!["a", "b"]);
            })
            .run();
    }

    #[test]
    fn failed_load_stalls_in_loading() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState {
                phase: TodoPhase::Loading,
                context: TodoListContext::default(),
            })
            .when_event(TodoEvent::LoadSettled(Err(RemoteError::Transport(
                "connection refused".to_string(),
            ))))
            .then_state(|state| {
                assert_eq!(state.phase, TodoPhase::Loading);
                assert!(state.context.list.is_empty());
                assert_eq!(
                    state.context.error.as_deref(),
                    Some("transport error: connection refused")
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_with_empty_text_is_silently_dropped() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(loaded_state(vec![]))
            .when_event(TodoEvent::Add {
                text: "   ".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, TodoPhase::Loaded);
                assert!(state.context.list.is_empty());
                assert_eq!(state.context.error, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn add_success_appends_the_server_assigned_item() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState {
                phase: TodoPhase::Adding,
                context: TodoListContext {
                    list: vec![todo("a", "first", false)],
                    error: None,
                },
            })
            .when_event(TodoEvent::AddSettled(Ok(todo("b", "second", false))))
            .then_state(|state| {
                assert_eq!(state.phase, TodoPhase::Loaded);
                assert_eq!(state.context.list.len(), 2);
                assert_eq!(state.context.list[1].id.as_str(), "b");
            })
            .run();
    }

    #[test]
    fn update_of_a_completed_item_is_refused_without_a_remote_call() {
        let before = loaded_state(vec![todo("a", "done already", true)]);
        let expected = before.clone();

        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(before)
            .when_event(TodoEvent::Update(UpdateRequest {
                id: TodoId::new("a"),
                text: "rewrite".to_string(),
                completed: true,
            }))
            .then_state(move |state| assert_eq!(*state, expected))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn toggle_merges_only_the_matching_entry() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState {
                phase: TodoPhase::Toggling,
                context: TodoListContext {
                    list: vec![todo("a", "first", false), todo("b", "second", false)],
                    error: None,
                },
            })
            .when_event(TodoEvent::ToggleSettled(Ok(ToggleReceipt {
                id: TodoId::new("b"),
                completed: true,
            })))
            .then_state(|state| {
                assert_eq!(state.phase, TodoPhase::Loaded);
                assert!(!state.context.list[0].completed);
                assert!(state.context.list[1].completed);
            })
            .run();
    }

    #[test]
    fn toggle_with_a_stale_id_merges_into_nothing() {
        let before = TodoState {
            phase: TodoPhase::Toggling,
            context: TodoListContext {
                list: vec![todo("a", "first", false)],
                error: None,
            },
        };
        let mut expected = before.clone();
        expected.phase = TodoPhase::Loaded;

        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(before)
            .when_event(TodoEvent::ToggleSettled(Ok(ToggleReceipt {
                id: TodoId::new("gone"),
                completed: true,
            })))
            .then_state(move |state| assert_eq!(*state, expected))
            .run();
    }

    #[test]
    fn failed_mutation_returns_to_loaded_with_the_error_recorded() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState {
                phase: TodoPhase::Removing,
                context: TodoListContext {
                    list: vec![todo("a", "first", false)],
                    error: None,
                },
            })
            .when_event(TodoEvent::RemoveSettled(Err(RemoteError::Api(
                "Todo not found".to_string(),
            ))))
            .then_state(|state| {
                assert_eq!(state.phase, TodoPhase::Loaded);
                assert_eq!(state.context.list.len(), 1);
                assert_eq!(state.context.error.as_deref(), Some("Todo not found"));
            })
            .run();
    }

    #[test]
    fn remove_success_drops_the_matching_entry() {
        MachineTest::new(TodoMachine::new())
            .with_env(test_env())
            .given_state(TodoState {
                phase: TodoPhase::Removing,
                context: TodoListContext {
                    list: vec![todo("a", "first", false), todo("b", "second", false)],
                    error: None,
                },
            })
            .when_event(TodoEvent::RemoveSettled(Ok(DeleteReceipt {
                id: TodoId::new("a"),
            })))
            .then_state(|state| {
                assert_eq!(state.context.list.len(), 1);
                assert_eq!(state.context.list[0].id.as_str(), "b");
            })
            .run();
    }
}
