//! Property tests for the todo machine's pure transition table.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use todoflow_core::machine::Machine;
use todoflow_client::{Todo, TodoId};
use todoflow_machines::prelude::*;
use todoflow_testing::mocks::FailingTodoService;

fn loaded() -> TodoState {
    TodoState {
        phase: TodoPhase::Loaded,
        ..TodoState::default()
    }
}

fn env() -> TodoEnvironment {
    // Invocation futures are constructed but never run in these tests.
    TodoEnvironment::new(Arc::new(FailingTodoService::new("unused")))
}

proptest! {
    /// Any sequence of successful adds grows the list by exactly one entry
    /// per add, preserving order and id uniqueness.
    #[test]
    fn successful_adds_grow_the_list_one_by_one(
        texts in proptest::collection::vec("[a-z][a-z ]{0,19}", 1..16)
    ) {
        let machine = TodoMachine::new();
        let env = env();
        let mut state = loaded();

        for (n, text) in texts.iter().enumerate() {
            let _ = machine.handle(&mut state, TodoEvent::Add { text: text.clone() }, &env);
            prop_assert_eq!(state.phase, TodoPhase::Adding);

            let served = Todo {
                id: TodoId::new(format!("srv-{n}")),
                text: text.clone(),
                completed: false,
            };
            let _ = machine.handle(&mut state, TodoEvent::AddSettled(Ok(served)), &env);
            prop_assert_eq!(state.phase, TodoPhase::Loaded);
            prop_assert_eq!(state.context.list.len(), n + 1);
        }

        let ids: HashSet<&str> = state.context.list.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids.len(), texts.len());

        let stored: Vec<&str> = state.context.list.iter().map(|t| t.text.as_str()).collect();
        let sent: Vec<&str> = texts.iter().map(String::as_str).collect();
        prop_assert_eq!(stored, sent);
    }

    /// Blank-text adds are dropped without a state change, wherever they
    /// land in a sequence of valid adds.
    #[test]
    fn blank_adds_never_change_state(
        blanks in proptest::collection::vec(" {0,5}", 1..8)
    ) {
        let machine = TodoMachine::new();
        let env = env();
        let mut state = loaded();

        for blank in blanks {
            let before = state.clone();
            let effects = machine.handle(&mut state, TodoEvent::Add { text: blank }, &env);
            prop_assert!(effects.is_empty());
            prop_assert_eq!(&state, &before);
        }
    }
}
