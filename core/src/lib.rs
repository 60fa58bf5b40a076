//! # Todoflow Core
//!
//! Core traits and types for the Todoflow actor architecture.
//!
//! This crate provides the fundamental abstractions for modeling features as
//! finite-state machines driven by events:
//!
//! - **State**: a `{phase, context}` record carried across transitions
//! - **Event**: all possible inputs to a machine (UI commands and settled
//!   invocation outcomes), a closed sum type per machine
//! - **Machine**: pure function `(State, Event, Environment) → (State, Effects)`
//! - **Effect**: side-effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! Machines never perform I/O themselves. A remote call is described as an
//! [`effect::Effect::Invoke`] returned from [`machine::Machine::handle`]; the
//! runtime executes it, parks the actor until it settles, and feeds the
//! settled event back into the machine.
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_core::{machine::Machine, effect::Effect, smallvec, SmallVec};
//!
//! impl Machine for CounterMachine {
//!     type State = CounterState;
//!     type Event = CounterEvent;
//!     type Output = ();
//!     type Environment = ();
//!
//!     fn handle(
//!         &self,
//!         state: &mut CounterState,
//!         event: CounterEvent,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterEvent, ()>; 4]> {
//!         match event {
//!             CounterEvent::Increment => {
//!                 state.count += 1;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use smallvec::{SmallVec, smallvec};

pub mod effect;
pub mod guard;
pub mod machine;

mod effect_macros;
