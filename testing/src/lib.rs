//! # Todoflow Testing
//!
//! Testing utilities for Todoflow machines.
//!
//! This crate provides:
//! - [`MachineTest`]: a fluent Given-When-Then harness for pure machine
//!   transitions
//! - [`assertions`]: helpers for asserting on returned effects
//! - [`mocks`]: remote-service stand-ins (always-failing services, a
//!   call-counting wrapper)
//! - [`init_tracing`]: opt-in log output for tests
//!
//! ## Example
//!
//! ```ignore
//! use todoflow_testing::{MachineTest, assertions};
//!
//! MachineTest::new(TodoMachine::new())
//!     .with_env(test_env())
//!     .given_state(TodoState::default())
//!     .when_event(TodoEvent::Load)
//!     .then_state(|state| assert_eq!(state.phase, TodoPhase::Loading))
//!     .then_effects(assertions::assert_has_invoke)
//!     .run();
//! ```

pub mod mocks;

pub use machine_test::{MachineTest, assertions};

/// Install a fmt subscriber honoring `RUST_LOG`, once per process.
///
/// Safe to call from every test; repeated installation attempts are
/// silently ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
