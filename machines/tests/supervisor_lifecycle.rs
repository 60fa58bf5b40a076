//! Integration tests for the supervisor's child-lifecycle ownership.
//!
//! The handover scenario: spawn → login → auth child stopped, todo child
//! told to load exactly once → logout → todo child stopped. Both respawn
//! policies are covered.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use std::sync::Arc;
use std::time::Duration;

use todoflow_client::{InMemoryRemote, TodoService};
use todoflow_machines::prelude::*;
use todoflow_testing::mocks::CountingTodoService;
use tokio::sync::watch;

struct Fixture {
    supervisor: Supervisor,
    counting: Arc<CountingTodoService>,
}

async fn fixture(policy: RespawnPolicy) -> Fixture {
    todoflow_testing::init_tracing();

    let remote = Arc::new(InMemoryRemote::new());
    remote.seed_user("ada@example.com", "hunter2").await;
    remote.create_todo("pre-existing".to_string()).await.unwrap();

    let counting = Arc::new(CountingTodoService::new(
        Arc::clone(&remote) as Arc<dyn TodoService>
    ));

    let supervisor = Supervisor::spawn(
        AuthEnvironment::new(remote),
        TodoEnvironment::new(Arc::clone(&counting) as Arc<dyn TodoService>),
        SupervisorConfig { respawn: policy },
    );

    Fixture {
        supervisor,
        counting,
    }
}

async fn wait_phase(supervisor: &Supervisor, phase: SupervisorPhase) {
    let mut watch = supervisor.watch_phase();
    while *watch.borrow() != phase {
        watch.changed().await.unwrap();
    }
}

async fn wait_until(mut condition: impl AsyncFnMut() -> bool) {
    for _ in 0..500 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

async fn wait_watch<T: Clone + Send + Sync>(
    mut rx: watch::Receiver<T>,
    pred: impl Fn(&T) -> bool,
) -> T {
    loop {
        {
            let value = rx.borrow();
            if pred(&value) {
                return value.clone();
            }
        }
        rx.changed().await.unwrap();
    }
}

fn login() -> AuthEvent {
    AuthEvent::Login {
        email: "ada@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn login_hands_over_from_auth_to_todo() {
    let fx = fixture(RespawnPolicy::Never).await;

    // Both children exist from the start; the todo child idles until told.
    let auth = fx.supervisor.auth().await.unwrap();
    let todo = fx.supervisor.todo().await.unwrap();
    assert_eq!(fx.supervisor.phase(), SupervisorPhase::AwaitingAuth);
    assert_eq!(todo.snapshot().phase, TodoPhase::Idle);
    assert_eq!(fx.counting.counts().list, 0);

    auth.send(login()).unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::Authenticated).await;

    // The auth child is stopped: no further events deliverable.
    wait_until(async || auth.is_stopped()).await;
    assert!(auth.send(login()).is_err());
    assert_eq!(auth.snapshot().phase, AuthPhase::LoginSuccessful);

    // The todo child received exactly one load and fetched the list.
    let state = wait_watch(todo.watch(), |s: &TodoState| s.phase == TodoPhase::Loaded).await;
    assert_eq!(state.context.list.len(), 1);
    assert_eq!(state.context.list[0].text, "pre-existing");
    assert_eq!(fx.counting.counts().list, 1);

    fx.supervisor.stop();
}

#[tokio::test(start_paused = true)]
async fn logout_stops_the_todo_child() {
    let fx = fixture(RespawnPolicy::Never).await;

    let auth = fx.supervisor.auth().await.unwrap();
    auth.send(login()).unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::Authenticated).await;

    let todo = fx.supervisor.todo().await.unwrap();
    wait_watch(todo.watch(), |s: &TodoState| s.phase == TodoPhase::Loaded).await;

    fx.supervisor.logout().unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::AwaitingAuth).await;

    wait_until(async || todo.is_stopped()).await;
    assert!(todo.send(TodoEvent::Load).is_err());

    fx.supervisor.stop();
}

/// Under `RespawnPolicy::Never`, stopped children are never recreated, so
/// after a logout no further login can happen.
#[tokio::test(start_paused = true)]
async fn without_respawn_a_second_login_is_impossible() {
    let fx = fixture(RespawnPolicy::Never).await;

    let auth = fx.supervisor.auth().await.unwrap();
    auth.send(login()).unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::Authenticated).await;

    fx.supervisor.logout().unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::AwaitingAuth).await;

    // The only auth child there ever was is stopped for good.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let auth = fx.supervisor.auth().await.unwrap();
    assert!(auth.is_stopped());
    assert!(auth.send(login()).is_err());

    fx.supervisor.stop();
}

/// Under `RespawnPolicy::OnTransition`, logout readies a fresh auth child,
/// and the next login readies a fresh todo child.
#[tokio::test(start_paused = true)]
async fn with_respawn_the_session_can_cycle() {
    let fx = fixture(RespawnPolicy::OnTransition).await;

    let auth = fx.supervisor.auth().await.unwrap();
    auth.send(login()).unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::Authenticated).await;

    let todo = fx.supervisor.todo().await.unwrap();
    wait_watch(todo.watch(), |s: &TodoState| s.phase == TodoPhase::Loaded).await;
    assert_eq!(fx.counting.counts().list, 1);

    fx.supervisor.logout().unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::AwaitingAuth).await;

    // A fresh auth child replaces the stopped one.
    wait_until(async || {
        match fx.supervisor.auth().await {
            Some(handle) => !handle.is_stopped(),
            None => false,
        }
    })
    .await;

    let auth = fx.supervisor.auth().await.unwrap();
    assert_eq!(auth.snapshot().phase, AuthPhase::EnteringCredentials);

    auth.send(login()).unwrap();
    wait_phase(&fx.supervisor, SupervisorPhase::Authenticated).await;

    // A fresh todo child loads again.
    wait_until(async || {
        match fx.supervisor.todo().await {
            Some(handle) => handle.snapshot().phase == TodoPhase::Loaded && !handle.is_stopped(),
            None => false,
        }
    })
    .await;
    assert_eq!(fx.counting.counts().list, 2);

    fx.supervisor.stop();
}
