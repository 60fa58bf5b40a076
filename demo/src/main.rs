//! Scripted session demo.
//!
//! Wires the supervisor to the in-memory remote and drives a full session
//! the way a frontend would: register, log in, work the todo list, log out.
//! Run with `RUST_LOG=debug` to watch the actors underneath.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use todoflow_client::InMemoryRemote;
use todoflow_machines::prelude::*;
use todoflow_runtime::ActorHandle;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let remote = Arc::new(InMemoryRemote::new());

    let supervisor = Supervisor::spawn(
        AuthEnvironment::new(Arc::clone(&remote) as _),
        TodoEnvironment::new(Arc::clone(&remote) as _),
        SupervisorConfig {
            respawn: RespawnPolicy::OnTransition,
        },
    );

    let auth = supervisor.auth().await.context("auth child missing")?;

    println!("=== Todoflow session ===\n");

    // Register, then watch the confirmation self-clear.
    println!("Registering ada@example.com ...");
    auth.send(AuthEvent::Register {
        email: "ada@example.com".to_string(),
        password: "hunter2".to_string(),
    })?;
    let state = wait_auth(&auth, |s| s.context.message.is_some()).await;
    println!("  server says: {}", state.context.message.as_deref().unwrap_or_default());
    wait_auth(&auth, |s| s.context.message.is_none()).await;
    println!("  (message cleared itself)\n");

    // A wrong password bounces with a transient error.
    println!("Logging in with a wrong password ...");
    auth.send(AuthEvent::Login {
        email: "ada@example.com".to_string(),
        password: "wrong".to_string(),
    })?;
    let state = wait_auth(&auth, |s| s.context.error.is_some()).await;
    println!("  server says: {}", state.context.error.as_deref().unwrap_or_default());
    wait_auth(&auth, |s| s.context.error.is_none()).await;

    // The real login hands the session over to the todo child.
    println!("\nLogging in ...");
    auth.send(AuthEvent::Login {
        email: "ada@example.com".to_string(),
        password: "hunter2".to_string(),
    })?;

    let mut phases = supervisor.watch_phase();
    while *phases.borrow() != SupervisorPhase::Authenticated {
        phases.changed().await?;
    }
    println!("  authenticated; todo list loading\n");

    let todo = supervisor.todo().await.context("todo child missing")?;
    wait_todo(&todo, |s| s.phase == TodoPhase::Loaded).await;

    for text in ["buy milk", "write docs", "deploy to production"] {
        todo.send(TodoEvent::Add {
            text: text.to_string(),
        })?;
    }
    let state = wait_todo(&todo, |s| {
        s.phase == TodoPhase::Loaded && s.context.list.len() == 3
    })
    .await;
    print_list("Created:", &state);

    // Complete the first item, rename the second, drop the third.
    let first = state.context.list[0].id.clone();
    let second = state.context.list[1].id.clone();
    let third = state.context.list[2].id.clone();

    todo.send(TodoEvent::Toggle { id: first })?;
    todo.send(TodoEvent::Update(UpdateRequest {
        id: second,
        text: "write better docs".to_string(),
        completed: false,
    }))?;
    todo.send(TodoEvent::Remove { id: third })?;

    let state = wait_todo(&todo, |s| {
        s.phase == TodoPhase::Loaded && s.context.list.len() == 2 && s.context.list[0].completed
    })
    .await;
    print_list("\nAfter toggling, updating, removing:", &state);

    println!("\nLogging out ...");
    supervisor.logout()?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("  session phase: {:?}", supervisor.phase());
    println!("  a fresh login form is ready: {:?}", supervisor.auth().await.map(|h| h.snapshot().phase));

    supervisor.stop();
    Ok(())
}

async fn wait_auth<F>(handle: &ActorHandle<AuthMachine>, pred: F) -> AuthState
where
    F: Fn(&AuthState) -> bool,
{
    let mut watch = handle.watch();
    loop {
        {
            let state = watch.borrow();
            if pred(&state) {
                return state.clone();
            }
        }
        if watch.changed().await.is_err() {
            return handle.snapshot();
        }
    }
}

async fn wait_todo<F>(handle: &ActorHandle<TodoMachine>, pred: F) -> TodoState
where
    F: Fn(&TodoState) -> bool,
{
    let mut watch = handle.watch();
    loop {
        {
            let state = watch.borrow();
            if pred(&state) {
                return state.clone();
            }
        }
        if watch.changed().await.is_err() {
            return handle.snapshot();
        }
    }
}

fn print_list(heading: &str, state: &TodoState) {
    println!("{heading}");
    for todo in &state.context.list {
        let mark = if todo.completed { "x" } else { " " };
        println!("  [{mark}] {}", todo.text);
    }
}
