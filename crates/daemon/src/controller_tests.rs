// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use ws_adapters::{FakeEventAdapter, FakeObjectStore};
use ws_core::test_support::workspace;
use ws_core::FakeClock;
use yare::parameterized;

type TestContext = Context<FakeObjectStore, FakeEventAdapter, FakeClock>;

fn intervals() -> RequeueIntervals {
    RequeueIntervals {
        short: Duration::from_millis(250),
        long: Duration::from_secs(90),
    }
}

fn context(store: &FakeObjectStore) -> Arc<TestContext> {
    let deps = StateMachineDeps {
        store: store.clone(),
        events: FakeEventAdapter::new(),
    };
    let reconciler = Reconciler::new(deps, FakeClock::new(), Duration::from_secs(5));
    Arc::new(Context::new(reconciler, intervals()))
}

#[parameterized(
    done = { Requeue::Done, Action::await_change() },
    short = { Requeue::Short, Action::requeue(Duration::from_millis(250)) },
    long = { Requeue::Long, Action::requeue(Duration::from_secs(90)) },
)]
fn requeue_maps_to_action(requeue: Requeue, expected: Action) {
    assert_eq!(action_for(&intervals(), requeue), expected);
}

#[tokio::test]
async fn new_workspace_is_polled_soon() {
    let store = FakeObjectStore::new();
    let ws = store.insert(&workspace("alice"));

    let action = reconcile(Arc::new(ws), context(&store)).await.unwrap();

    assert_eq!(action, Action::requeue(Duration::from_millis(250)));
}

#[tokio::test]
async fn vanished_workspace_waits_for_change() {
    let store = FakeObjectStore::new();

    let action = reconcile(Arc::new(workspace("alice")), context(&store))
        .await
        .unwrap();

    assert_eq!(action, Action::await_change());
}

#[parameterized(
    invariant = { EngineError::Invariant("delete ignored".to_string()), Duration::from_secs(90) },
    deadline = { EngineError::Deadline(Duration::from_secs(5)), Duration::from_millis(250) },
    missing_strategy = { EngineError::AccessStrategyNotFound("web".to_string()), Duration::from_millis(250) },
)]
fn error_policy_follows_error_requeue(error: EngineError, delay: Duration) {
    let store = FakeObjectStore::new();
    let ws = Arc::new(workspace("alice"));

    let action = error_policy(ws, &error, context(&store));

    assert_eq!(action, Action::requeue(delay));
}
