//! Access object adoption specs
//!
//! An access object that already exists under the expected name is taken
//! over rather than treated as a failure.

use crate::prelude::*;

fn leftover_route(name: &str) -> DynamicObject {
    DynamicObject::new(name, &route_kind().api_resource())
        .within(NAMESPACE)
        .data(serde_json::json!({
            "spec": { "path": "/stale", "backend": "somewhere-else" }
        }))
}

#[tokio::test]
async fn existing_object_is_adopted_and_tracked_once() {
    let world = World::new();
    world.apply_strategy(&access_strategy(STRATEGY, vec![route_template("route")]));
    world
        .store
        .insert_dynamic(&route_kind(), &leftover_route("route-alice"));
    world.admit(workspace_with_access()).await;
    world.store.clear_calls();

    assert_eq!(world.pass().await, Requeue::Short);

    let route_writes: Vec<StoreOp> = world
        .store
        .writes()
        .into_iter()
        .filter(|c| c.kind == "HTTPRoute")
        .map(|c| c.op)
        .collect();
    assert_eq!(route_writes, vec![StoreOp::Create, StoreOp::Update]);
    assert_eq!(world.tracked_names(), vec!["route-alice"]);

    let route = world.route("route-alice").unwrap();
    assert_eq!(route.data["spec"]["backend"], serde_json::json!(SERVICE));
}

#[tokio::test]
async fn adopted_object_is_stable_on_later_passes() {
    let world = World::new();
    world.apply_strategy(&access_strategy(STRATEGY, vec![route_template("route")]));
    world
        .store
        .insert_dynamic(&route_kind(), &leftover_route("route-alice"));
    world.admit(workspace_with_access()).await;
    world.pass().await;
    world.compute_becomes_ready();
    world.store.clear_calls();

    assert_eq!(world.pass().await, Requeue::Long);

    assert!(world
        .store
        .writes()
        .iter()
        .all(|c| c.kind != "HTTPRoute"));
    assert_eq!(world.tracked_names(), vec!["route-alice"]);
}
