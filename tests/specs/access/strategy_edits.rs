//! Access strategy edit specs
//!
//! The set of live access objects follows the current strategy content on
//! every pass.

use crate::prelude::*;

async fn running_with_routes(world: &World) {
    world.apply_strategy(&two_route_strategy());
    world.run_to_running(workspace_with_access()).await;
    assert_eq!(world.routes(), vec!["preview-alice", "route-alice"]);
    assert_eq!(world.tracked_names(), vec!["preview-alice", "route-alice"]);
}

fn resource_version(object: Option<DynamicObject>) -> Option<String> {
    object.and_then(|o| o.metadata.resource_version)
}

#[tokio::test]
async fn running_workspace_publishes_url_and_selector() {
    let world = World::new();
    running_with_routes(&world).await;

    let status = world.status();
    assert_eq!(
        status.access_url.as_deref(),
        Some("https://example.com/workspaces/team-a/alice/")
    );
    assert_eq!(
        status.access_resource_selector.as_deref(),
        Some("workspace.jupyter.org/workspace-name=alice")
    );
}

#[tokio::test]
async fn removed_template_deletes_only_its_object() {
    let world = World::new();
    running_with_routes(&world).await;
    let kept_version = resource_version(world.route("route-alice"));
    world.edit_strategy(|s| {
        s.spec
            .access_resource_templates
            .retain(|t| t.name_prefix == "route");
    });

    assert_eq!(world.pass().await, Requeue::Long);

    assert_eq!(world.routes(), vec!["route-alice"]);
    assert_eq!(world.tracked_names(), vec!["route-alice"]);
    assert_eq!(resource_version(world.route("route-alice")), kept_version);
}

#[tokio::test]
async fn swapped_template_converges_in_one_pass() {
    let world = World::new();
    running_with_routes(&world).await;
    world.edit_strategy(|s| {
        s.spec.access_resource_templates = vec![route_template("route"), route_template("docs")];
    });

    world.pass().await;

    assert_eq!(world.routes(), vec!["docs-alice", "route-alice"]);
    assert_eq!(world.tracked_names(), vec!["docs-alice", "route-alice"]);
}

#[tokio::test]
async fn edited_template_rewrites_object_spec() {
    let world = World::new();
    running_with_routes(&world).await;
    world.edit_strategy(|s| {
        for t in s.spec.access_resource_templates.iter_mut() {
            t.template = t.template.replace("/workspaces/", "/lab/");
        }
    });

    world.pass().await;

    let route = world.route("route-alice").unwrap();
    assert_eq!(
        route.data["spec"]["path"],
        serde_json::json!("/lab/team-a/alice")
    );
}

#[tokio::test]
async fn deleted_access_object_is_recreated() {
    let world = World::new();
    running_with_routes(&world).await;
    {
        use ws_adapters::ObjectStore;
        world
            .store
            .delete_dynamic(&route_kind(), NAMESPACE, "preview-alice")
            .await
            .unwrap();
    }

    world.pass().await;

    assert_eq!(world.routes(), vec!["preview-alice", "route-alice"]);
    assert_eq!(world.tracked_names(), vec!["preview-alice", "route-alice"]);
}

#[tokio::test]
async fn dropping_the_strategy_removes_access_objects() {
    let world = World::new();
    running_with_routes(&world).await;
    world.store.modify::<Workspace>(NAMESPACE, WORKSPACE, |ws| {
        ws.spec.access_strategy = None;
    });

    assert_eq!(world.pass().await, Requeue::Long);

    assert!(world.routes().is_empty());
    let status = world.status();
    assert!(status.access_resources.is_empty());
    assert!(status.access_url.is_none());
    assert!(status.access_resource_selector.is_none());
}

#[tokio::test]
async fn missing_strategy_degrades_without_touching_dependents() {
    let world = World::new();
    world.admit(workspace_with_access()).await;

    let err = world.try_pass().await.unwrap_err();

    assert!(matches!(err, EngineError::AccessStrategyNotFound(_)));
    assert_eq!(err.requeue(), Requeue::Short);
    assert_eq!(
        world.reason(ConditionType::Degraded),
        Some(ConditionReason::AccessError)
    );
    assert!(!world.has::<Deployment>(DEPLOYMENT));

    // The strategy shows up; the next pass recovers
    world.apply_strategy(&two_route_strategy());
    assert_eq!(world.pass().await, Requeue::Short);
    assert_eq!(
        world.reason(ConditionType::Degraded),
        Some(ConditionReason::NoError)
    );
    assert_eq!(world.routes(), vec!["preview-alice", "route-alice"]);
}
