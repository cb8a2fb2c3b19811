//! Deletion specs
//!
//! Removing a workspace cleans up every dependent, storage included, and
//! holds the finalizer until nothing is left.

use crate::prelude::*;

async fn running_workspace(world: &World) {
    world.apply_strategy(&two_route_strategy());
    let mut ws = workspace_with_access();
    ws.spec.storage = workspace_with_storage().spec.storage;
    world.run_to_running(ws).await;
}

async fn delete_workspace(world: &World) {
    use ws_adapters::ObjectStore;
    let marked = world
        .store
        .delete::<Workspace>(NAMESPACE, WORKSPACE)
        .await
        .unwrap();
    assert!(marked.is_some_and(|ws| ws.is_deleting()));
}

#[tokio::test]
async fn deletion_removes_all_dependents_and_releases_workspace() {
    let world = World::new();
    running_workspace(&world).await;
    delete_workspace(&world).await;

    assert_eq!(world.pass().await, Requeue::Done);

    assert!(world.workspace().is_none());
    assert!(!world.has::<Deployment>(DEPLOYMENT));
    assert!(!world.has::<Service>(SERVICE));
    assert!(!world.has::<PersistentVolumeClaim>(PVC));
    assert!(world.routes().is_empty());
}

#[tokio::test]
async fn finalizer_is_held_until_cleanup_completes() {
    let world = World::new();
    running_workspace(&world).await;
    world.store.set_deletion_mode(DeletionMode::Graceful);
    world.hold_compute();
    delete_workspace(&world).await;

    assert_eq!(world.pass().await, Requeue::Short);
    assert!(world.workspace().unwrap().has_finalizer());

    world.store.finish_deletions();
    assert_eq!(world.pass().await, Requeue::Short);
    let ws = world.workspace().unwrap();
    assert!(ws.has_finalizer());
    assert!(world.has::<Deployment>(DEPLOYMENT));
    assert!(!world.has::<PersistentVolumeClaim>(PVC));

    world.release_compute();
    world.store.finish_deletions();
    assert_eq!(world.pass().await, Requeue::Done);
    assert!(world.workspace().is_none());
}

#[tokio::test]
async fn deletion_checkpoints_access_refs_and_nothing_else() {
    let world = World::new();
    running_workspace(&world).await;
    world.store.set_deletion_mode(DeletionMode::Graceful);
    world.hold_compute();
    delete_workspace(&world).await;
    let before = world.status();
    world.store.clear_calls();

    // Deletes accepted, nothing gone yet: status is left alone
    assert_eq!(world.pass().await, Requeue::Short);
    assert!(world
        .store
        .writes()
        .iter()
        .all(|c| c.op != StoreOp::UpdateStatus));
    assert_eq!(world.tracked_names(), vec!["preview-alice", "route-alice"]);

    // Routes are gone while compute drains: the pruned list is persisted
    world.store.finish_deletions();
    assert_eq!(world.pass().await, Requeue::Short);
    assert!(world.tracked_names().is_empty());
    let after = world.status();
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.conditions, before.conditions);
    assert_eq!(after.access_url, before.access_url);
}

#[tokio::test]
async fn gone_workspace_needs_nothing() {
    let world = World::new();

    assert_eq!(world.pass().await, Requeue::Done);

    assert!(world.store.writes().is_empty());
}
