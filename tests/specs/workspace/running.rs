//! Start specs
//!
//! A Running workspace with no template and no access strategy.

use crate::prelude::*;

// =============================================================================
// Creation
// =============================================================================

#[tokio::test]
async fn first_pass_claims_workspace_before_creating_anything() {
    let world = World::new();

    world.admit(workspace(WORKSPACE)).await;

    let ws = world.workspace().unwrap();
    assert!(ws.has_finalizer());
    assert!(!world.has::<Deployment>(DEPLOYMENT));
    assert!(ws.status.is_none());
}

#[tokio::test]
async fn dependents_are_created_and_workspace_reports_creating() {
    let world = World::new();
    world.admit(workspace(WORKSPACE)).await;

    assert_eq!(world.pass().await, Requeue::Short);

    assert!(world.has::<Deployment>(DEPLOYMENT));
    assert!(world.has::<Service>(SERVICE));
    assert!(!world.has::<PersistentVolumeClaim>(PVC));
    assert_eq!(world.phase(), Some(Phase::Creating));
    assert_eq!(
        world.reason(ConditionType::Available),
        Some(ConditionReason::ComputeNotReady)
    );
    assert!(world.events.calls().is_empty());
}

#[tokio::test]
async fn waiting_passes_write_nothing() {
    let world = World::new();
    world.admit(workspace(WORKSPACE)).await;
    world.pass().await;
    let before = world.status();
    world.store.clear_calls();
    world.clock.advance(Duration::from_secs(30));

    assert_eq!(world.pass().await, Requeue::Short);

    assert!(world.store.writes().is_empty());
    similar_asserts::assert_eq!(world.status(), before);
}

#[tokio::test]
async fn workspace_becomes_running_once_compute_is_ready() {
    let world = World::new();
    world.admit(workspace(WORKSPACE)).await;
    world.pass().await;
    world.compute_becomes_ready();

    assert_eq!(world.pass().await, Requeue::Long);

    let status = world.status();
    assert_eq!(status.phase, Some(Phase::Running));
    assert_eq!(status.deployment_name.as_deref(), Some(DEPLOYMENT));
    assert_eq!(status.service_name.as_deref(), Some(SERVICE));
    assert_eq!(
        world.reason(ConditionType::Available),
        Some(ConditionReason::ResourcesReady)
    );
    assert_eq!(world.events.reasons(), vec![EVENT_RUNNING]);
}

#[tokio::test]
async fn steady_state_is_quiet() {
    let world = World::new();
    world.run_to_running(workspace(WORKSPACE)).await;
    world.store.clear_calls();

    for _ in 0..3 {
        assert_eq!(world.pass().await, Requeue::Long);
    }

    assert!(world.store.writes().is_empty());
    assert_eq!(world.events.reasons(), vec![EVENT_RUNNING]);
}

#[tokio::test]
async fn requested_storage_is_provisioned() {
    let world = World::new();

    world.run_to_running(workspace_with_storage()).await;

    assert!(world.has::<PersistentVolumeClaim>(PVC));
}

// =============================================================================
// Drift
// =============================================================================

#[tokio::test]
async fn image_change_rolls_compute_once_running() {
    let world = World::new();
    world.run_to_running(workspace(WORKSPACE)).await;
    world.store.modify::<Workspace>(NAMESPACE, WORKSPACE, |ws| {
        ws.spec.image = Some("jupyter/scipy-notebook:2026.1".to_string());
    });

    world.pass().await;

    let deployment = world
        .store
        .object::<Deployment>(NAMESPACE, DEPLOYMENT)
        .unwrap();
    let pod = deployment.spec.unwrap().template.spec.unwrap();
    assert_eq!(
        pod.containers[0].image.as_deref(),
        Some("jupyter/scipy-notebook:2026.1")
    );
}

#[tokio::test]
async fn image_change_waits_while_creating() {
    let world = World::new();
    world.admit(workspace(WORKSPACE)).await;
    world.pass().await;
    world.store.modify::<Workspace>(NAMESPACE, WORKSPACE, |ws| {
        ws.spec.image = Some("jupyter/scipy-notebook:2026.1".to_string());
    });
    world.store.clear_calls();

    world.pass().await;

    let updates: Vec<_> = world
        .store
        .writes()
        .into_iter()
        .filter(|c| c.op == StoreOp::Update)
        .collect();
    assert!(updates.is_empty(), "unexpected updates: {updates:?}");
}
