//! Stop specs
//!
//! Flipping desired status to Stopped tears down compute, network and
//! access objects, keeps storage, and only reports Stopped once compute and
//! network are really gone.

use crate::prelude::*;
use ws_core::naming::{PREEMPTED_MESSAGE, PREEMPTION_REASON_ANNOTATION};

async fn running_with_access(world: &World) {
    world.apply_strategy(&two_route_strategy());
    let mut ws = workspace_with_access();
    ws.spec.storage = workspace_with_storage().spec.storage;
    world.run_to_running(ws).await;
    assert_eq!(world.routes(), vec!["preview-alice", "route-alice"]);
    assert!(world.status().access_url.is_some());
}

#[tokio::test]
async fn stop_removes_everything_but_storage() {
    let world = World::new();
    running_with_access(&world).await;
    world.set_desired(DesiredStatus::Stopped);

    assert_eq!(world.pass().await, Requeue::Long);

    assert!(!world.has::<Deployment>(DEPLOYMENT));
    assert!(!world.has::<Service>(SERVICE));
    assert!(world.has::<PersistentVolumeClaim>(PVC));
    assert!(world.routes().is_empty());

    let status = world.status();
    assert_eq!(status.phase, Some(Phase::Stopped));
    assert!(status.access_url.is_none());
    assert!(status.access_resource_selector.is_none());
    assert!(status.access_resources.is_empty());
    assert!(status.deployment_name.is_none());
    assert_eq!(
        world.reason(ConditionType::Stopped),
        Some(ConditionReason::AllResourcesStopped)
    );
    assert_eq!(world.events.reasons(), vec![EVENT_RUNNING, EVENT_STOPPED]);
}

#[tokio::test]
async fn stopping_reports_what_is_still_draining() {
    let world = World::new();
    running_with_access(&world).await;
    world.store.set_deletion_mode(DeletionMode::Graceful);
    world.hold_compute();
    world.set_desired(DesiredStatus::Stopped);

    // Every delete is accepted, nothing has gone yet
    assert_eq!(world.pass().await, Requeue::Short);
    assert_eq!(world.phase(), Some(Phase::Stopping));
    assert_eq!(
        world.reason(ConditionType::Stopped),
        Some(ConditionReason::ResourcesNotStopped)
    );
    assert!(world.status().access_url.is_none());
    assert_eq!(world.tracked_names(), vec!["preview-alice", "route-alice"]);

    // Service and routes finish; compute is held by another finalizer
    world.store.finish_deletions();
    assert_eq!(world.pass().await, Requeue::Short);
    assert_eq!(world.phase(), Some(Phase::Stopping));
    assert_eq!(
        world.reason(ConditionType::Stopped),
        Some(ConditionReason::ComputeNotStopped)
    );
    assert!(world.tracked_names().is_empty());

    world.release_compute();
    world.store.finish_deletions();
    assert_eq!(world.pass().await, Requeue::Long);
    assert_eq!(world.phase(), Some(Phase::Stopped));
    assert_eq!(world.events.reasons(), vec![EVENT_RUNNING, EVENT_STOPPED]);
}

#[tokio::test]
async fn stopped_workspace_stays_quiet() {
    let world = World::new();
    running_with_access(&world).await;
    world.set_desired(DesiredStatus::Stopped);
    world.pass().await;
    world.store.clear_calls();

    assert_eq!(world.pass().await, Requeue::Long);

    assert!(world.store.writes().is_empty());
    assert_eq!(world.events.reasons(), vec![EVENT_RUNNING, EVENT_STOPPED]);
}

#[tokio::test]
async fn restart_after_stop_reuses_storage() {
    let world = World::new();
    running_with_access(&world).await;
    let pvc_uid = world
        .store
        .object::<PersistentVolumeClaim>(NAMESPACE, PVC)
        .and_then(|p| p.metadata.uid);
    world.set_desired(DesiredStatus::Stopped);
    world.pass().await;

    world.set_desired(DesiredStatus::Running);
    assert_eq!(world.pass().await, Requeue::Short);
    assert_eq!(world.phase(), Some(Phase::Creating));
    world.compute_becomes_ready();
    assert_eq!(world.pass().await, Requeue::Long);

    let after = world
        .store
        .object::<PersistentVolumeClaim>(NAMESPACE, PVC)
        .and_then(|p| p.metadata.uid);
    assert_eq!(after, pvc_uid);
    assert_eq!(world.routes(), vec!["preview-alice", "route-alice"]);
    assert_eq!(
        world.events.reasons(),
        vec![EVENT_RUNNING, EVENT_STOPPED, EVENT_RUNNING]
    );
}

#[tokio::test]
async fn preempted_workspace_says_so() {
    let world = World::new();
    world.run_to_running(workspace(WORKSPACE)).await;
    world.store.modify::<Workspace>(NAMESPACE, WORKSPACE, |ws| {
        ws.spec.desired_status = Some(DesiredStatus::Stopped);
        ws.metadata.annotations = Some(
            [(
                PREEMPTION_REASON_ANNOTATION.to_string(),
                PREEMPTED_MESSAGE.to_string(),
            )]
            .into(),
        );
    });

    assert_eq!(world.pass().await, Requeue::Long);

    assert_eq!(
        world.reason(ConditionType::Stopped),
        Some(ConditionReason::Preempted)
    );
    let stopped = world.events.calls().pop().unwrap();
    assert_eq!(stopped.event.message, PREEMPTED_MESSAGE);
}
