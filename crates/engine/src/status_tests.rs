// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use ws_core::{find_condition, ConditionStatus, FakeClock};
use yare::parameterized;

fn condition(status: &WorkspaceStatus, type_: ConditionType) -> &WorkspaceCondition {
    find_condition(&status.conditions, type_).unwrap()
}

#[parameterized(
    nothing_ready = { false, false, true, Some(ConditionReason::ResourcesNotReady) },
    compute_pending = { false, true, true, Some(ConditionReason::ComputeNotReady) },
    service_pending = { true, false, true, Some(ConditionReason::ServiceNotReady) },
    access_pending = { true, true, false, Some(ConditionReason::AccessNotReady) },
    all_ready = { true, true, true, None },
)]
fn readiness_reason(compute: bool, service: bool, access: bool, expected: Option<ConditionReason>) {
    assert_eq!(not_ready_reason(compute, service, access), expected);
}

#[parameterized(
    nothing_gone = { false, false, true, Some(ConditionReason::ResourcesNotStopped) },
    compute_draining = { false, true, true, Some(ConditionReason::ComputeNotStopped) },
    service_draining = { true, false, true, Some(ConditionReason::ServiceNotStopped) },
    access_draining = { true, true, false, Some(ConditionReason::AccessNotStopped) },
    all_gone = { true, true, true, None },
)]
fn stopping_reason(compute: bool, service: bool, access: bool, expected: Option<ConditionReason>) {
    assert_eq!(not_stopped_reason(compute, service, access), expected);
}

#[test]
fn starting_sets_phase_names_and_four_conditions() {
    let manager = StatusManager::new(FakeClock::new());
    let mut status = WorkspaceStatus::default();

    manager.starting(
        &mut status,
        ConditionReason::ComputeNotReady,
        "jupyter-alice",
        "jupyter-alice-service",
    );

    assert_eq!(status.phase, Some(Phase::Creating));
    assert_eq!(status.conditions.len(), 4);
    let available = condition(&status, ConditionType::Available);
    assert_eq!(available.status, ConditionStatus::False);
    assert_eq!(available.reason, ConditionReason::ComputeNotReady);
    assert_eq!(available.message, "Compute is not ready");
    assert!(condition(&status, ConditionType::Progressing).is_true());
    assert_eq!(status.deployment_name.as_deref(), Some("jupyter-alice"));
    assert_eq!(status.service_name.as_deref(), Some("jupyter-alice-service"));
}

#[test]
fn running_flips_available_and_moves_transition_time() {
    let clock = FakeClock::new();
    let manager = StatusManager::new(clock.clone());
    let mut status = WorkspaceStatus::default();
    manager.starting(&mut status, ConditionReason::ResourcesNotReady, "d", "s");
    let started_at = condition(&status, ConditionType::Available).last_transition_time;

    clock.advance(Duration::from_secs(30));
    manager.running(&mut status, "d", "s");

    assert_eq!(status.phase, Some(Phase::Running));
    let available = condition(&status, ConditionType::Available);
    assert!(available.is_true());
    assert_eq!(available.reason, ConditionReason::ResourcesReady);
    assert!(available.last_transition_time > started_at);
    // Degraded stayed False, so its timestamp is untouched
    assert_eq!(
        condition(&status, ConditionType::Degraded).last_transition_time,
        started_at
    );
}

#[test]
fn repeated_state_leaves_status_unchanged() {
    let clock = FakeClock::new();
    let manager = StatusManager::new(clock.clone());
    let mut status = WorkspaceStatus::default();
    manager.running(&mut status, "d", "s");
    let before = status.clone();

    clock.advance(Duration::from_secs(60));
    manager.running(&mut status, "d", "s");

    assert_eq!(status, before);
}

#[test]
fn stopping_names_what_is_still_present() {
    let manager = StatusManager::new(FakeClock::new());
    let mut status = WorkspaceStatus::default();

    manager.stopping(&mut status, ConditionReason::ServiceNotStopped);

    assert_eq!(status.phase, Some(Phase::Stopping));
    let stopped = condition(&status, ConditionType::Stopped);
    assert_eq!(stopped.status, ConditionStatus::False);
    assert_eq!(stopped.reason, ConditionReason::ServiceNotStopped);
    assert_eq!(stopped.message, "Service is still up");
    assert_eq!(
        condition(&status, ConditionType::Available).reason,
        ConditionReason::DesiredStateStopped
    );
}

#[parameterized(
    plain = { false, ConditionReason::AllResourcesStopped, "Workspace is stopped" },
    preempted = { true, ConditionReason::Preempted, PREEMPTED_MESSAGE },
)]
fn stopped_clears_names(preempted: bool, reason: ConditionReason, message: &str) {
    let manager = StatusManager::new(FakeClock::new());
    let mut status = WorkspaceStatus::default();
    manager.running(&mut status, "d", "s");

    manager.stopped(&mut status, preempted);

    assert_eq!(status.phase, Some(Phase::Stopped));
    let stopped = condition(&status, ConditionType::Stopped);
    assert!(stopped.is_true());
    assert_eq!(stopped.reason, reason);
    assert_eq!(stopped.message, message);
    assert!(status.deployment_name.is_none());
    assert!(status.service_name.is_none());
}

#[test]
fn degraded_touches_only_degraded() {
    let manager = StatusManager::new(FakeClock::new());
    let mut status = WorkspaceStatus::default();
    manager.running(&mut status, "d", "s");

    manager.degraded(&mut status, ConditionReason::AccessError, "template failed");

    assert_eq!(status.phase, Some(Phase::Running));
    let degraded = condition(&status, ConditionType::Degraded);
    assert!(degraded.is_true());
    assert_eq!(degraded.reason, ConditionReason::AccessError);
    assert!(condition(&status, ConditionType::Available).is_true());
}
