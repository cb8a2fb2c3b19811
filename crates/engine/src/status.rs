// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition sets for each observed lifecycle state.
//!
//! Every method edits a status document in memory. The state machine writes
//! the result once at the end of a pass, and only when it differs from what
//! was read.

use ws_core::naming::PREEMPTED_MESSAGE;
use ws_core::{
    merge_conditions, Clock, ConditionReason, ConditionType, Phase, WorkspaceCondition,
    WorkspaceStatus,
};

const NO_ERRORS: &str = "No errors detected";

/// Reason the workspace is not yet available, or `None` once everything is.
pub fn not_ready_reason(compute: bool, service: bool, access: bool) -> Option<ConditionReason> {
    match (compute, service) {
        (false, false) => Some(ConditionReason::ResourcesNotReady),
        (false, true) => Some(ConditionReason::ComputeNotReady),
        (true, false) => Some(ConditionReason::ServiceNotReady),
        (true, true) if !access => Some(ConditionReason::AccessNotReady),
        (true, true) => None,
    }
}

/// Reason the workspace is not yet stopped, or `None` once everything is gone.
pub fn not_stopped_reason(compute: bool, service: bool, access: bool) -> Option<ConditionReason> {
    match (compute, service) {
        (false, false) => Some(ConditionReason::ResourcesNotStopped),
        (false, true) => Some(ConditionReason::ComputeNotStopped),
        (true, false) => Some(ConditionReason::ServiceNotStopped),
        (true, true) if !access => Some(ConditionReason::AccessNotStopped),
        (true, true) => None,
    }
}

fn reason_message(reason: ConditionReason) -> &'static str {
    match reason {
        ConditionReason::ComputeNotReady => "Compute is not ready",
        ConditionReason::ServiceNotReady => "Service is not ready",
        ConditionReason::AccessNotReady => "Access resources are not ready",
        ConditionReason::ComputeNotStopped => "Compute is still running",
        ConditionReason::ServiceNotStopped => "Service is still up",
        ConditionReason::AccessNotStopped => "Access resources are still being removed",
        ConditionReason::ResourcesNotStopped => "Resources are still running",
        _ => "Workspace is starting",
    }
}

#[derive(Clone)]
pub struct StatusManager<C: Clock> {
    clock: C,
}

impl<C: Clock> StatusManager<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn condition(
        &self,
        type_: ConditionType,
        status: bool,
        reason: ConditionReason,
        message: &str,
    ) -> WorkspaceCondition {
        WorkspaceCondition::new(type_, status, reason, message, self.clock.now())
    }

    fn apply(&self, status: &mut WorkspaceStatus, phase: Option<Phase>, desired: &[WorkspaceCondition]) {
        if let Some(phase) = phase {
            status.phase = Some(phase);
        }
        if let Some(merged) = merge_conditions(&status.conditions, desired) {
            status.conditions = merged;
        }
    }

    /// Dependents exist but at least one is not available yet.
    pub fn starting(
        &self,
        status: &mut WorkspaceStatus,
        reason: ConditionReason,
        deployment_name: &str,
        service_name: &str,
    ) {
        let message = reason_message(reason);
        let desired = [
            self.condition(ConditionType::Available, false, reason, message),
            self.condition(ConditionType::Progressing, true, reason, message),
            self.condition(ConditionType::Degraded, false, ConditionReason::NoError, NO_ERRORS),
            self.condition(
                ConditionType::Stopped,
                false,
                ConditionReason::DesiredStateRunning,
                "Workspace is starting",
            ),
        ];
        self.apply(status, Some(Phase::Creating), &desired);
        status.deployment_name = Some(deployment_name.to_string());
        status.service_name = Some(service_name.to_string());
    }

    pub fn running(&self, status: &mut WorkspaceStatus, deployment_name: &str, service_name: &str) {
        let desired = [
            self.condition(
                ConditionType::Available,
                true,
                ConditionReason::ResourcesReady,
                "Workspace is ready",
            ),
            self.condition(
                ConditionType::Progressing,
                false,
                ConditionReason::ResourcesReady,
                "Workspace is ready",
            ),
            self.condition(ConditionType::Degraded, false, ConditionReason::NoError, NO_ERRORS),
            self.condition(
                ConditionType::Stopped,
                false,
                ConditionReason::DesiredStateRunning,
                "Workspace is running",
            ),
        ];
        self.apply(status, Some(Phase::Running), &desired);
        status.deployment_name = Some(deployment_name.to_string());
        status.service_name = Some(service_name.to_string());
    }

    /// Deletion was issued and something is still draining.
    pub fn stopping(&self, status: &mut WorkspaceStatus, reason: ConditionReason) {
        let message = reason_message(reason);
        let desired = [
            self.condition(
                ConditionType::Available,
                false,
                ConditionReason::DesiredStateStopped,
                "Desired status is Stopped",
            ),
            self.condition(
                ConditionType::Progressing,
                true,
                ConditionReason::DesiredStateStopped,
                message,
            ),
            self.condition(ConditionType::Degraded, false, ConditionReason::NoError, NO_ERRORS),
            self.condition(ConditionType::Stopped, false, reason, message),
        ];
        self.apply(status, Some(Phase::Stopping), &desired);
    }

    pub fn stopped(&self, status: &mut WorkspaceStatus, preempted: bool) {
        let (reason, message) = if preempted {
            (ConditionReason::Preempted, PREEMPTED_MESSAGE)
        } else {
            (ConditionReason::AllResourcesStopped, "Workspace is stopped")
        };
        let desired = [
            self.condition(
                ConditionType::Available,
                false,
                ConditionReason::DesiredStateStopped,
                "Workspace is stopped",
            ),
            self.condition(
                ConditionType::Progressing,
                false,
                ConditionReason::DesiredStateStopped,
                "Workspace is stopped",
            ),
            self.condition(ConditionType::Degraded, false, ConditionReason::NoError, NO_ERRORS),
            self.condition(ConditionType::Stopped, true, reason, message),
        ];
        self.apply(status, Some(Phase::Stopped), &desired);
        status.deployment_name = None;
        status.service_name = None;
    }

    /// Only Degraded moves; the rest of the set keeps describing the last
    /// state that was reached.
    pub fn degraded(&self, status: &mut WorkspaceStatus, reason: ConditionReason, message: &str) {
        let desired = [self.condition(ConditionType::Degraded, true, reason, message)];
        self.apply(status, None, &desired);
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
