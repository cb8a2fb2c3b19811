// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition vocabulary reported in workspace status.
//!
//! Types and reasons are closed enums so every status writer speaks the same
//! machine-readable language. Transition timestamps only move when a
//! condition's status flips.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable condition type names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ConditionType {
    Available,
    Progressing,
    Degraded,
    Stopped,
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        }
    }
}

/// Machine-readable reasons attached to conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionReason {
    // readiness
    ResourcesNotReady,
    ComputeNotReady,
    ServiceNotReady,
    AccessNotReady,
    ResourcesReady,
    DesiredStateStopped,
    // stopping
    DesiredStateRunning,
    ResourcesNotStopped,
    ComputeNotStopped,
    ServiceNotStopped,
    AccessNotStopped,
    AllResourcesStopped,
    // errors
    ComputeError,
    ServiceError,
    StorageError,
    AccessError,
    NoError,
    Preempted,
}

impl ConditionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionReason::ResourcesNotReady => "ResourcesNotReady",
            ConditionReason::ComputeNotReady => "ComputeNotReady",
            ConditionReason::ServiceNotReady => "ServiceNotReady",
            ConditionReason::AccessNotReady => "AccessNotReady",
            ConditionReason::ResourcesReady => "ResourcesReady",
            ConditionReason::DesiredStateStopped => "DesiredStateStopped",
            ConditionReason::DesiredStateRunning => "DesiredStateRunning",
            ConditionReason::ResourcesNotStopped => "ResourcesNotStopped",
            ConditionReason::ComputeNotStopped => "ComputeNotStopped",
            ConditionReason::ServiceNotStopped => "ServiceNotStopped",
            ConditionReason::AccessNotStopped => "AccessNotStopped",
            ConditionReason::AllResourcesStopped => "AllResourcesStopped",
            ConditionReason::ComputeError => "ComputeError",
            ConditionReason::ServiceError => "ServiceError",
            ConditionReason::StorageError => "StorageError",
            ConditionReason::AccessError => "AccessError",
            ConditionReason::NoError => "NoError",
            ConditionReason::Preempted => "Preempted",
        }
    }
}

impl fmt::Display for ConditionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the workspace condition set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceCondition {
    #[serde(rename = "type")]
    pub type_: ConditionType,
    pub status: ConditionStatus,
    pub reason: ConditionReason,
    #[serde(default)]
    pub message: String,
    pub last_transition_time: DateTime<Utc>,
}

impl WorkspaceCondition {
    pub fn new(
        type_: ConditionType,
        status: impl Into<ConditionStatus>,
        reason: ConditionReason,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            type_,
            status: status.into(),
            reason,
            message: message.into(),
            last_transition_time: now,
        }
    }

    pub fn is_true(&self) -> bool {
        self.status == ConditionStatus::True
    }

    fn same_content(&self, other: &WorkspaceCondition) -> bool {
        self.status == other.status && self.reason == other.reason && self.message == other.message
    }
}

/// Find a condition by type.
pub fn find_condition(
    conditions: &[WorkspaceCondition],
    type_: ConditionType,
) -> Option<&WorkspaceCondition> {
    conditions.iter().find(|c| c.type_ == type_)
}

/// Merge `desired` into `current`.
///
/// Returns `None` when every desired condition already matches, so callers
/// can skip the status write entirely. Conditions not mentioned in `desired`
/// are kept as they are. A condition whose status is unchanged keeps its
/// previous transition time even if its reason or message moved.
pub fn merge_conditions(
    current: &[WorkspaceCondition],
    desired: &[WorkspaceCondition],
) -> Option<Vec<WorkspaceCondition>> {
    let mut merged = current.to_vec();
    let mut changed = false;

    for want in desired {
        match merged.iter_mut().find(|c| c.type_ == want.type_) {
            Some(existing) if existing.same_content(want) => {}
            Some(existing) => {
                let keep_time = existing.status == want.status;
                let previous = existing.last_transition_time;
                *existing = want.clone();
                if keep_time {
                    existing.last_transition_time = previous;
                }
                changed = true;
            }
            None => {
                merged.push(want.clone());
                changed = true;
            }
        }
    }

    changed.then_some(merged)
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
