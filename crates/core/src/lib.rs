// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ws-core: resource model and pure status logic for the workspace controller

pub mod access;
pub mod clock;
pub mod condition;
pub mod crd;
pub mod naming;
pub mod phase;
pub mod requeue;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use access::{AccessResourceKey, AccessResourceRef};
pub use clock::{Clock, FakeClock, SystemClock};
pub use condition::{
    find_condition, merge_conditions, ConditionReason, ConditionStatus, ConditionType, WorkspaceCondition,
};
pub use crd::{
    AccessEnvTemplate, AccessResourceTemplate, AccessStrategySpec, ContainerConfig,
    DeploymentModifications, ResourceRef, StorageSpec, TemplateSpec, Workspace,
    WorkspaceAccessStrategy, WorkspaceSpec, WorkspaceStatus, WorkspaceTemplate,
};
pub use phase::{DesiredStatus, Phase};
pub use requeue::{Requeue, RequeueIntervals};
