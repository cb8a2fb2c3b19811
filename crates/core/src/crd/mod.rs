// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom resources watched and written by the controller

mod access_strategy;
mod template;
mod workspace;

pub use access_strategy::{
    AccessEnvTemplate, AccessResourceTemplate, AccessStrategySpec, DeploymentModifications,
    WorkspaceAccessStrategy,
};
pub use template::{TemplateSpec, WorkspaceTemplate};
pub use workspace::{
    ContainerConfig, ResourceRef, StorageSpec, Workspace, WorkspaceSpec, WorkspaceStatus,
};
