// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effective build inputs for a workspace.
//!
//! The workspace's own fields win; a referenced template only fills gaps.
//! Without a template the built-in image is used.
//! The result is treated as opaque by the convergence engine.

use crate::error::BuildError;
use k8s_openapi::api::core::v1::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::ResourceExt;
use std::collections::BTreeMap;
use ws_core::naming::{
    DEFAULT_CPU_REQUEST, DEFAULT_IMAGE, DEFAULT_MEMORY_REQUEST, DEFAULT_MOUNT_PATH,
    DEFAULT_STORAGE_SIZE,
};
use ws_core::{StorageSpec, Workspace, WorkspaceTemplate};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedInputs {
    pub image: String,
    pub resources: ResourceRequirements,
    /// `None` when neither the workspace nor its template asks for storage
    pub storage: Option<ResolvedStorage>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStorage {
    pub size: Quantity,
    pub storage_class_name: Option<String>,
    pub mount_path: String,
}

impl ResolvedInputs {
    pub fn resolve(
        workspace: &Workspace,
        template: Option<&WorkspaceTemplate>,
    ) -> Result<Self, BuildError> {
        let defaults = template.map(|t| &t.spec);

        let image = match (workspace.spec.image.clone(), defaults) {
            (Some(image), _) => image,
            (None, Some(d)) => d
                .default_image
                .clone()
                .ok_or_else(|| BuildError::MissingImage(workspace.name_any()))?,
            (None, None) => DEFAULT_IMAGE.to_string(),
        };

        let resources = workspace
            .spec
            .resources
            .clone()
            .or_else(|| defaults.and_then(|d| d.default_resources.clone()))
            .unwrap_or_default();

        let storage = match (
            workspace.spec.storage.as_ref(),
            defaults.and_then(|d| d.default_storage.as_ref()),
        ) {
            (None, None) => None,
            (own, inherited) => Some(ResolvedStorage::merge(own, inherited)),
        };

        Ok(Self {
            image,
            resources: with_default_requests(resources),
            storage,
        })
    }
}

impl ResolvedStorage {
    fn merge(own: Option<&StorageSpec>, inherited: Option<&StorageSpec>) -> Self {
        let size = own
            .and_then(|s| s.size.clone())
            .or_else(|| inherited.and_then(|s| s.size.clone()))
            .unwrap_or_else(|| Quantity(DEFAULT_STORAGE_SIZE.to_string()));

        let storage_class_name = own
            .and_then(|s| s.storage_class_name.clone())
            .or_else(|| inherited.and_then(|s| s.storage_class_name.clone()));

        let mount_path = own
            .and_then(|s| s.mount_path.clone())
            .or_else(|| inherited.and_then(|s| s.mount_path.clone()))
            .unwrap_or_else(|| DEFAULT_MOUNT_PATH.to_string());

        Self {
            size,
            storage_class_name,
            mount_path,
        }
    }
}

/// Ensure cpu and memory requests are always present.
fn with_default_requests(mut resources: ResourceRequirements) -> ResourceRequirements {
    let requests = resources.requests.get_or_insert_with(BTreeMap::new);
    requests
        .entry("cpu".to_string())
        .or_insert_with(|| Quantity(DEFAULT_CPU_REQUEST.to_string()));
    requests
        .entry("memory".to_string())
        .or_insert_with(|| Quantity(DEFAULT_MEMORY_REQUEST.to_string()));
    resources
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
