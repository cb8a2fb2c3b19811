// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace custom resource.
//!
//! The spec is owned by users; the controller only ever writes status and
//! its own finalizer.

use k8s_openapi::api::core::v1::{EnvVar, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::access::AccessResourceRef;
use crate::condition::{find_condition, ConditionType, WorkspaceCondition};
use crate::naming::{PREEMPTED_MESSAGE, PREEMPTION_REASON_ANNOTATION, WORKSPACE_FINALIZER};
use crate::phase::{DesiredStatus, Phase};

/// A per-user containerized development environment.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "workspace.jupyter.org",
    version = "v1alpha1",
    kind = "Workspace",
    plural = "workspaces",
    shortname = "ws",
    namespaced,
    status = "WorkspaceStatus",
    printcolumn = r#"{"name":"Desired","type":"string","jsonPath":".spec.desiredStatus"}"#,
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"URL","type":"string","jsonPath":".status.accessURL"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSpec {
    /// Human-readable name shown in UIs
    #[serde(default)]
    pub display_name: String,

    /// Container image; falls back to the template's image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Running (default) or Stopped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<DesiredStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,

    /// Persistent home volume; omitted means no storage unless the template asks for it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_config: Option<ContainerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_ref: Option<ResourceRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_strategy: Option<ResourceRef>,
}

/// Storage request for the workspace home volume.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
}

/// Overrides for the primary container.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

/// Reference to another resource by name, defaulting to the referrer's namespace.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ResourceRef {
    pub fn namespace_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.namespace.as_deref().unwrap_or(default)
    }
}

/// Observed state of a workspace.
///
/// Every field serializes even when empty: status is written as a merge
/// patch, and a cleared field has to reach the server as `null` or `[]`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatus {
    #[serde(default)]
    pub phase: Option<Phase>,

    #[serde(default)]
    pub conditions: Vec<WorkspaceCondition>,

    #[serde(default, rename = "accessURL")]
    pub access_url: Option<String>,

    #[serde(default)]
    pub access_resource_selector: Option<String>,

    /// Access objects this workspace believes it owns
    #[serde(default)]
    pub access_resources: Vec<AccessResourceRef>,

    #[serde(default)]
    pub deployment_name: Option<String>,

    #[serde(default)]
    pub service_name: Option<String>,
}

impl Workspace {
    pub fn desired_status(&self) -> DesiredStatus {
        self.spec.desired_status.unwrap_or_default()
    }

    /// Namespace of the workspace; the empty string for malformed objects.
    pub fn namespace_or_default(&self) -> String {
        self.namespace().unwrap_or_default()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.status.as_ref().and_then(|s| s.phase)
    }

    pub fn conditions(&self) -> &[WorkspaceCondition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    pub fn tracked_access_resources(&self) -> &[AccessResourceRef] {
        self.status
            .as_ref()
            .map(|s| s.access_resources.as_slice())
            .unwrap_or_default()
    }

    /// Judged available once the Available condition reports True.
    pub fn is_available(&self) -> bool {
        find_condition(self.conditions(), ConditionType::Available).is_some_and(|c| c.is_true())
    }

    pub fn is_deleting(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    pub fn has_finalizer(&self) -> bool {
        self.finalizers().iter().any(|f| f == WORKSPACE_FINALIZER)
    }

    pub fn is_preempted(&self) -> bool {
        self.annotations()
            .get(PREEMPTION_REASON_ANNOTATION)
            .is_some_and(|reason| reason == PREEMPTED_MESSAGE)
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
