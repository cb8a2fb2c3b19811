// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WorkspaceAccessStrategy: shared, operator-owned description of how
//! workspaces are reached from outside the cluster.

use k8s_openapi::api::core::v1::{Container, Volume, VolumeMount};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "workspace.jupyter.org",
    version = "v1alpha1",
    kind = "WorkspaceAccessStrategy",
    plural = "workspaceaccessstrategies",
    shortname = "wsas",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct AccessStrategySpec {
    #[serde(default)]
    pub display_name: String,

    /// Objects rendered once per workspace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_resource_templates: Vec<AccessResourceTemplate>,

    /// Template for `status.accessURL`
    #[serde(
        default,
        rename = "accessURLTemplate",
        skip_serializing_if = "Option::is_none"
    )]
    pub access_url_template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_modifications: Option<DeploymentModifications>,
}

/// One templated access object.
///
/// `template` renders to the body of the object (everything except
/// `apiVersion` and `kind`, which come from this entry).
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessResourceTemplate {
    pub kind: String,
    pub api_version: String,
    pub name_prefix: String,
    pub template: String,
}

/// Environment variable whose value is rendered from a template.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessEnvTemplate {
    pub name: String,
    pub value_template: String,
}

/// Additions applied to the workspace compute spec.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentModifications {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub init_containers: Vec<Container>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sidecars: Vec<Container>,

    /// Mounted into the primary container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,

    /// Overrides same-named env vars of the primary container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_env: Vec<AccessEnvTemplate>,
}

impl WorkspaceAccessStrategy {
    pub fn merge_env(&self) -> &[AccessEnvTemplate] {
        self.spec
            .deployment_modifications
            .as_ref()
            .map(|m| m.merge_env.as_slice())
            .unwrap_or_default()
    }
}
