// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic names, labels and well-known keys for managed objects.
//!
//! Every dependent object name is a pure function of the workspace name so a
//! pass can find what an earlier pass created without any persisted lookup.

use std::collections::BTreeMap;

pub const API_GROUP: &str = "workspace.jupyter.org";

pub const APP_LABEL: &str = "app";
pub const APP_LABEL_VALUE: &str = "jupyter";

pub const LABEL_WORKSPACE_NAME: &str = "workspace.jupyter.org/workspace-name";
pub const LABEL_WORKSPACE_NAMESPACE: &str = "workspace.jupyter.org/workspace-namespace";
pub const LABEL_ACCESS_STRATEGY_NAME: &str = "workspace.jupyter.org/access-strategy-name";
pub const LABEL_ACCESS_STRATEGY_NAMESPACE: &str =
    "workspace.jupyter.org/access-strategy-namespace";

/// Blocks workspace removal until every dependent is confirmed gone.
pub const WORKSPACE_FINALIZER: &str = "workspace.jupyter.org/cleanup-protection";

pub const PREEMPTION_REASON_ANNOTATION: &str = "workspace.jupyter.org/preemption-reason";
pub const PREEMPTED_MESSAGE: &str = "Workspace preempted due to resource contention";

pub const PRIMARY_CONTAINER_NAME: &str = "workspace";
pub const WORKSPACE_PORT_NAME: &str = "http";
pub const WORKSPACE_PORT: i32 = 8888;
pub const STORAGE_VOLUME_NAME: &str = "workspace-storage";

/// Image used when neither the workspace nor a template names one
pub const DEFAULT_IMAGE: &str = "jk8s-application-jupyter-uv:latest";
pub const DEFAULT_CPU_REQUEST: &str = "100m";
pub const DEFAULT_MEMORY_REQUEST: &str = "128Mi";
pub const DEFAULT_STORAGE_SIZE: &str = "10Gi";
pub const DEFAULT_MOUNT_PATH: &str = "/home/jovyan";

pub fn deployment_name(workspace: &str) -> String {
    format!("jupyter-{workspace}")
}

pub fn service_name(workspace: &str) -> String {
    format!("jupyter-{workspace}-service")
}

pub fn pvc_name(workspace: &str) -> String {
    format!("jupyter-{workspace}-pvc")
}

pub fn access_resource_name(name_prefix: &str, workspace: &str) -> String {
    format!("{name_prefix}-{workspace}")
}

/// Labels shared by compute, network, storage and the pod selector.
pub fn workspace_labels(workspace: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (APP_LABEL.to_string(), APP_LABEL_VALUE.to_string()),
        (LABEL_WORKSPACE_NAME.to_string(), workspace.to_string()),
    ])
}

/// Selector string identifying every access object of a workspace.
pub fn access_resource_selector(workspace: &str) -> String {
    format!("{LABEL_WORKSPACE_NAME}={workspace}")
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
