// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    AccessResourceTemplate, AccessStrategySpec, ConditionReason, ConditionType, DesiredStatus,
    Phase, ResourceRef, Workspace, WorkspaceAccessStrategy, WorkspaceCondition, WorkspaceSpec,
    WorkspaceStatus,
};
use chrono::{DateTime, Utc};
use kube::api::ObjectMeta;

pub const TEST_NAMESPACE: &str = "team-a";

// ── Workspace fixtures ──────────────────────────────────────────────────────

pub fn workspace(name: &str) -> Workspace {
    Workspace {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(TEST_NAMESPACE.to_string()),
            uid: Some(format!("uid-{name}")),
            ..Default::default()
        },
        spec: WorkspaceSpec {
            display_name: name.to_string(),
            image: Some("jupyter/base-notebook:latest".to_string()),
            ..Default::default()
        },
        status: None,
    }
}

pub fn stopped_workspace(name: &str) -> Workspace {
    let mut ws = workspace(name);
    ws.spec.desired_status = Some(DesiredStatus::Stopped);
    ws
}

pub fn with_access_strategy(mut ws: Workspace, strategy: &str) -> Workspace {
    ws.spec.access_strategy = Some(ResourceRef {
        name: strategy.to_string(),
        namespace: Some(TEST_NAMESPACE.to_string()),
    });
    ws
}

/// Mark the workspace as already judged available (phase Running).
pub fn mark_running(ws: &mut Workspace, now: DateTime<Utc>) {
    let status = ws.status.get_or_insert_with(WorkspaceStatus::default);
    status.phase = Some(Phase::Running);
    status.conditions = vec![WorkspaceCondition::new(
        ConditionType::Available,
        true,
        ConditionReason::ResourcesReady,
        "",
        now,
    )];
}

// ── Access strategy fixtures ────────────────────────────────────────────────

/// Route-like template whose spec points at the workspace service.
pub fn route_template(prefix: &str) -> AccessResourceTemplate {
    AccessResourceTemplate {
        kind: "HTTPRoute".to_string(),
        api_version: "gateway.networking.k8s.io/v1".to_string(),
        name_prefix: prefix.to_string(),
        template: format!(
            r#"metadata:
  name: {prefix}-{{{{ workspace.metadata.name }}}}
  namespace: {{{{ workspace.metadata.namespace }}}}
spec:
  path: /workspaces/{{{{ workspace.metadata.namespace }}}}/{{{{ workspace.metadata.name }}}}
  backend: {{{{ service.metadata.name }}}}
"#
        ),
    }
}

pub fn access_strategy(name: &str, templates: Vec<AccessResourceTemplate>) -> WorkspaceAccessStrategy {
    WorkspaceAccessStrategy {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(TEST_NAMESPACE.to_string()),
            ..Default::default()
        },
        spec: AccessStrategySpec {
            display_name: name.to_string(),
            access_resource_templates: templates,
            access_url_template: Some(
                "https://example.com/workspaces/{{ workspace.metadata.namespace }}/{{ workspace.metadata.name }}/"
                    .to_string(),
            ),
            deployment_modifications: None,
        },
    }
}
