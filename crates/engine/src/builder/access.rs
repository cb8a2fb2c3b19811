// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Access objects rendered from an access strategy's templates.
//!
//! The kinds are not known statically, so each template renders to YAML
//! that is parsed into a [`DynamicObject`]. `apiVersion` and `kind` come
//! from the template entry; name, namespace, labels and owner are always
//! forced so the object can be found and garbage collected.

use super::owner_reference;
use super::render::{template_context, TemplateRenderer};
use crate::error::BuildError;
use k8s_openapi::api::core::v1::Service;
use kube::api::DynamicObject;
use kube::ResourceExt;
use serde_json::Value;
use std::collections::BTreeMap;
use ws_core::naming::{
    access_resource_name, LABEL_ACCESS_STRATEGY_NAME, LABEL_ACCESS_STRATEGY_NAMESPACE,
    LABEL_WORKSPACE_NAME, LABEL_WORKSPACE_NAMESPACE,
};
use ws_core::{AccessResourceTemplate, Workspace, WorkspaceAccessStrategy};

pub fn build_access_object(
    renderer: &TemplateRenderer,
    template: &AccessResourceTemplate,
    workspace: &Workspace,
    strategy: &WorkspaceAccessStrategy,
    service: &Service,
) -> Result<DynamicObject, BuildError> {
    let context = template_context(workspace, strategy, Some(service))?;
    let rendered = renderer.render(&template.name_prefix, &template.template, &context)?;

    let invalid = |message: String| BuildError::InvalidObject {
        kind: template.kind.clone(),
        message,
    };
    let body: Value = serde_yaml::from_str(&rendered).map_err(|e| invalid(e.to_string()))?;
    let mut fields = match body {
        Value::Object(fields) => fields,
        Value::Null => serde_json::Map::new(),
        other => return Err(invalid(format!("expected a mapping, got {other}"))),
    };
    fields.insert(
        "apiVersion".to_string(),
        Value::String(template.api_version.clone()),
    );
    fields.insert("kind".to_string(), Value::String(template.kind.clone()));
    fields
        .entry("metadata")
        .or_insert_with(|| Value::Object(serde_json::Map::new()));

    let mut object: DynamicObject =
        serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(e.to_string()))?;

    let workspace_name = workspace.name_any();
    object.metadata.name = Some(access_resource_name(&template.name_prefix, &workspace_name));
    object.metadata.namespace = Some(workspace.namespace_or_default());
    object
        .metadata
        .labels
        .get_or_insert_with(BTreeMap::new)
        .extend(access_labels(workspace, strategy));
    object.metadata.owner_references = Some(vec![owner_reference(workspace)?]);
    Ok(object)
}

/// Labels tying an access object to its workspace and strategy.
pub fn access_labels(
    workspace: &Workspace,
    strategy: &WorkspaceAccessStrategy,
) -> BTreeMap<String, String> {
    let workspace_namespace = workspace.namespace_or_default();
    let strategy_namespace = strategy
        .namespace()
        .unwrap_or_else(|| workspace_namespace.clone());
    BTreeMap::from([
        (LABEL_WORKSPACE_NAME.to_string(), workspace.name_any()),
        (LABEL_WORKSPACE_NAMESPACE.to_string(), workspace_namespace),
        (LABEL_ACCESS_STRATEGY_NAME.to_string(), strategy.name_any()),
        (LABEL_ACCESS_STRATEGY_NAMESPACE.to_string(), strategy_namespace),
    ])
}

/// Render the strategy's URL template; `None` when it has none.
pub fn access_url(
    renderer: &TemplateRenderer,
    workspace: &Workspace,
    strategy: &WorkspaceAccessStrategy,
    service: &Service,
) -> Result<Option<String>, BuildError> {
    let Some(source) = strategy.spec.access_url_template.as_deref() else {
        return Ok(None);
    };
    let context = template_context(workspace, strategy, Some(service))?;
    renderer.render("accessURL", source, &context).map(Some)
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
