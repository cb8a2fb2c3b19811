// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment merging for the primary container

use super::render::{template_context, TemplateRenderer};
use crate::error::BuildError;
use k8s_openapi::api::core::v1::EnvVar;
use ws_core::{Workspace, WorkspaceAccessStrategy};

/// Apply `overrides` onto `env`: same-named entries are replaced in place,
/// new names are appended in order.
pub fn merge_env(env: &mut Vec<EnvVar>, overrides: Vec<EnvVar>) {
    for var in overrides {
        match env.iter_mut().find(|existing| existing.name == var.name) {
            Some(existing) => *existing = var,
            None => env.push(var),
        }
    }
}

/// Render the strategy's merge-env value templates.
pub(crate) fn rendered_merge_env(
    renderer: &TemplateRenderer,
    workspace: &Workspace,
    strategy: &WorkspaceAccessStrategy,
) -> Result<Vec<EnvVar>, BuildError> {
    let templates = strategy.merge_env();
    if templates.is_empty() {
        return Ok(Vec::new());
    }
    let context = template_context(workspace, strategy, None)?;
    templates
        .iter()
        .map(|t| {
            let value = renderer.render(&t.name, &t.value_template, &context)?;
            Ok(EnvVar {
                name: t.name.clone(),
                value: Some(value),
                value_from: None,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
