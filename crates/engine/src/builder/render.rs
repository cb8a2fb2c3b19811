// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template rendering for access objects, access URLs and merge-env values.
//!
//! Templates see `workspace`, `accessStrategy` and, once the network object
//! exists, `service`. Undefined lookups are errors rather than empty strings
//! so a typo in a template surfaces as a build failure.

use crate::error::BuildError;
use k8s_openapi::api::core::v1::Service;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use serde_json::{Map, Value};
use ws_core::{Workspace, WorkspaceAccessStrategy};

const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Strict minijinja environment with the workspace filters registered
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("b32encode", |value: String| b32encode(&value));
        Self { env }
    }

    /// Render `source`; `name` identifies the template in errors.
    pub fn render(&self, name: &str, source: &str, context: &Value) -> Result<String, BuildError> {
        self.env
            .render_str(source, context)
            .map_err(|e| BuildError::Render {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}

/// Lower-case RFC 4648 base32 without padding.
///
/// Used to fold namespaces and names into DNS-safe path segments.
pub fn b32encode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity((bytes.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(char::from(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize]));
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(char::from(
            BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize],
        ));
    }
    out
}

/// Template context: `{workspace, accessStrategy, service?}`.
pub fn template_context(
    workspace: &Workspace,
    strategy: &WorkspaceAccessStrategy,
    service: Option<&Service>,
) -> Result<Value, BuildError> {
    let mut context = Map::new();
    context.insert("workspace".to_string(), to_context_value(workspace, "Workspace")?);
    context.insert(
        "accessStrategy".to_string(),
        to_context_value(strategy, "WorkspaceAccessStrategy")?,
    );
    if let Some(service) = service {
        context.insert("service".to_string(), to_context_value(service, "Service")?);
    }
    Ok(Value::Object(context))
}

fn to_context_value<T: Serialize>(value: &T, kind: &str) -> Result<Value, BuildError> {
    serde_json::to_value(value).map_err(|e| BuildError::InvalidObject {
        kind: kind.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
