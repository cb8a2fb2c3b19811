// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracked references to templated access objects.
//!
//! Access objects have kinds the controller cannot know statically, so the
//! reference list in workspace status is the only record of what exists.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted pointer to one access object owned by a workspace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessResourceRef {
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub namespace: String,
}

impl AccessResourceRef {
    pub fn key(&self) -> AccessResourceKey {
        AccessResourceKey {
            kind: self.kind.clone(),
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

/// Membership key used to match declared templates against tracked references.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccessResourceKey {
    pub kind: String,
    pub name: String,
    pub namespace: String,
}

impl fmt::Display for AccessResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}
