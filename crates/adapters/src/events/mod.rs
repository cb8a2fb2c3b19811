// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kubernetes event adapters.
//!
//! Events are informational: callers log failures and carry on.

mod recorder;

pub use recorder::KubeEventAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{EventCall, FakeEventAdapter};

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use thiserror::Error;

/// Errors from event operations
#[derive(Debug, Error)]
pub enum EventError {
    #[error("publish failed: {0}")]
    PublishFailed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Normal,
    Warning,
}

/// Event attached to a workspace
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceEvent {
    pub kind: EventKind,
    pub reason: String,
    pub message: String,
}

impl WorkspaceEvent {
    pub fn normal(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Normal,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

/// Adapter for publishing events about an object
#[async_trait]
pub trait EventAdapter: Clone + Send + Sync + 'static {
    async fn publish(
        &self,
        regarding: &ObjectReference,
        event: &WorkspaceEvent,
    ) -> Result<(), EventError>;
}
