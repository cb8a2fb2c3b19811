// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake event adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{EventAdapter, EventError, WorkspaceEvent};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded event
#[derive(Debug, Clone)]
pub struct EventCall {
    pub object: String,
    pub event: WorkspaceEvent,
}

#[derive(Default)]
struct FakeEventState {
    calls: Vec<EventCall>,
    fail: bool,
}

/// Fake event adapter for testing
#[derive(Clone, Default)]
pub struct FakeEventAdapter {
    inner: Arc<Mutex<FakeEventState>>,
}

impl FakeEventAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded events
    pub fn calls(&self) -> Vec<EventCall> {
        self.inner.lock().calls.clone()
    }

    /// Reasons of all recorded events, in order
    pub fn reasons(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .map(|c| c.event.reason.clone())
            .collect()
    }

    /// Make every publish fail (calls are still recorded)
    pub fn set_failing(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }
}

#[async_trait]
impl EventAdapter for FakeEventAdapter {
    async fn publish(
        &self,
        regarding: &ObjectReference,
        event: &WorkspaceEvent,
    ) -> Result<(), EventError> {
        let mut state = self.inner.lock();
        state.calls.push(EventCall {
            object: regarding.name.clone().unwrap_or_default(),
            event: event.clone(),
        });
        if state.fail {
            return Err(EventError::PublishFailed("injected".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
