// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event adapter backed by `kube::runtime::events::Recorder`.

use super::{EventAdapter, EventError, EventKind, WorkspaceEvent};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use kube::Client;

const ACTION_RECONCILE: &str = "Reconcile";

#[derive(Clone)]
pub struct KubeEventAdapter {
    recorder: Recorder,
}

impl KubeEventAdapter {
    /// `controller` appears as the reporting component on every event.
    pub fn new(client: Client, controller: &str) -> Self {
        let reporter = Reporter {
            controller: controller.to_string(),
            instance: std::env::var("HOSTNAME").ok(),
        };
        Self {
            recorder: Recorder::new(client, reporter),
        }
    }
}

#[async_trait]
impl EventAdapter for KubeEventAdapter {
    async fn publish(
        &self,
        regarding: &ObjectReference,
        event: &WorkspaceEvent,
    ) -> Result<(), EventError> {
        let type_ = match event.kind {
            EventKind::Normal => EventType::Normal,
            EventKind::Warning => EventType::Warning,
        };
        let event = Event {
            type_,
            reason: event.reason.clone(),
            note: Some(event.message.clone()),
            action: ACTION_RECONCILE.to_string(),
            secondary: None,
        };
        self.recorder
            .publish(&event, regarding)
            .await
            .map_err(|e| EventError::PublishFailed(e.to_string()))
    }
}
