// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciler: one pass for one workspace key.
//!
//! Fetches the workspace, handles the finalizer, gathers the template and
//! access strategy, then hands over to the state machine. The caller is
//! responsible for never running two passes for the same key at once.

use crate::error::{DependentKind, EngineError};
use crate::resolver::ResolvedInputs;
use crate::state_machine::{StateMachine, StateMachineDeps};
use std::time::Duration;
use tracing::Instrument;
use ws_adapters::{EventAdapter, ObjectStore};
use ws_core::naming::WORKSPACE_FINALIZER;
use ws_core::{
    Clock, DesiredStatus, Requeue, Workspace, WorkspaceAccessStrategy, WorkspaceTemplate,
};

pub struct Reconciler<S, E, C: Clock> {
    store: S,
    machine: StateMachine<S, E, C>,
    deadline: Duration,
}

impl<S, E, C> Reconciler<S, E, C>
where
    S: ObjectStore,
    E: EventAdapter,
    C: Clock,
{
    pub fn new(deps: StateMachineDeps<S, E>, clock: C, deadline: Duration) -> Self {
        Self {
            store: deps.store.clone(),
            machine: StateMachine::new(deps, clock),
            deadline,
        }
    }

    pub fn state_machine(&self) -> &StateMachine<S, E, C> {
        &self.machine
    }

    /// Run one bounded pass.
    pub async fn reconcile(&self, namespace: &str, name: &str) -> Result<Requeue, EngineError> {
        let span = tracing::info_span!("reconcile", workspace = %name, namespace = %namespace);
        let pass = self.reconcile_key(namespace, name).instrument(span);
        match tokio::time::timeout(self.deadline, pass).await {
            Ok(outcome) => outcome,
            Err(_) => Err(EngineError::Deadline(self.deadline)),
        }
    }

    async fn reconcile_key(&self, namespace: &str, name: &str) -> Result<Requeue, EngineError> {
        let Some(workspace) = self.store.get::<Workspace>(namespace, name).await? else {
            tracing::debug!("workspace is gone");
            return Ok(Requeue::Done);
        };

        if workspace.is_deleting() {
            return self.reconcile_deletion(workspace).await;
        }

        if !workspace.has_finalizer() {
            let mut updated = workspace;
            updated
                .metadata
                .finalizers
                .get_or_insert_with(Vec::new)
                .push(WORKSPACE_FINALIZER.to_string());
            self.store.update(&updated).await?;
            tracing::info!("added cleanup finalizer");
            return Ok(Requeue::Short);
        }

        match workspace.desired_status() {
            DesiredStatus::Stopped => self.machine.reconcile_stopped(&workspace).await,
            DesiredStatus::Running => self.reconcile_running(&workspace, namespace).await,
        }
    }

    async fn reconcile_running(
        &self,
        workspace: &Workspace,
        namespace: &str,
    ) -> Result<Requeue, EngineError> {
        let template = match &workspace.spec.template_ref {
            Some(reference) => {
                let found = self
                    .store
                    .get::<WorkspaceTemplate>(reference.namespace_or(namespace), &reference.name)
                    .await?;
                match found {
                    Some(template) => Some(template),
                    None => {
                        let err = EngineError::TemplateNotFound(reference.name.clone());
                        return self.machine.record_error(workspace, err).await;
                    }
                }
            }
            None => None,
        };

        let inputs = match ResolvedInputs::resolve(workspace, template.as_ref()) {
            Ok(inputs) => inputs,
            Err(e) => return self.machine.record_error(workspace, EngineError::Resolve(e)).await,
        };

        // Always read fresh; a stale strategy orphans or misses access objects
        let strategy = match &workspace.spec.access_strategy {
            Some(reference) => {
                let found = self
                    .store
                    .get::<WorkspaceAccessStrategy>(
                        reference.namespace_or(namespace),
                        &reference.name,
                    )
                    .await
                    .map_err(EngineError::store(DependentKind::Access))?;
                match found {
                    Some(strategy) => Some(strategy),
                    None => {
                        let err = EngineError::AccessStrategyNotFound(reference.name.clone());
                        return self.machine.record_error(workspace, err).await;
                    }
                }
            }
            None => None,
        };

        self.machine
            .reconcile_running(workspace, &inputs, strategy.as_ref())
            .await
    }

    async fn reconcile_deletion(&self, workspace: Workspace) -> Result<Requeue, EngineError> {
        if !workspace.has_finalizer() {
            return Ok(Requeue::Done);
        }
        if !self.machine.reconcile_deletion(&workspace).await? {
            return Ok(Requeue::Short);
        }

        let mut released = workspace;
        if let Some(finalizers) = released.metadata.finalizers.as_mut() {
            finalizers.retain(|f| f != WORKSPACE_FINALIZER);
        }
        self.store.update(&released).await?;
        tracing::info!("cleanup complete, released finalizer");
        Ok(Requeue::Done)
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
