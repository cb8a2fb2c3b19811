// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired-state state machine.
//!
//! Drives the resource engine through the Running and Stopped transitions
//! and through finalizer cleanup. A pass works on an in-memory copy of the
//! workspace status and writes it back once at the end, whether the pass
//! succeeded or not, so tracked access references always describe what the
//! pass actually did. Cleanup writes only the tracked references, and only
//! while it is unfinished.

use crate::builder::{access_url, BuildContext};
use crate::error::{DependentKind, EngineError};
use crate::resolver::ResolvedInputs;
use crate::resources::{
    is_deployment_available, is_missing_or_deleting, is_service_available, Compute, Network,
    ResourceManager, Storage,
};
use crate::status::{not_ready_reason, not_stopped_reason, StatusManager};
use kube::{Resource, ResourceExt};
use ws_adapters::{EventAdapter, ObjectStore, WorkspaceEvent};
use ws_core::naming::{access_resource_selector, PREEMPTED_MESSAGE};
use ws_core::{
    AccessResourceRef, Clock, Phase, Requeue, Workspace, WorkspaceAccessStrategy, WorkspaceStatus,
};

pub const EVENT_RUNNING: &str = "WorkspaceRunning";
pub const EVENT_STOPPED: &str = "WorkspaceStopped";

/// Adapter dependencies of the state machine
pub struct StateMachineDeps<S, E> {
    pub store: S,
    pub events: E,
}

pub struct StateMachine<S, E, C: Clock> {
    resources: ResourceManager<S>,
    status: StatusManager<C>,
    events: E,
}

impl<S, E, C> StateMachine<S, E, C>
where
    S: ObjectStore,
    E: EventAdapter,
    C: Clock,
{
    pub fn new(deps: StateMachineDeps<S, E>, clock: C) -> Self {
        Self {
            resources: ResourceManager::new(deps.store),
            status: StatusManager::new(clock),
            events: deps.events,
        }
    }

    pub fn resources(&self) -> &ResourceManager<S> {
        &self.resources
    }

    /// Bring compute, network, storage and access objects up.
    pub async fn reconcile_running(
        &self,
        workspace: &Workspace,
        inputs: &ResolvedInputs,
        strategy: Option<&WorkspaceAccessStrategy>,
    ) -> Result<Requeue, EngineError> {
        let mut status = current_status(workspace);
        let outcome = self
            .converge_running(workspace, inputs, strategy, &mut status)
            .await;
        self.finish(workspace, status, outcome).await
    }

    /// Tear compute, network and access objects down; storage is kept.
    pub async fn reconcile_stopped(&self, workspace: &Workspace) -> Result<Requeue, EngineError> {
        let mut status = current_status(workspace);
        let outcome = self.converge_stopped(workspace, &mut status).await;
        self.finish(workspace, status, outcome).await
    }

    /// Record a failure that happened before either transition could run.
    pub async fn record_error(
        &self,
        workspace: &Workspace,
        error: EngineError,
    ) -> Result<Requeue, EngineError> {
        self.finish(workspace, current_status(workspace), Err(error))
            .await
    }

    /// Delete every dependent, storage included.
    ///
    /// Returns `true` only once every category is confirmed absent; the
    /// caller may then release the finalizer. Until then the pruned access
    /// references are written back so a retry resumes where this pass
    /// stopped.
    pub async fn reconcile_deletion(&self, workspace: &Workspace) -> Result<bool, EngineError> {
        let mut tracked = workspace.tracked_access_resources().to_vec();
        let outcome = self.delete_dependents(workspace, &mut tracked).await;
        if matches!(outcome, Ok(true)) {
            return outcome;
        }

        let mut status = current_status(workspace);
        status.access_resources = tracked;
        match (outcome, self.write_status(workspace, status).await) {
            (outcome, Ok(())) => outcome,
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Err(write_err)) => {
                tracing::warn!(error = %write_err, "failed to record teardown progress");
                Err(e)
            }
        }
    }

    async fn delete_dependents(
        &self,
        workspace: &Workspace,
        tracked: &mut Vec<AccessResourceRef>,
    ) -> Result<bool, EngineError> {
        let access_gone = self.resources.ensure_access_resources_deleted(tracked).await?;
        let compute = self.resources.ensure_deleted::<Compute>(workspace).await?;
        let network = self.resources.ensure_deleted::<Network>(workspace).await?;
        let storage = self.resources.ensure_deleted::<Storage>(workspace).await?;

        let complete = access_gone && compute.is_none() && network.is_none() && storage.is_none();
        if !complete {
            tracing::info!(
                access_remaining = tracked.len(),
                compute = compute.is_some(),
                network = network.is_some(),
                storage = storage.is_some(),
                "cleanup still in progress"
            );
        }
        Ok(complete)
    }

    async fn converge_running(
        &self,
        workspace: &Workspace,
        inputs: &ResolvedInputs,
        strategy: Option<&WorkspaceAccessStrategy>,
        status: &mut WorkspaceStatus,
    ) -> Result<Requeue, EngineError> {
        let ctx = BuildContext {
            workspace,
            inputs,
            access_strategy: strategy,
            renderer: self.resources.renderer(),
        };

        if let Some(pvc) = self.resources.ensure_exists::<Storage>(&ctx).await? {
            self.resources.ensure_up_to_date::<Storage>(pvc, &ctx).await?;
        }
        let Some(deployment) = self.resources.ensure_exists::<Compute>(&ctx).await? else {
            return Err(EngineError::Invariant("compute was not built".to_string()));
        };
        let deployment = self
            .resources
            .ensure_up_to_date::<Compute>(deployment, &ctx)
            .await?;
        let Some(service) = self.resources.ensure_exists::<Network>(&ctx).await? else {
            return Err(EngineError::Invariant("network was not built".to_string()));
        };
        let service = self
            .resources
            .ensure_up_to_date::<Network>(service, &ctx)
            .await?;

        let access_ready = match strategy {
            Some(strategy) => {
                let settled = self
                    .resources
                    .ensure_access_resources_exist(
                        workspace,
                        strategy,
                        &service,
                        &mut status.access_resources,
                    )
                    .await?;
                status.access_url = access_url(self.resources.renderer(), workspace, strategy, &service)
                    .map_err(EngineError::build(DependentKind::Access))?;
                status.access_resource_selector = (!strategy.spec.access_resource_templates.is_empty())
                    .then(|| access_resource_selector(&workspace.name_any()));
                settled
            }
            None => {
                status.access_url = None;
                status.access_resource_selector = None;
                self.resources
                    .ensure_access_resources_deleted(&mut status.access_resources)
                    .await?
            }
        };

        let compute_ready = is_deployment_available(&deployment);
        let service_ready = is_service_available(&service);
        let deployment_name = deployment.name_any();
        let service_name = service.name_any();

        match not_ready_reason(compute_ready, service_ready, access_ready) {
            Some(reason) => {
                tracing::info!(compute_ready, service_ready, access_ready, "workspace not ready");
                self.status
                    .starting(status, reason, &deployment_name, &service_name);
                Ok(Requeue::Short)
            }
            None => {
                if workspace.phase() != Some(Phase::Running) {
                    tracing::info!("workspace is running");
                    self.publish(
                        workspace,
                        WorkspaceEvent::normal(EVENT_RUNNING, "Workspace is now running"),
                    )
                    .await;
                }
                self.status.running(status, &deployment_name, &service_name);
                Ok(Requeue::Long)
            }
        }
    }

    async fn converge_stopped(
        &self,
        workspace: &Workspace,
        status: &mut WorkspaceStatus,
    ) -> Result<Requeue, EngineError> {
        let compute = self.resources.ensure_deleted::<Compute>(workspace).await?;
        let network = self.resources.ensure_deleted::<Network>(workspace).await?;

        status.access_url = None;
        status.access_resource_selector = None;
        let access_gone = self
            .resources
            .ensure_access_resources_deleted(&mut status.access_resources)
            .await?;

        if !is_missing_or_deleting(compute.as_ref()) && !is_missing_or_deleting(network.as_ref()) {
            return Err(EngineError::Invariant(
                "compute and network are live and unmarked after delete".to_string(),
            ));
        }

        let compute_gone = compute.is_none();
        let network_gone = network.is_none();
        match not_stopped_reason(compute_gone, network_gone, access_gone) {
            Some(reason) => {
                tracing::info!(compute_gone, network_gone, access_gone, "workspace still stopping");
                self.status.stopping(status, reason);
                Ok(Requeue::Short)
            }
            None => {
                let preempted = workspace.is_preempted();
                if workspace.phase() != Some(Phase::Stopped) {
                    tracing::info!(preempted, "workspace is stopped");
                    let message = if preempted {
                        PREEMPTED_MESSAGE
                    } else {
                        "Workspace has been stopped"
                    };
                    self.publish(workspace, WorkspaceEvent::normal(EVENT_STOPPED, message))
                        .await;
                }
                self.status.stopped(status, preempted);
                Ok(Requeue::Long)
            }
        }
    }

    /// Fold the pass outcome into status and write it, once.
    async fn finish(
        &self,
        workspace: &Workspace,
        mut status: WorkspaceStatus,
        outcome: Result<Requeue, EngineError>,
    ) -> Result<Requeue, EngineError> {
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "reconcile pass failed");
            if let Some(reason) = e.degraded_reason() {
                self.status.degraded(&mut status, reason, &e.to_string());
            }
        }

        let written = self.write_status(workspace, status).await;
        match (outcome, written) {
            (Ok(requeue), Ok(())) => Ok(requeue),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(write_err)) => {
                tracing::warn!(error = %write_err, "failed to record degraded status");
                Err(e)
            }
        }
    }

    async fn write_status(
        &self,
        workspace: &Workspace,
        status: WorkspaceStatus,
    ) -> Result<(), EngineError> {
        if current_status(workspace) == status {
            return Ok(());
        }
        let mut updated = workspace.clone();
        updated.status = Some(status);
        self.resources.store().update_status(&updated).await?;
        Ok(())
    }

    /// Events are informational; a failed publish never fails the pass.
    async fn publish(&self, workspace: &Workspace, event: WorkspaceEvent) {
        let regarding = workspace.object_ref(&());
        if let Err(e) = self.events.publish(&regarding, &event).await {
            tracing::warn!(reason = %event.reason, error = %e, "failed to publish event");
        }
    }
}

fn current_status(workspace: &Workspace) -> WorkspaceStatus {
    workspace.status.clone().unwrap_or_default()
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
