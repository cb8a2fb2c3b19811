// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource convergence engine.
//!
//! Every operation is safe to re-run from any point of partial progress:
//! objects are found by deterministic name, so a pass never needs to know
//! what an earlier pass did.

mod access;
mod dependent;

pub use dependent::{Compute, Dependent, Network, Storage};

use crate::builder::{BuildContext, TemplateRenderer};
use crate::error::EngineError;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use kube::{Resource, ResourceExt};
use std::sync::Arc;
use ws_adapters::ObjectStore;
use ws_core::Workspace;

/// Drives typed and untyped dependents toward their desired state
#[derive(Clone)]
pub struct ResourceManager<S> {
    store: S,
    renderer: Arc<TemplateRenderer>,
}

impl<S: ObjectStore> ResourceManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            renderer: Arc::new(TemplateRenderer::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Get-or-create.
    ///
    /// Returns `None` only for dependents the workspace does not need
    /// (storage without a storage request).
    pub async fn ensure_exists<D: Dependent>(
        &self,
        ctx: &BuildContext<'_>,
    ) -> Result<Option<D::Object>, EngineError> {
        let namespace = ctx.namespace();
        let name = D::object_name(&ctx.workspace_name());

        if let Some(existing) = self
            .store
            .get::<D::Object>(&namespace, &name)
            .await
            .map_err(EngineError::store(D::KIND))?
        {
            return Ok(Some(existing));
        }

        let Some(desired) = D::build(ctx).map_err(EngineError::build(D::KIND))? else {
            return Ok(None);
        };

        match self.store.create(&desired).await {
            Ok(created) => {
                tracing::info!(kind = %D::KIND, name = %name, "created dependent");
                Ok(Some(created))
            }
            // Lost a race with a concurrent pass; take what is there
            Err(e) if e.is_already_exists() => match self
                .store
                .get::<D::Object>(&namespace, &name)
                .await
                .map_err(EngineError::store(D::KIND))?
            {
                Some(existing) => Ok(Some(existing)),
                None => Err(EngineError::store(D::KIND)(e)),
            },
            Err(e) => Err(EngineError::store(D::KIND)(e)),
        }
    }

    /// Rewrite `existing` when its owned fields have drifted.
    ///
    /// No-op until the workspace itself is available, so objects still
    /// converging from creation are never rewritten mid-flight.
    pub async fn ensure_up_to_date<D: Dependent>(
        &self,
        existing: D::Object,
        ctx: &BuildContext<'_>,
    ) -> Result<D::Object, EngineError> {
        if !ctx.workspace.is_available() {
            return Ok(existing);
        }
        let Some(desired) = D::build(ctx).map_err(EngineError::build(D::KIND))? else {
            return Ok(existing);
        };
        if !D::drifted(&existing, &desired) {
            return Ok(existing);
        }

        let mut updated = existing;
        D::apply(&mut updated, desired);
        tracing::info!(kind = %D::KIND, name = %updated.name_any(), "updating drifted dependent");
        self.store
            .update(&updated)
            .await
            .map_err(EngineError::store(D::KIND))
    }

    /// Initiate deletion.
    ///
    /// Returns the object still present after the delete was accepted, or
    /// `None` once it is gone. An object already marked for deletion is
    /// returned as-is without a second delete.
    pub async fn ensure_deleted<D: Dependent>(
        &self,
        workspace: &Workspace,
    ) -> Result<Option<D::Object>, EngineError> {
        let namespace = workspace.namespace_or_default();
        let name = D::object_name(&workspace.name_any());

        let Some(existing) = self
            .store
            .get::<D::Object>(&namespace, &name)
            .await
            .map_err(EngineError::store(D::KIND))?
        else {
            return Ok(None);
        };
        if is_deleting(&existing) {
            return Ok(Some(existing));
        }

        match self.store.delete::<D::Object>(&namespace, &name).await {
            Ok(remaining) => {
                tracing::info!(kind = %D::KIND, name = %name, "deleted dependent");
                Ok(remaining)
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(EngineError::store(D::KIND)(e)),
        }
    }
}

fn is_deleting<K: Resource>(object: &K) -> bool {
    object.meta().deletion_timestamp.is_some()
}

/// Nothing left, or what is left is already on its way out.
pub fn is_missing_or_deleting<K: Resource>(object: Option<&K>) -> bool {
    match object {
        None => true,
        Some(object) => is_deleting(object),
    }
}

/// Ready once the Available condition says so, or every desired replica reports ready.
pub fn is_deployment_available(deployment: &Deployment) -> bool {
    let Some(status) = deployment.status.as_ref() else {
        return false;
    };
    let available_condition = status
        .conditions
        .iter()
        .flatten()
        .any(|c| c.type_ == "Available" && c.status == "True");
    if available_condition {
        return true;
    }
    let desired = deployment
        .spec
        .as_ref()
        .and_then(|s| s.replicas)
        .unwrap_or(1);
    status.available_replicas.unwrap_or(0) > 0 && status.ready_replicas.unwrap_or(0) >= desired
}

/// Load balancers need an assigned ingress; any other service is ready once it exists.
pub fn is_service_available(service: &Service) -> bool {
    let is_load_balancer = service
        .spec
        .as_ref()
        .and_then(|s| s.type_.as_deref())
        == Some("LoadBalancer");
    if !is_load_balancer {
        return true;
    }
    service
        .status
        .as_ref()
        .and_then(|s| s.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .is_some_and(|ingress| !ingress.is_empty())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
