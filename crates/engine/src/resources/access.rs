// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Membership reconciliation for templated access objects.
//!
//! The tracked reference list is passed in by mutable reference and edited
//! as each write lands, so a pass that fails halfway still leaves the list
//! describing exactly what exists.

use super::ResourceManager;
use crate::builder::build_access_object;
use crate::error::{DependentKind, EngineError};
use k8s_openapi::api::core::v1::Service;
use kube::api::DynamicObject;
use std::collections::BTreeSet;
use ws_adapters::{DynamicKind, ObjectStore, StoreError};
use ws_core::{AccessResourceKey, AccessResourceRef, Workspace, WorkspaceAccessStrategy};

impl<S: ObjectStore> ResourceManager<S> {
    /// Make the live access objects match the strategy's current templates.
    ///
    /// Creates newly declared objects, rewrites drifted ones and deletes
    /// tracked objects no template implies any more. Returns `false` while a
    /// removed object is still draining.
    pub async fn ensure_access_resources_exist(
        &self,
        workspace: &Workspace,
        strategy: &WorkspaceAccessStrategy,
        service: &Service,
        tracked: &mut Vec<AccessResourceRef>,
    ) -> Result<bool, EngineError> {
        let store_err = EngineError::store(DependentKind::Access);
        let mut declared = BTreeSet::new();

        for template in &strategy.spec.access_resource_templates {
            let desired = build_access_object(self.renderer(), template, workspace, strategy, service)
                .map_err(EngineError::build(DependentKind::Access))?;
            let reference = AccessResourceRef {
                kind: template.kind.clone(),
                api_version: template.api_version.clone(),
                name: desired.metadata.name.clone().unwrap_or_default(),
                namespace: workspace.namespace_or_default(),
            };
            let key = reference.key();
            let kind = DynamicKind::new(&reference.api_version, &reference.kind);
            declared.insert(key.clone());

            if let Some(position) = tracked.iter().position(|r| r.key() == key) {
                let live = self
                    .store()
                    .get_dynamic(&kind, &reference.namespace, &reference.name)
                    .await
                    .map_err(store_err)?;
                match live {
                    Some(live) => {
                        self.sync_access_spec(&kind, live, &desired).await?;
                        continue;
                    }
                    None => {
                        tracing::info!(object = %key, "tracked access object is gone, recreating");
                        tracked.remove(position);
                    }
                }
            }

            self.create_or_adopt(&kind, &desired).await?;
            tracing::info!(object = %key, "created access object");
            tracked.push(reference);
        }

        self.delete_undeclared(tracked, &declared).await
    }

    /// Attempt deletion of every tracked access object.
    ///
    /// References whose objects are gone are dropped; the rest stay so a
    /// retry resumes where this one stopped. Returns `true` once the list
    /// is empty.
    pub async fn ensure_access_resources_deleted(
        &self,
        tracked: &mut Vec<AccessResourceRef>,
    ) -> Result<bool, EngineError> {
        let mut first_error = None;
        let mut remaining = Vec::with_capacity(tracked.len());

        for reference in tracked.drain(..) {
            match self.delete_access_object(&reference).await {
                Ok(true) => {}
                Ok(false) => remaining.push(reference),
                Err(e) => {
                    tracing::warn!(object = %reference.key(), error = %e, "failed to delete access object");
                    first_error.get_or_insert(e);
                    remaining.push(reference);
                }
            }
        }

        *tracked = remaining;
        match first_error {
            Some(e) => Err(EngineError::store(DependentKind::Access)(e)),
            None => Ok(tracked.is_empty()),
        }
    }

    async fn sync_access_spec(
        &self,
        kind: &DynamicKind,
        mut live: DynamicObject,
        desired: &DynamicObject,
    ) -> Result<(), EngineError> {
        let wanted = desired.data.get("spec");
        if live.data.get("spec") == wanted {
            return Ok(());
        }
        if let Some(fields) = live.data.as_object_mut() {
            match wanted {
                Some(spec) => {
                    fields.insert("spec".to_string(), spec.clone());
                }
                None => {
                    fields.remove("spec");
                }
            }
        }
        tracing::info!(kind = %kind, name = ?live.metadata.name, "updating drifted access object");
        self.store()
            .update_dynamic(kind, &live)
            .await
            .map_err(EngineError::store(DependentKind::Access))?;
        Ok(())
    }

    /// Create, or take over an object a concurrent writer created first.
    async fn create_or_adopt(
        &self,
        kind: &DynamicKind,
        desired: &DynamicObject,
    ) -> Result<(), EngineError> {
        let store_err = EngineError::store(DependentKind::Access);
        let err = match self.store().create_dynamic(kind, desired).await {
            Ok(_) => return Ok(()),
            Err(e) if e.is_already_exists() => e,
            Err(e) => return Err(store_err(e)),
        };

        let namespace = desired.metadata.namespace.as_deref().unwrap_or_default();
        let name = desired.metadata.name.as_deref().unwrap_or_default();
        let Some(live) = self
            .store()
            .get_dynamic(kind, namespace, name)
            .await
            .map_err(store_err)?
        else {
            // Deleted between the create and the read; the next pass creates it
            return Err(store_err(err));
        };

        let mut adopted = desired.clone();
        adopted.metadata.resource_version = live.metadata.resource_version;
        tracing::info!(kind = %kind, name = %name, "adopting existing access object");
        self.store()
            .update_dynamic(kind, &adopted)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn delete_undeclared(
        &self,
        tracked: &mut Vec<AccessResourceRef>,
        declared: &BTreeSet<AccessResourceKey>,
    ) -> Result<bool, EngineError> {
        let mut settled = true;
        let mut index = 0;
        while index < tracked.len() {
            let reference = &tracked[index];
            if declared.contains(&reference.key()) {
                index += 1;
                continue;
            }
            let gone = self
                .delete_access_object(reference)
                .await
                .map_err(EngineError::store(DependentKind::Access))?;
            if gone {
                tracing::info!(object = %reference.key(), "deleted undeclared access object");
                tracked.remove(index);
            } else {
                settled = false;
                index += 1;
            }
        }
        Ok(settled)
    }

    /// `true` once the object no longer exists.
    async fn delete_access_object(&self, reference: &AccessResourceRef) -> Result<bool, StoreError> {
        let kind = DynamicKind::new(&reference.api_version, &reference.kind);
        match self
            .store()
            .delete_dynamic(&kind, &reference.namespace, &reference.name)
            .await
        {
            Ok(remaining) => Ok(remaining.is_none()),
            Err(e) if e.is_not_found() => Ok(true),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
