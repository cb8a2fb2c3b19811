// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The three statically typed dependents.
//!
//! Drift is judged only on the fields the controller owns, so values the
//! cluster fills in (cluster IPs, volume names, status) never trigger an
//! update.

use crate::builder::{build_deployment, build_pvc, build_service, BuildContext};
use crate::error::{BuildError, DependentKind};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use ws_adapters::StoreObject;
use ws_core::naming::{deployment_name, pvc_name, service_name};

/// A typed object owned by a workspace.
pub trait Dependent {
    type Object: StoreObject;

    const KIND: DependentKind;

    fn object_name(workspace: &str) -> String;

    /// Desired object, or `None` when the workspace does not need one.
    fn build(ctx: &BuildContext<'_>) -> Result<Option<Self::Object>, BuildError>;

    fn drifted(live: &Self::Object, desired: &Self::Object) -> bool;

    /// Copy the desired owned fields onto `live`, keeping its identity.
    fn apply(live: &mut Self::Object, desired: Self::Object);
}

pub struct Compute;

impl Dependent for Compute {
    type Object = Deployment;

    const KIND: DependentKind = DependentKind::Compute;

    fn object_name(workspace: &str) -> String {
        deployment_name(workspace)
    }

    fn build(ctx: &BuildContext<'_>) -> Result<Option<Deployment>, BuildError> {
        build_deployment(ctx).map(Some)
    }

    fn drifted(live: &Deployment, desired: &Deployment) -> bool {
        let owned = |d: &Deployment| {
            d.spec
                .as_ref()
                .map(|s| (s.replicas, s.strategy.clone(), s.template.clone()))
        };
        owned(live) != owned(desired)
    }

    fn apply(live: &mut Deployment, desired: Deployment) {
        let Some(mut spec) = desired.spec else {
            return;
        };
        // The selector is immutable once created
        if let Some(current) = &live.spec {
            spec.selector = current.selector.clone();
        }
        live.spec = Some(spec);
    }
}

pub struct Network;

impl Dependent for Network {
    type Object = Service;

    const KIND: DependentKind = DependentKind::Network;

    fn object_name(workspace: &str) -> String {
        service_name(workspace)
    }

    fn build(ctx: &BuildContext<'_>) -> Result<Option<Service>, BuildError> {
        build_service(ctx).map(Some)
    }

    fn drifted(live: &Service, desired: &Service) -> bool {
        let owned = |s: &Service| {
            s.spec
                .as_ref()
                .map(|spec| (spec.type_.clone(), spec.selector.clone(), spec.ports.clone()))
        };
        owned(live) != owned(desired)
    }

    fn apply(live: &mut Service, desired: Service) {
        let Some(desired) = desired.spec else {
            return;
        };
        let spec = live.spec.get_or_insert_with(Default::default);
        spec.type_ = desired.type_;
        spec.selector = desired.selector;
        spec.ports = desired.ports;
    }
}

pub struct Storage;

impl Dependent for Storage {
    type Object = PersistentVolumeClaim;

    const KIND: DependentKind = DependentKind::Storage;

    fn object_name(workspace: &str) -> String {
        pvc_name(workspace)
    }

    fn build(ctx: &BuildContext<'_>) -> Result<Option<PersistentVolumeClaim>, BuildError> {
        build_pvc(ctx)
    }

    fn drifted(live: &PersistentVolumeClaim, desired: &PersistentVolumeClaim) -> bool {
        let owned = |p: &PersistentVolumeClaim| {
            p.spec.as_ref().map(|s| {
                let requested = s
                    .resources
                    .as_ref()
                    .and_then(|r| r.requests.as_ref())
                    .and_then(|r| r.get("storage"))
                    .cloned();
                (
                    s.access_modes.clone(),
                    requested,
                    s.storage_class_name.clone(),
                )
            })
        };
        owned(live) != owned(desired)
    }

    fn apply(live: &mut PersistentVolumeClaim, desired: PersistentVolumeClaim) {
        let Some(desired) = desired.spec else {
            return;
        };
        let spec = live.spec.get_or_insert_with(Default::default);
        spec.access_modes = desired.access_modes;
        spec.resources = desired.resources;
        spec.storage_class_name = desired.storage_class_name;
    }
}

#[cfg(test)]
#[path = "dependent_tests.rs"]
mod tests;
