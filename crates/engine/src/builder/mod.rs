// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side-effect-free builders for every dependent object.
//!
//! Each builder turns (workspace, resolved inputs, access strategy) into the
//! desired object. Nothing here talks to the store, so tests can assert on
//! desired specs directly.

mod access;
mod deployment;
mod env;
mod pvc;
mod render;
mod service;

pub use access::{access_labels, access_url, build_access_object};
pub use deployment::build_deployment;
pub use env::merge_env;
pub use pvc::build_pvc;
pub use render::{b32encode, template_context, TemplateRenderer};
pub use service::build_service;

use crate::error::BuildError;
use crate::resolver::ResolvedInputs;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::ObjectMeta;
use kube::{Resource, ResourceExt};
use ws_core::naming::workspace_labels;
use ws_core::{Workspace, WorkspaceAccessStrategy};

/// Everything a typed builder reads.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    pub workspace: &'a Workspace,
    pub inputs: &'a ResolvedInputs,
    pub access_strategy: Option<&'a WorkspaceAccessStrategy>,
    pub renderer: &'a TemplateRenderer,
}

impl<'a> BuildContext<'a> {
    pub fn workspace_name(&self) -> String {
        self.workspace.name_any()
    }

    pub fn namespace(&self) -> String {
        self.workspace.namespace_or_default()
    }

    /// Metadata shared by compute, network and storage objects.
    fn metadata(&self, name: String) -> Result<ObjectMeta, BuildError> {
        Ok(ObjectMeta {
            name: Some(name),
            namespace: Some(self.namespace()),
            labels: Some(workspace_labels(&self.workspace_name())),
            owner_references: Some(vec![owner_reference(self.workspace)?]),
            ..Default::default()
        })
    }
}

/// Controller reference to the workspace so garbage collection cascades.
pub fn owner_reference(workspace: &Workspace) -> Result<OwnerReference, BuildError> {
    workspace
        .controller_owner_ref(&())
        .ok_or_else(|| BuildError::MissingUid(workspace.name_any()))
}
