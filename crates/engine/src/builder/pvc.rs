// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage: the workspace home volume claim

use super::BuildContext;
use crate::error::BuildError;
use k8s_openapi::api::core::v1::{
    PersistentVolumeClaim, PersistentVolumeClaimSpec, VolumeResourceRequirements,
};
use std::collections::BTreeMap;
use ws_core::naming::pvc_name;

/// `None` when the workspace has no storage to claim.
pub fn build_pvc(ctx: &BuildContext<'_>) -> Result<Option<PersistentVolumeClaim>, BuildError> {
    let Some(storage) = &ctx.inputs.storage else {
        return Ok(None);
    };
    Ok(Some(PersistentVolumeClaim {
        metadata: ctx.metadata(pvc_name(&ctx.workspace_name()))?,
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".to_string()]),
            resources: Some(VolumeResourceRequirements {
                requests: Some(BTreeMap::from([(
                    "storage".to_string(),
                    storage.size.clone(),
                )])),
                limits: None,
            }),
            storage_class_name: storage.storage_class_name.clone(),
            ..Default::default()
        }),
        status: None,
    }))
}

#[cfg(test)]
#[path = "pvc_tests.rs"]
mod tests;
