// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Compute: a single-replica deployment running the workspace image

use super::env::{merge_env, rendered_merge_env};
use super::BuildContext;
use crate::error::BuildError;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PersistentVolumeClaimVolumeSource, PodSpec, PodTemplateSpec, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use ws_core::naming::{
    deployment_name, pvc_name, workspace_labels, PRIMARY_CONTAINER_NAME, STORAGE_VOLUME_NAME,
    WORKSPACE_PORT, WORKSPACE_PORT_NAME,
};
use ws_core::DeploymentModifications;

pub fn build_deployment(ctx: &BuildContext<'_>) -> Result<Deployment, BuildError> {
    let workspace_name = ctx.workspace_name();
    let labels = workspace_labels(&workspace_name);

    let mut pod = PodSpec {
        containers: vec![primary_container(ctx)?],
        ..Default::default()
    };
    if ctx.inputs.storage.is_some() {
        pod.volumes = Some(vec![Volume {
            name: STORAGE_VOLUME_NAME.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: pvc_name(&workspace_name),
                read_only: None,
            }),
            ..Default::default()
        }]);
    }
    if let Some(mods) = ctx
        .access_strategy
        .and_then(|s| s.spec.deployment_modifications.as_ref())
    {
        apply_modifications(&mut pod, mods);
    }

    Ok(Deployment {
        metadata: ctx.metadata(deployment_name(&workspace_name))?,
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                match_expressions: None,
            },
            // A home volume is ReadWriteOnce, so the old pod must go first
            strategy: Some(DeploymentStrategy {
                type_: Some("Recreate".to_string()),
                rolling_update: None,
            }),
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(pod),
            },
            ..Default::default()
        }),
        status: None,
    })
}

fn primary_container(ctx: &BuildContext<'_>) -> Result<Container, BuildError> {
    let config = ctx
        .workspace
        .spec
        .container_config
        .clone()
        .unwrap_or_default();

    let mut env = config.env;
    if let Some(strategy) = ctx.access_strategy {
        merge_env(
            &mut env,
            rendered_merge_env(ctx.renderer, ctx.workspace, strategy)?,
        );
    }

    let mut mounts = Vec::new();
    if let Some(storage) = &ctx.inputs.storage {
        mounts.push(VolumeMount {
            name: STORAGE_VOLUME_NAME.to_string(),
            mount_path: storage.mount_path.clone(),
            ..Default::default()
        });
    }

    Ok(Container {
        name: PRIMARY_CONTAINER_NAME.to_string(),
        image: Some(ctx.inputs.image.clone()),
        command: non_empty(config.command),
        args: non_empty(config.args),
        env: non_empty(env),
        ports: Some(vec![ContainerPort {
            name: Some(WORKSPACE_PORT_NAME.to_string()),
            container_port: WORKSPACE_PORT,
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }]),
        resources: Some(ctx.inputs.resources.clone()),
        volume_mounts: non_empty(mounts),
        ..Default::default()
    })
}

/// Append the strategy's volumes, init containers, sidecars and primary
/// container mounts.
fn apply_modifications(pod: &mut PodSpec, mods: &DeploymentModifications) {
    if !mods.volumes.is_empty() {
        pod.volumes
            .get_or_insert_with(Vec::new)
            .extend(mods.volumes.iter().cloned());
    }
    if !mods.init_containers.is_empty() {
        pod.init_containers
            .get_or_insert_with(Vec::new)
            .extend(mods.init_containers.iter().cloned());
    }
    if !mods.volume_mounts.is_empty() {
        if let Some(primary) = pod.containers.first_mut() {
            primary
                .volume_mounts
                .get_or_insert_with(Vec::new)
                .extend(mods.volume_mounts.iter().cloned());
        }
    }
    pod.containers.extend(mods.sidecars.iter().cloned());
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
#[path = "deployment_tests.rs"]
mod tests;
