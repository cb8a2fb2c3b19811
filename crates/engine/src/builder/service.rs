// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Network: cluster-internal service in front of the workspace pod

use super::BuildContext;
use crate::error::BuildError;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use ws_core::naming::{service_name, workspace_labels, WORKSPACE_PORT, WORKSPACE_PORT_NAME};

pub fn build_service(ctx: &BuildContext<'_>) -> Result<Service, BuildError> {
    let workspace_name = ctx.workspace_name();
    Ok(Service {
        metadata: ctx.metadata(service_name(&workspace_name))?,
        spec: Some(ServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(workspace_labels(&workspace_name)),
            ports: Some(vec![ServicePort {
                name: Some(WORKSPACE_PORT_NAME.to_string()),
                port: WORKSPACE_PORT,
                target_port: Some(IntOrString::Int(WORKSPACE_PORT)),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        status: None,
    })
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
