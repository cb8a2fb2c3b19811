// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kube `Controller` wiring.
//!
//! The controller runtime serializes passes per object key, which is the
//! only concurrency guarantee the engine relies on.

use std::sync::Arc;

use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
use k8s_openapi::NamespaceResourceScope;
use kube::runtime::controller::Action;
use kube::runtime::{watcher, Controller};
use kube::{Api, Client, Resource, ResourceExt};
use tracing::{debug, error, info, warn};
use ws_adapters::{EventAdapter, KubeEventAdapter, KubeStore, ObjectStore, TracedStore};
use ws_core::{Clock, Requeue, RequeueIntervals, SystemClock, Workspace};
use ws_engine::{EngineError, Reconciler, StateMachineDeps};

use crate::config::Config;

/// Reporting component on published events
pub const CONTROLLER_NAME: &str = "workspace-controller";

/// Shared state handed to every pass
pub struct Context<S, E, C: Clock> {
    reconciler: Reconciler<S, E, C>,
    requeue: RequeueIntervals,
}

impl<S, E, C> Context<S, E, C>
where
    S: ObjectStore,
    E: EventAdapter,
    C: Clock,
{
    pub fn new(reconciler: Reconciler<S, E, C>, requeue: RequeueIntervals) -> Self {
        Self {
            reconciler,
            requeue,
        }
    }

    pub fn action(&self, requeue: Requeue) -> Action {
        action_for(&self.requeue, requeue)
    }
}

/// Translate a requeue directive into a controller action.
pub fn action_for(intervals: &RequeueIntervals, requeue: Requeue) -> Action {
    match intervals.delay(requeue) {
        Some(delay) => Action::requeue(delay),
        None => Action::await_change(),
    }
}

pub async fn reconcile<S, E, C>(
    workspace: Arc<Workspace>,
    ctx: Arc<Context<S, E, C>>,
) -> Result<Action, EngineError>
where
    S: ObjectStore,
    E: EventAdapter,
    C: Clock,
{
    let namespace = workspace.namespace_or_default();
    let name = workspace.name_any();
    let requeue = ctx.reconciler.reconcile(&namespace, &name).await?;
    debug!(workspace = %name, namespace = %namespace, %requeue, "pass complete");
    Ok(ctx.action(requeue))
}

pub fn error_policy<S, E, C>(
    workspace: Arc<Workspace>,
    error: &EngineError,
    ctx: Arc<Context<S, E, C>>,
) -> Action
where
    S: ObjectStore,
    E: EventAdapter,
    C: Clock,
{
    let requeue = error.requeue();
    warn!(
        workspace = %workspace.name_any(),
        namespace = %workspace.namespace_or_default(),
        error = %error,
        %requeue,
        "reconciliation failed"
    );
    ctx.action(requeue)
}

fn api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

/// Run the controller until a termination signal arrives.
pub async fn run(client: Client, config: &Config) {
    let namespace = config.watch_namespace.as_deref();
    let workspaces = api::<Workspace>(&client, namespace);

    let deps = StateMachineDeps {
        store: TracedStore::new(KubeStore::new(client.clone())),
        events: KubeEventAdapter::new(client.clone(), CONTROLLER_NAME),
    };
    let reconciler = Reconciler::new(deps, SystemClock, config.reconcile_timeout);
    let ctx = Arc::new(Context::new(reconciler, config.requeue));

    info!(
        namespace = namespace.unwrap_or("<all>"),
        short_ms = config.requeue.short.as_millis() as u64,
        long_ms = config.requeue.long.as_millis() as u64,
        "starting workspace controller"
    );

    Controller::new(workspaces, watcher::Config::default())
        .owns(api::<Deployment>(&client, namespace), watcher::Config::default())
        .owns(api::<Service>(&client, namespace), watcher::Config::default())
        .owns(
            api::<PersistentVolumeClaim>(&client, namespace),
            watcher::Config::default(),
        )
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|result| async move {
            match result {
                Ok((object, action)) => debug!(%object, ?action, "reconciled"),
                Err(e) => error!(error = %e, "controller error"),
            }
        })
        .await;

    info!("workspace controller stopped");
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
