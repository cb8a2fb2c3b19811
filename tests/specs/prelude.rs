//! Test helpers for behavioral specifications.
//!
//! A [`World`] is one cluster (the fake object store) plus one controller
//! (the reconciler) watching a single workspace named [`WORKSPACE`].

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub use std::time::Duration;

pub use k8s_openapi::api::apps::v1::{Deployment, DeploymentStatus};
pub use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Service};
pub use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
pub use kube::api::DynamicObject;
pub use ws_adapters::{DeletionMode, DynamicKind, FakeEventAdapter, FakeObjectStore, StoreOp};
pub use ws_core::test_support::{access_strategy, route_template, with_access_strategy, workspace};
pub use ws_core::{
    find_condition, ConditionReason, ConditionType, DesiredStatus, FakeClock, Phase, Requeue,
    StorageSpec, Workspace, WorkspaceAccessStrategy, WorkspaceStatus,
};
pub use ws_engine::{EngineError, Reconciler, StateMachineDeps, EVENT_RUNNING, EVENT_STOPPED};

pub use ws_core::test_support::TEST_NAMESPACE as NAMESPACE;

pub const WORKSPACE: &str = "alice";
pub const STRATEGY: &str = "web";
pub const DEPLOYMENT: &str = "jupyter-alice";
pub const SERVICE: &str = "jupyter-alice-service";
pub const PVC: &str = "jupyter-alice-pvc";

/// Finalizer another actor might hold on a dependent
pub const FOREIGN_FINALIZER: &str = "example.com/drain";

const PASS_DEADLINE: Duration = Duration::from_secs(5);

pub struct World {
    pub store: FakeObjectStore,
    pub events: FakeEventAdapter,
    pub clock: FakeClock,
    reconciler: Reconciler<FakeObjectStore, FakeEventAdapter, FakeClock>,
}

impl World {
    pub fn new() -> Self {
        let store = FakeObjectStore::new();
        let events = FakeEventAdapter::new();
        let clock = FakeClock::new();
        let reconciler = Reconciler::new(
            StateMachineDeps {
                store: store.clone(),
                events: events.clone(),
            },
            clock.clone(),
            PASS_DEADLINE,
        );
        Self {
            store,
            events,
            clock,
            reconciler,
        }
    }

    /// Create the workspace and let the first pass claim it with the finalizer.
    pub async fn admit(&self, ws: Workspace) {
        self.store.insert(&ws);
        assert_eq!(self.pass().await, Requeue::Short);
    }

    pub fn apply_strategy(&self, strategy: &WorkspaceAccessStrategy) {
        self.store.insert(strategy);
    }

    pub async fn try_pass(&self) -> Result<Requeue, EngineError> {
        self.reconciler.reconcile(NAMESPACE, WORKSPACE).await
    }

    pub async fn pass(&self) -> Requeue {
        self.try_pass().await.unwrap()
    }

    /// Admit, create dependents, report compute ready, reach Running.
    pub async fn run_to_running(&self, ws: Workspace) {
        self.admit(ws).await;
        assert_eq!(self.pass().await, Requeue::Short);
        self.compute_becomes_ready();
        assert_eq!(self.pass().await, Requeue::Long);
        assert_eq!(self.phase(), Some(Phase::Running));
    }

    pub fn workspace(&self) -> Option<Workspace> {
        self.store.object(NAMESPACE, WORKSPACE)
    }

    pub fn status(&self) -> WorkspaceStatus {
        self.workspace()
            .and_then(|ws| ws.status)
            .unwrap_or_default()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.status().phase
    }

    pub fn reason(&self, type_: ConditionType) -> Option<ConditionReason> {
        find_condition(&self.status().conditions, type_).map(|c| c.reason)
    }

    pub fn set_desired(&self, desired: DesiredStatus) {
        self.store.modify::<Workspace>(NAMESPACE, WORKSPACE, |ws| {
            ws.spec.desired_status = Some(desired);
        });
    }

    pub fn edit_strategy(&self, f: impl FnOnce(&mut WorkspaceAccessStrategy)) {
        self.store
            .modify::<WorkspaceAccessStrategy>(NAMESPACE, STRATEGY, f);
    }

    /// The kubelet reports the notebook pod ready.
    pub fn compute_becomes_ready(&self) {
        self.store.modify::<Deployment>(NAMESPACE, DEPLOYMENT, |d| {
            d.status = Some(DeploymentStatus {
                available_replicas: Some(1),
                ready_replicas: Some(1),
                ..Default::default()
            });
        });
    }

    pub fn hold_compute(&self) {
        self.store.modify::<Deployment>(NAMESPACE, DEPLOYMENT, |d| {
            d.metadata.finalizers = Some(vec![FOREIGN_FINALIZER.to_string()]);
        });
    }

    pub fn release_compute(&self) {
        self.store.modify::<Deployment>(NAMESPACE, DEPLOYMENT, |d| {
            d.metadata.finalizers = None;
        });
    }

    pub fn has<K: ws_adapters::StoreObject>(&self, name: &str) -> bool {
        self.store.object::<K>(NAMESPACE, name).is_some()
    }

    pub fn routes(&self) -> Vec<String> {
        self.store.names("HTTPRoute", NAMESPACE)
    }

    pub fn route(&self, name: &str) -> Option<DynamicObject> {
        self.store.dynamic_object(&route_kind(), NAMESPACE, name)
    }

    pub fn tracked_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .status()
            .access_resources
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        names
    }
}

pub fn route_kind() -> DynamicKind {
    DynamicKind::new("gateway.networking.k8s.io/v1", "HTTPRoute")
}

/// Workspace that asks for persistent storage.
pub fn workspace_with_storage() -> Workspace {
    let mut ws = workspace(WORKSPACE);
    ws.spec.storage = Some(StorageSpec {
        size: Some(Quantity("1Gi".to_string())),
        ..Default::default()
    });
    ws
}

/// Workspace wired to the shared strategy.
pub fn workspace_with_access() -> Workspace {
    with_access_strategy(workspace(WORKSPACE), STRATEGY)
}

pub fn two_route_strategy() -> WorkspaceAccessStrategy {
    access_strategy(
        STRATEGY,
        vec![route_template("route"), route_template("preview")],
    )
}
