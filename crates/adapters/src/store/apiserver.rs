// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object store backed by the Kubernetes API server

use super::{
    describe, object_address, status_patch, DynamicKind, ObjectStore, StoreError, StoreObject,
};
use async_trait::async_trait;
use kube::api::{DeleteParams, DynamicObject, Patch, PatchParams, PostParams};
use kube::{Api, Client, Resource};

/// [`ObjectStore`] talking to a cluster through a shared `kube::Client`.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn typed<K: StoreObject>(&self, namespace: &str) -> Api<K> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn dynamic(&self, kind: &DynamicKind, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &kind.api_resource())
    }
}

/// Map API status codes onto the store's error vocabulary.
fn map_error(err: kube::Error, what: String) -> StoreError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => StoreError::NotFound(what),
        kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
            StoreError::AlreadyExists(what)
        }
        kube::Error::Api(resp) if resp.code == 409 => {
            StoreError::Conflict(format!("{what}: {}", resp.message))
        }
        kube::Error::SerdeError(e) => StoreError::Serialization(e.to_string()),
        other => StoreError::Api(format!("{what}: {other}")),
    }
}

#[async_trait]
impl ObjectStore for KubeStore {
    async fn get<K: StoreObject>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<K>, StoreError> {
        self.typed::<K>(namespace)
            .get_opt(name)
            .await
            .map_err(|e| map_error(e, describe(&K::kind(&()), namespace, name)))
    }

    async fn create<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let (namespace, name) = object_address(object)?;
        self.typed::<K>(&namespace)
            .create(&PostParams::default(), object)
            .await
            .map_err(|e| map_error(e, describe(&K::kind(&()), &namespace, &name)))
    }

    async fn update<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let (namespace, name) = object_address(object)?;
        self.typed::<K>(&namespace)
            .replace(&name, &PostParams::default(), object)
            .await
            .map_err(|e| map_error(e, describe(&K::kind(&()), &namespace, &name)))
    }

    async fn update_status<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let (namespace, name) = object_address(object)?;
        let patch = status_patch(object)?;
        self.typed::<K>(&namespace)
            .patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_error(e, describe(&K::kind(&()), &namespace, &name)))
    }

    async fn delete<K: StoreObject>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<K>, StoreError> {
        self.typed::<K>(namespace)
            .delete(name, &DeleteParams::background())
            .await
            .map(|outcome| outcome.left())
            .map_err(|e| map_error(e, describe(&K::kind(&()), namespace, name)))
    }

    async fn get_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError> {
        self.dynamic(kind, namespace)
            .get_opt(name)
            .await
            .map_err(|e| map_error(e, describe(&kind.kind, namespace, name)))
    }

    async fn create_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError> {
        let (namespace, name) = object_address(object)?;
        self.dynamic(kind, &namespace)
            .create(&PostParams::default(), object)
            .await
            .map_err(|e| map_error(e, describe(&kind.kind, &namespace, &name)))
    }

    async fn update_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError> {
        let (namespace, name) = object_address(object)?;
        self.dynamic(kind, &namespace)
            .replace(&name, &PostParams::default(), object)
            .await
            .map_err(|e| map_error(e, describe(&kind.kind, &namespace, &name)))
    }

    async fn delete_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError> {
        self.dynamic(kind, namespace)
            .delete(name, &DeleteParams::background())
            .await
            .map(|outcome| outcome.left())
            .map_err(|e| map_error(e, describe(&kind.kind, namespace, name)))
    }
}

#[cfg(test)]
#[path = "apiserver_tests.rs"]
mod tests;
