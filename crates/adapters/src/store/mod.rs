// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object store adapters.
//!
//! The controller is a client of an eventually consistent store: writes are
//! accepted, not completed. Reads report "not found" as `Ok(None)` and
//! deletes report whether the object is still present (draining) or gone.

mod apiserver;

pub use apiserver::KubeStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DeletionMode, FakeObjectStore, StoreCall, StoreOp};

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind};
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors from object store operations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("conflict writing {0}")]
    Conflict(String),
    #[error("invalid object: {0}")]
    InvalidObject(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("api error: {0}")]
    Api(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Namespaced, statically typed objects the store can read and write.
pub trait StoreObject:
    Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
}

impl<K> StoreObject for K where
    K: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static
{
}

/// apiVersion + kind of an object whose type is only known at runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DynamicKind {
    pub api_version: String,
    pub kind: String,
}

impl DynamicKind {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Split `apiVersion` into group and version; the core group is empty.
    pub fn group_version(&self) -> (&str, &str) {
        match self.api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", self.api_version.as_str()),
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        let (group, version) = self.group_version();
        ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, &self.kind))
    }
}

impl fmt::Display for DynamicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version, self.kind)
    }
}

/// Client for the external object store.
///
/// Implementations must be safe for concurrent use by passes for distinct
/// workspaces.
#[async_trait]
pub trait ObjectStore: Clone + Send + Sync + 'static {
    /// Fetch a typed object; `Ok(None)` when it does not exist.
    async fn get<K: StoreObject>(&self, namespace: &str, name: &str)
        -> Result<Option<K>, StoreError>;

    async fn create<K: StoreObject>(&self, object: &K) -> Result<K, StoreError>;

    /// Replace an object; a stale version token yields `Conflict`.
    async fn update<K: StoreObject>(&self, object: &K) -> Result<K, StoreError>;

    /// Write only the status sub-document of an object.
    async fn update_status<K: StoreObject>(&self, object: &K) -> Result<K, StoreError>;

    /// Request deletion.
    ///
    /// Returns the object when the store still reports it (marked for
    /// deletion), `Ok(None)` once it is gone.
    async fn delete<K: StoreObject>(&self, namespace: &str, name: &str)
        -> Result<Option<K>, StoreError>;

    async fn get_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError>;

    async fn create_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError>;

    async fn update_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError>;

    async fn delete_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError>;
}

/// Namespace and name of an object about to be written.
pub(crate) fn object_address<K: Resource>(object: &K) -> Result<(String, String), StoreError> {
    let meta = object.meta();
    let name = meta
        .name
        .clone()
        .ok_or_else(|| StoreError::InvalidObject("missing metadata.name".to_string()))?;
    let namespace = meta
        .namespace
        .clone()
        .ok_or_else(|| StoreError::InvalidObject(format!("{name}: missing metadata.namespace")))?;
    Ok((namespace, name))
}

/// JSON merge patch body that writes the status sub-document of `object`.
///
/// Fields the patch omits keep their server value, so clearing a field
/// relies on the status type serializing it as `null` or `[]`.
pub(crate) fn status_patch<K: Serialize>(object: &K) -> Result<serde_json::Value, StoreError> {
    let body = serde_json::to_value(object)?;
    let status = body.get("status").cloned().unwrap_or_default();
    Ok(serde_json::json!({ "status": status }))
}

/// Human-readable `Kind namespace/name` used in error messages.
pub(crate) fn describe(kind: &str, namespace: &str, name: &str) -> String {
    format!("{kind} {namespace}/{name}")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
