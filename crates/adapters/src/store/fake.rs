// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake object store for testing.
//!
//! An in-memory JSON document store keyed by (apiVersion, kind, namespace,
//! name). It assigns uids and version tokens, enforces optimistic
//! concurrency on update, and can simulate asynchronous deletion.
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    describe, object_address, status_patch, DynamicKind, ObjectStore, StoreError, StoreObject,
};
use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::Resource;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

const DELETION_TIMESTAMP: &str = "2026-01-01T00:00:00Z";

/// Kind of store operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Create,
    Update,
    UpdateStatus,
    Delete,
}

impl StoreOp {
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreOp::Get)
    }
}

/// Recorded store call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

/// How deletes are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletionMode {
    /// Objects without finalizers disappear on delete
    #[default]
    Immediate,
    /// Objects are marked for deletion and linger until [`FakeObjectStore::finish_deletions`]
    Graceful,
    /// Deletes are accepted but the object is reported live and unmarked
    Unacknowledged,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectKey {
    api_version: String,
    kind: String,
    namespace: String,
    name: String,
}

struct Failure {
    op: StoreOp,
    kind: String,
    error: StoreError,
}

#[derive(Default)]
struct FakeStoreState {
    objects: BTreeMap<ObjectKey, Value>,
    calls: Vec<StoreCall>,
    failures: Vec<Failure>,
    deletion_mode: DeletionMode,
    version: u64,
}

impl FakeStoreState {
    fn record(&mut self, op: StoreOp, key: &ObjectKey) -> Result<(), StoreError> {
        self.calls.push(StoreCall {
            op,
            kind: key.kind.clone(),
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        });
        match self
            .failures
            .iter()
            .find(|f| f.op == op && f.kind == key.kind)
        {
            Some(failure) => Err(failure.error.clone()),
            None => Ok(()),
        }
    }

    fn next_version(&mut self) -> String {
        self.version += 1;
        self.version.to_string()
    }

    fn get(&mut self, key: &ObjectKey) -> Result<Option<Value>, StoreError> {
        self.record(StoreOp::Get, key)?;
        Ok(self.objects.get(key).cloned())
    }

    fn create(&mut self, key: ObjectKey, mut value: Value) -> Result<Value, StoreError> {
        self.record(StoreOp::Create, &key)?;
        if self.objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key.describe()));
        }
        let version = self.next_version();
        stamp_new(&mut value, &key, version);
        self.objects.insert(key, value.clone());
        Ok(value)
    }

    fn update(&mut self, key: ObjectKey, mut value: Value) -> Result<Value, StoreError> {
        self.record(StoreOp::Update, &key)?;
        let Some(stored) = self.objects.get(&key) else {
            return Err(StoreError::NotFound(key.describe()));
        };
        let incoming = value
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str);
        let current = stored
            .pointer("/metadata/resourceVersion")
            .and_then(Value::as_str);
        if incoming.is_some() && incoming != current {
            return Err(StoreError::Conflict(format!(
                "{}: stale resourceVersion",
                key.describe()
            )));
        }

        // The main resource endpoint never writes status or server-owned metadata.
        for field in ["uid", "creationTimestamp", "deletionTimestamp"] {
            match stored.pointer(&format!("/metadata/{field}")) {
                Some(v) => value["metadata"][field] = v.clone(),
                None => {
                    if let Some(meta) = value.get_mut("metadata").and_then(Value::as_object_mut) {
                        meta.remove(field);
                    }
                }
            }
        }
        match stored.get("status").cloned() {
            Some(status) => value["status"] = status,
            None => {
                if let Some(obj) = value.as_object_mut() {
                    obj.remove("status");
                }
            }
        }
        value["metadata"]["resourceVersion"] = Value::String(self.next_version());

        if is_marked(&value) && !has_finalizers(&value) {
            self.objects.remove(&key);
        } else {
            self.objects.insert(key, value.clone());
        }
        Ok(value)
    }

    /// Apply a status merge patch the way the API server does (RFC 7386).
    fn update_status(&mut self, key: ObjectKey, patch: &Value) -> Result<Value, StoreError> {
        self.record(StoreOp::UpdateStatus, &key)?;
        let version = self.next_version();
        let Some(stored) = self.objects.get_mut(&key) else {
            return Err(StoreError::NotFound(key.describe()));
        };
        json_patch::merge(stored, patch);
        stored["metadata"]["resourceVersion"] = Value::String(version);
        Ok(stored.clone())
    }

    fn delete(&mut self, key: ObjectKey) -> Result<Option<Value>, StoreError> {
        self.record(StoreOp::Delete, &key)?;
        let mode = self.deletion_mode;
        let Some(stored) = self.objects.get_mut(&key) else {
            return Err(StoreError::NotFound(key.describe()));
        };
        match mode {
            DeletionMode::Unacknowledged => Ok(Some(stored.clone())),
            DeletionMode::Immediate if !has_finalizers(stored) => {
                self.objects.remove(&key);
                Ok(None)
            }
            DeletionMode::Immediate | DeletionMode::Graceful => {
                if !is_marked(stored) {
                    stored["metadata"]["deletionTimestamp"] =
                        Value::String(DELETION_TIMESTAMP.to_string());
                }
                Ok(Some(stored.clone()))
            }
        }
    }
}

impl ObjectKey {
    fn typed<K: Resource<DynamicType = ()>>(namespace: &str, name: &str) -> Self {
        Self {
            api_version: K::api_version(&()).into_owned(),
            kind: K::kind(&()).into_owned(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    fn dynamic(kind: &DynamicKind, namespace: &str, name: &str) -> Self {
        Self {
            api_version: kind.api_version.clone(),
            kind: kind.kind.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    fn describe(&self) -> String {
        describe(&self.kind, &self.namespace, &self.name)
    }
}

fn stamp_new(value: &mut Value, key: &ObjectKey, version: String) {
    value["apiVersion"] = Value::String(key.api_version.clone());
    value["kind"] = Value::String(key.kind.clone());
    value["metadata"]["namespace"] = Value::String(key.namespace.clone());
    value["metadata"]["uid"] = Value::String(uuid::Uuid::new_v4().to_string());
    value["metadata"]["resourceVersion"] = Value::String(version);
}

fn is_marked(value: &Value) -> bool {
    value.pointer("/metadata/deletionTimestamp").is_some()
}

fn has_finalizers(value: &Value) -> bool {
    value
        .pointer("/metadata/finalizers")
        .and_then(Value::as_array)
        .is_some_and(|f| !f.is_empty())
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, StoreError> {
    Ok(serde_json::from_value(value)?)
}

/// Fake object store for testing
#[derive(Clone, Default)]
pub struct FakeObjectStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls that mutate the store
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(|c| c.op.is_write()).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Fail every `op` on objects of `kind` until [`Self::clear_failures`].
    pub fn fail(&self, op: StoreOp, kind: &str, error: StoreError) {
        self.inner.lock().failures.push(Failure {
            op,
            kind: kind.to_string(),
            error,
        });
    }

    pub fn clear_failures(&self) {
        self.inner.lock().failures.clear();
    }

    pub fn set_deletion_mode(&self, mode: DeletionMode) {
        self.inner.lock().deletion_mode = mode;
    }

    /// Complete every pending deletion whose finalizers are cleared.
    pub fn finish_deletions(&self) {
        self.inner
            .lock()
            .objects
            .retain(|_, v| !is_marked(v) || has_finalizers(v));
    }

    /// Seed a typed object without recording a call.
    pub fn insert<K: StoreObject>(&self, object: &K) -> K {
        let mut state = self.inner.lock();
        let (namespace, name) = match object_address(object) {
            Ok(address) => address,
            Err(_) => return object.clone(),
        };
        let key = ObjectKey::typed::<K>(&namespace, &name);
        let mut value = serde_json::to_value(object).unwrap_or_default();
        let version = state.next_version();
        stamp_new(&mut value, &key, version);
        state.objects.insert(key, value.clone());
        serde_json::from_value(value).unwrap_or_else(|_| object.clone())
    }

    /// Seed an untyped object without recording a call.
    pub fn insert_dynamic(&self, kind: &DynamicKind, object: &DynamicObject) {
        let mut state = self.inner.lock();
        let Ok((namespace, name)) = object_address(object) else {
            return;
        };
        let key = ObjectKey::dynamic(kind, &namespace, &name);
        let mut value = serde_json::to_value(object).unwrap_or_default();
        let version = state.next_version();
        stamp_new(&mut value, &key, version);
        state.objects.insert(key, value);
    }

    /// Read a typed object without recording a call.
    pub fn object<K: StoreObject>(&self, namespace: &str, name: &str) -> Option<K> {
        let key = ObjectKey::typed::<K>(namespace, name);
        let value = self.inner.lock().objects.get(&key).cloned()?;
        serde_json::from_value(value).ok()
    }

    /// Read an untyped object without recording a call.
    pub fn dynamic_object(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Option<DynamicObject> {
        let key = ObjectKey::dynamic(kind, namespace, name);
        let value = self.inner.lock().objects.get(&key).cloned()?;
        serde_json::from_value(value).ok()
    }

    /// Names of every stored object of `kind` in `namespace`.
    pub fn names(&self, kind: &str, namespace: &str) -> Vec<String> {
        self.inner
            .lock()
            .objects
            .keys()
            .filter(|k| k.kind == kind && k.namespace == namespace)
            .map(|k| k.name.clone())
            .collect()
    }

    /// Mutate a stored typed object in place, as another actor would.
    pub fn modify<K: StoreObject>(&self, namespace: &str, name: &str, f: impl FnOnce(&mut K)) {
        let key = ObjectKey::typed::<K>(namespace, name);
        let mut state = self.inner.lock();
        let Some(value) = state.objects.get(&key).cloned() else {
            return;
        };
        let Ok(mut object) = serde_json::from_value::<K>(value) else {
            return;
        };
        f(&mut object);
        if let Ok(updated) = serde_json::to_value(&object) {
            state.objects.insert(key, updated);
        }
    }
}

fn encode<T: Serialize>(object: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(object)?)
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn get<K: StoreObject>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<K>, StoreError> {
        let value = self
            .inner
            .lock()
            .get(&ObjectKey::typed::<K>(namespace, name))?;
        value.map(decode).transpose()
    }

    async fn create<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let (namespace, name) = object_address(object)?;
        let value = encode(object)?;
        let created = self
            .inner
            .lock()
            .create(ObjectKey::typed::<K>(&namespace, &name), value)?;
        decode(created)
    }

    async fn update<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let (namespace, name) = object_address(object)?;
        let value = encode(object)?;
        let updated = self
            .inner
            .lock()
            .update(ObjectKey::typed::<K>(&namespace, &name), value)?;
        decode(updated)
    }

    async fn update_status<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let (namespace, name) = object_address(object)?;
        let patch = status_patch(object)?;
        let updated = self
            .inner
            .lock()
            .update_status(ObjectKey::typed::<K>(&namespace, &name), &patch)?;
        decode(updated)
    }

    async fn delete<K: StoreObject>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<K>, StoreError> {
        let remaining = self
            .inner
            .lock()
            .delete(ObjectKey::typed::<K>(namespace, name))?;
        remaining.map(decode).transpose()
    }

    async fn get_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError> {
        let value = self
            .inner
            .lock()
            .get(&ObjectKey::dynamic(kind, namespace, name))?;
        value.map(decode).transpose()
    }

    async fn create_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError> {
        let (namespace, name) = object_address(object)?;
        let value = encode(object)?;
        let created = self
            .inner
            .lock()
            .create(ObjectKey::dynamic(kind, &namespace, &name), value)?;
        decode(created)
    }

    async fn update_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError> {
        let (namespace, name) = object_address(object)?;
        let value = encode(object)?;
        let updated = self
            .inner
            .lock()
            .update(ObjectKey::dynamic(kind, &namespace, &name), value)?;
        decode(updated)
    }

    async fn delete_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError> {
        let remaining = self
            .inner
            .lock()
            .delete(ObjectKey::dynamic(kind, namespace, name))?;
        remaining.map(decode).transpose()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
