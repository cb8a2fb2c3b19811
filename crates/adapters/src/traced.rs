// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::store::{DynamicKind, ObjectStore, StoreError, StoreObject};
use async_trait::async_trait;
use kube::api::DynamicObject;
use kube::Resource;
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any ObjectStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// Run one store call inside `span`, logging the outcome and elapsed time.
///
/// Not-found and already-exists are expected outcomes and logged at debug.
async fn traced<T, F>(span: tracing::Span, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    async {
        let start = Instant::now();
        let result = call.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::debug!(elapsed_ms, "ok"),
            Err(e) if e.is_not_found() || e.is_already_exists() => {
                tracing::debug!(elapsed_ms, error = %e, "expected miss")
            }
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "failed"),
        }
        result
    }
    .instrument(span)
    .await
}

fn object_name<K: Resource>(object: &K) -> &str {
    object.meta().name.as_deref().unwrap_or_default()
}

#[async_trait]
impl<S: ObjectStore> ObjectStore for TracedStore<S> {
    async fn get<K: StoreObject>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<K>, StoreError> {
        let span = tracing::debug_span!("store.get", kind = %K::kind(&()), namespace, name);
        traced(span, self.inner.get::<K>(namespace, name)).await
    }

    async fn create<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let span =
            tracing::info_span!("store.create", kind = %K::kind(&()), name = object_name(object));
        traced(span, self.inner.create(object)).await
    }

    async fn update<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let span =
            tracing::info_span!("store.update", kind = %K::kind(&()), name = object_name(object));
        traced(span, self.inner.update(object)).await
    }

    async fn update_status<K: StoreObject>(&self, object: &K) -> Result<K, StoreError> {
        let span = tracing::info_span!(
            "store.update_status",
            kind = %K::kind(&()),
            name = object_name(object)
        );
        traced(span, self.inner.update_status(object)).await
    }

    async fn delete<K: StoreObject>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<K>, StoreError> {
        let span = tracing::info_span!("store.delete", kind = %K::kind(&()), namespace, name);
        traced(span, self.inner.delete::<K>(namespace, name)).await
    }

    async fn get_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError> {
        let span = tracing::debug_span!("store.get", kind = %kind, namespace, name);
        traced(span, self.inner.get_dynamic(kind, namespace, name)).await
    }

    async fn create_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError> {
        let span = tracing::info_span!("store.create", kind = %kind, name = object_name(object));
        traced(span, self.inner.create_dynamic(kind, object)).await
    }

    async fn update_dynamic(
        &self,
        kind: &DynamicKind,
        object: &DynamicObject,
    ) -> Result<DynamicObject, StoreError> {
        let span = tracing::info_span!("store.update", kind = %kind, name = object_name(object));
        traced(span, self.inner.update_dynamic(kind, object)).await
    }

    async fn delete_dynamic(
        &self,
        kind: &DynamicKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<DynamicObject>, StoreError> {
        let span = tracing::info_span!("store.delete", kind = %kind, namespace, name);
        traced(span, self.inner.delete_dynamic(kind, namespace, name)).await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
