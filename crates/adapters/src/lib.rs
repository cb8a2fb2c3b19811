// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the cluster: object store client and event recording

pub mod events;
pub mod store;
pub mod traced;

pub use events::{EventAdapter, EventError, EventKind, KubeEventAdapter, WorkspaceEvent};
pub use store::{DynamicKind, KubeStore, ObjectStore, StoreError, StoreObject};
pub use traced::TracedStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use events::{EventCall, FakeEventAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use store::{DeletionMode, FakeObjectStore, StoreCall, StoreOp};
