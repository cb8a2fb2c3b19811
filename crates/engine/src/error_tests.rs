// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    compute = { DependentKind::Compute, ConditionReason::ComputeError },
    network = { DependentKind::Network, ConditionReason::ServiceError },
    storage = { DependentKind::Storage, ConditionReason::StorageError },
    access = { DependentKind::Access, ConditionReason::AccessError },
)]
fn store_failures_degrade_with_kind_reason(kind: DependentKind, reason: ConditionReason) {
    let err = EngineError::store(kind)(StoreError::Api("boom".to_string()));
    assert_eq!(err.degraded_reason(), Some(reason));
    assert_eq!(err.requeue(), Requeue::Short);
}

#[test]
fn invariant_violation_backs_off() {
    let err = EngineError::Invariant("delete ignored".to_string());
    assert_eq!(err.requeue(), Requeue::Long);
    assert_eq!(err.degraded_reason(), Some(ConditionReason::ComputeError));
}

#[test]
fn workspace_write_failures_are_not_reported_on_the_workspace() {
    let err = EngineError::from(StoreError::Conflict("stale".to_string()));
    assert!(err.degraded_reason().is_none());
    assert_eq!(err.requeue(), Requeue::Short);
}

#[test]
fn build_error_message_names_the_dependent() {
    let err = EngineError::build(DependentKind::Access)(BuildError::Render {
        name: "route".to_string(),
        message: "undefined value".to_string(),
    });
    assert_eq!(
        err.to_string(),
        "failed to build access: template route failed to render: undefined value"
    );
}
