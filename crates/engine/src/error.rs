// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use std::fmt;
use std::time::Duration;
use thiserror::Error;
use ws_adapters::StoreError;
use ws_core::{ConditionReason, Requeue};

/// Dependent object categories owned by a workspace
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DependentKind {
    Compute,
    Network,
    Storage,
    Access,
}

impl DependentKind {
    /// Degraded reason reported when an operation on this category fails.
    pub fn error_reason(&self) -> ConditionReason {
        match self {
            DependentKind::Compute => ConditionReason::ComputeError,
            DependentKind::Network => ConditionReason::ServiceError,
            DependentKind::Storage => ConditionReason::StorageError,
            DependentKind::Access => ConditionReason::AccessError,
        }
    }
}

impl fmt::Display for DependentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependentKind::Compute => write!(f, "compute"),
            DependentKind::Network => write!(f, "network"),
            DependentKind::Storage => write!(f, "storage"),
            DependentKind::Access => write!(f, "access"),
        }
    }
}

/// Errors producing a desired object
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("workspace {0} has no uid yet")]
    MissingUid(String),
    #[error("workspace {0} has no image and its template defines no default image")]
    MissingImage(String),
    #[error("template {name} failed to render: {message}")]
    Render { name: String, message: String },
    #[error("rendered {kind} is not a valid object: {message}")]
    InvalidObject { kind: String, message: String },
}

/// Errors that abort a reconciliation pass
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build {kind}: {source}")]
    Build {
        kind: DependentKind,
        #[source]
        source: BuildError,
    },
    #[error("{kind} store call failed: {source}")]
    Store {
        kind: DependentKind,
        #[source]
        source: StoreError,
    },
    #[error("workspace store call failed: {0}")]
    Workspace(#[from] StoreError),
    #[error("failed to resolve workspace inputs: {0}")]
    Resolve(#[source] BuildError),
    #[error("workspace template {0} not found")]
    TemplateNotFound(String),
    #[error("access strategy {0} not found")]
    AccessStrategyNotFound(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("reconcile exceeded deadline of {0:?}")]
    Deadline(Duration),
}

impl EngineError {
    pub fn build(kind: DependentKind) -> impl Fn(BuildError) -> Self + Copy {
        move |source| EngineError::Build { kind, source }
    }

    pub fn store(kind: DependentKind) -> impl Fn(StoreError) -> Self + Copy {
        move |source| EngineError::Store { kind, source }
    }

    /// Invariant violations back off to the long interval; everything else
    /// may be corrected externally and is retried soon.
    pub fn requeue(&self) -> Requeue {
        match self {
            EngineError::Invariant(_) => Requeue::Long,
            _ => Requeue::Short,
        }
    }

    /// Reason for the Degraded condition, or `None` when the failure cannot
    /// be reported on the workspace itself.
    pub fn degraded_reason(&self) -> Option<ConditionReason> {
        match self {
            EngineError::Build { kind, .. } | EngineError::Store { kind, .. } => {
                Some(kind.error_reason())
            }
            EngineError::Resolve(_)
            | EngineError::TemplateNotFound(_)
            | EngineError::Invariant(_) => Some(ConditionReason::ComputeError),
            EngineError::AccessStrategyNotFound(_) => Some(ConditionReason::AccessError),
            EngineError::Workspace(_) | EngineError::Deadline(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
