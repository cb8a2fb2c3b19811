// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Workspace convergence engine and desired-state state machine

pub mod builder;
mod error;
pub mod reconciler;
pub mod resolver;
pub mod resources;
pub mod state_machine;
pub mod status;

#[cfg(test)]
mod test_helpers;

pub use builder::{BuildContext, TemplateRenderer};
pub use error::{BuildError, DependentKind, EngineError};
pub use reconciler::Reconciler;
pub use resolver::{ResolvedInputs, ResolvedStorage};
pub use resources::{Compute, Dependent, Network, ResourceManager, Storage};
pub use state_machine::{StateMachine, StateMachineDeps, EVENT_RUNNING, EVENT_STOPPED};
pub use status::StatusManager;
