// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace controller daemon library
//!
//! Configuration and controller wiring shared by the `workspace-controller`
//! binary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod controller;
pub mod env;
mod error;

pub use config::{Config, DEFAULT_RECONCILE_TIMEOUT};
pub use controller::{action_for, error_policy, reconcile, run, Context, CONTROLLER_NAME};
pub use error::{ConfigError, DaemonError};
