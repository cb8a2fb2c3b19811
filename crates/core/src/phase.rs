// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired and observed lifecycle states of a workspace.
//!
//! `DesiredStatus` is the only state a user sets. `Phase` is derived by the
//! controller on every pass and is never written by users.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state the user asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DesiredStatus {
    #[default]
    Running,
    Stopped,
}

impl fmt::Display for DesiredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesiredStatus::Running => write!(f, "Running"),
            DesiredStatus::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Observed lifecycle phase reported in status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Phase {
    /// Dependents exist but are not all available yet
    Creating,
    Running,
    /// Deletion of compute or network is still draining
    Stopping,
    Stopped,
}

impl Phase {
    /// Transitional phases are polled on the short interval.
    pub fn is_transitional(&self) -> bool {
        matches!(self, Phase::Creating | Phase::Stopping)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Creating => write!(f, "Creating"),
            Phase::Running => write!(f, "Running"),
            Phase::Stopping => write!(f, "Stopping"),
            Phase::Stopped => write!(f, "Stopped"),
        }
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
