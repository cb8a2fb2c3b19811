// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requeue directive returned by every reconciliation pass

use std::fmt;
use std::time::Duration;

/// Whether and when a workspace should be reconciled again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requeue {
    /// Nothing left to converge; wait for the next change notification
    Done,
    /// Transitional state, poll again soon
    Short,
    /// Steady state or an error that should not be hot-looped
    Long,
}

impl fmt::Display for Requeue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requeue::Done => write!(f, "done"),
            Requeue::Short => write!(f, "short"),
            Requeue::Long => write!(f, "long"),
        }
    }
}

/// Fixed delays backing [`Requeue::Short`] and [`Requeue::Long`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequeueIntervals {
    pub short: Duration,
    pub long: Duration,
}

impl Default for RequeueIntervals {
    fn default() -> Self {
        Self {
            short: Duration::from_millis(200),
            long: Duration::from_secs(60),
        }
    }
}

impl RequeueIntervals {
    /// Delay before the next pass, or `None` when no requeue is wanted.
    pub fn delay(&self, requeue: Requeue) -> Option<Duration> {
        match requeue {
            Requeue::Done => None,
            Requeue::Short => Some(self.short),
            Requeue::Long => Some(self.long),
        }
    }
}

#[cfg(test)]
#[path = "requeue_tests.rs"]
mod tests;
