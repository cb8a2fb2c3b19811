// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const CONFIG_PATH: &str = "WS_CONFIG";
pub const POLL_REQUEUE_MS: &str = "WS_POLL_REQUEUE_MS";
pub const LONG_REQUEUE_MS: &str = "WS_LONG_REQUEUE_MS";
pub const RECONCILE_TIMEOUT_MS: &str = "WS_RECONCILE_TIMEOUT_MS";
pub const WATCH_NAMESPACE: &str = "WS_WATCH_NAMESPACE";
pub const LOG_DIR: &str = "WS_LOG_DIR";

/// Optional TOML config file
pub fn config_path() -> Option<PathBuf> {
    non_empty(CONFIG_PATH).map(PathBuf::from)
}

/// Short requeue interval override
pub fn poll_requeue() -> Result<Option<Duration>, ConfigError> {
    millis(POLL_REQUEUE_MS)
}

/// Long requeue interval override
pub fn long_requeue() -> Result<Option<Duration>, ConfigError> {
    millis(LONG_REQUEUE_MS)
}

/// Per-pass deadline override
pub fn reconcile_timeout() -> Result<Option<Duration>, ConfigError> {
    millis(RECONCILE_TIMEOUT_MS)
}

pub fn watch_namespace() -> Option<String> {
    non_empty(WATCH_NAMESPACE)
}

pub fn log_dir() -> Option<PathBuf> {
    non_empty(LOG_DIR).map(PathBuf::from)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn millis(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = non_empty(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|_| ConfigError::InvalidEnv { name, value })
}
