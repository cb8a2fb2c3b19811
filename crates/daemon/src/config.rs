// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller configuration.
//!
//! Built-in defaults, then the optional TOML file named by `WS_CONFIG`,
//! then `WS_*` environment overrides. Later layers win.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use ws_core::RequeueIntervals;

use crate::env;
use crate::error::ConfigError;

pub const DEFAULT_RECONCILE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub requeue: RequeueIntervals,
    /// Upper bound on one reconciliation pass
    pub reconcile_timeout: Duration,
    /// Watch a single namespace; all namespaces when `None`
    pub watch_namespace: Option<String>,
    /// Write logs here instead of stdout
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requeue: RequeueIntervals::default(),
            reconcile_timeout: DEFAULT_RECONCILE_TIMEOUT,
            watch_namespace: None,
            log_dir: None,
        }
    }
}

/// On-disk shape; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    short_requeue_ms: Option<u64>,
    long_requeue_ms: Option<u64>,
    reconcile_timeout_ms: Option<u64>,
    watch_namespace: Option<String>,
    log_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = env::config_path() {
            config.apply_file(&ConfigFile::read(&path)?);
        }
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(ms) = file.short_requeue_ms {
            self.requeue.short = Duration::from_millis(ms);
        }
        if let Some(ms) = file.long_requeue_ms {
            self.requeue.long = Duration::from_millis(ms);
        }
        if let Some(ms) = file.reconcile_timeout_ms {
            self.reconcile_timeout = Duration::from_millis(ms);
        }
        if file.watch_namespace.is_some() {
            self.watch_namespace = file.watch_namespace.clone();
        }
        if file.log_dir.is_some() {
            self.log_dir = file.log_dir.clone();
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(short) = env::poll_requeue()? {
            self.requeue.short = short;
        }
        if let Some(long) = env::long_requeue()? {
            self.requeue.long = long;
        }
        if let Some(timeout) = env::reconcile_timeout()? {
            self.reconcile_timeout = timeout;
        }
        if let Some(namespace) = env::watch_namespace() {
            self.watch_namespace = Some(namespace);
        }
        if let Some(dir) = env::log_dir() {
            self.log_dir = Some(dir);
        }
        Ok(())
    }

    // A zero short interval hot-loops transitional workspaces
    fn validate(&self) -> Result<(), ConfigError> {
        if self.requeue.short.is_zero() {
            return Err(ConfigError::ZeroDuration("short requeue interval"));
        }
        if self.requeue.long.is_zero() {
            return Err(ConfigError::ZeroDuration("long requeue interval"));
        }
        if self.reconcile_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("reconcile timeout"));
        }
        Ok(())
    }
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
