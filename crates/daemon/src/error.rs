// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading controller configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Errors that stop the controller process
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to the cluster: {0}")]
    Client(#[from] kube::Error),

    #[error("log directory {0} is unusable: {1}")]
    LogDir(PathBuf, #[source] std::io::Error),
}
