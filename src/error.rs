// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact form guard.
//!
//! Rejected submissions are not errors; see [`crate::pipeline::Rejection`].
//! Only storage access and configuration can fail, and storage failures
//! never reach the user.

use thiserror::Error;

/// Failure of the backing key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded for key {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while building configuration or compiling classifier rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;
