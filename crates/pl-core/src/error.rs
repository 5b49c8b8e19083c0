//! Error types for pl-core

use thiserror::Error;

/// Boxed error returned by a [`CatalogLookup`](crate::CatalogLookup) implementation.
pub type LookupSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for Playlog
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// F001: Data root does not exist
    #[error("[F001] Data directory not found: {path}")]
    RootNotFound { path: String },

    /// F002: Data root exists but is not a directory
    #[error("[F002] Data root is not a directory: {path}")]
    RootNotDirectory { path: String },

    /// F003: Filesystem read failed
    #[error("[F003] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// P001: A record is not valid JSON or has the wrong shape
    #[error("[P001] Malformed record in {path} (line {line}): {source}")]
    MalformedRecord {
        path: String,
        line: usize,
        source: serde_json::Error,
    },

    /// P002: A record lacks a field the target row requires
    #[error("[P002] Missing required field '{field}' in {path} (line {line})")]
    MissingField {
        path: String,
        line: usize,
        field: &'static str,
    },

    /// P003: Event timestamp cannot be represented as a calendar date
    #[error("[P003] Invalid timestamp {ts} in {path} (line {line})")]
    InvalidTimestamp { path: String, line: usize, ts: i64 },

    /// P004: Catalog file holds no record
    #[error("[P004] No record found in {path}")]
    EmptyFile { path: String },

    /// L001: Catalog lookup itself failed (distinct from "no match")
    #[error("[L001] Catalog lookup failed for {path} (line {line}): {source}")]
    Lookup {
        path: String,
        line: usize,
        source: LookupSource,
    },
}

impl CoreError {
    /// Returns `true` for malformed-input errors (P-codes).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedRecord { .. }
                | CoreError::MissingField { .. }
                | CoreError::InvalidTimestamp { .. }
                | CoreError::EmptyFile { .. }
        )
    }

    /// Returns `true` for errors raised while reading the data tree (F-codes).
    pub fn is_filesystem_error(&self) -> bool {
        matches!(
            self,
            CoreError::RootNotFound { .. }
                | CoreError::RootNotDirectory { .. }
                | CoreError::IoWithPath { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
