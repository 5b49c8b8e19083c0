//! Error types for pl-load

use pl_core::CoreError;
use pl_db::DbError;
use thiserror::Error;

/// Load driver errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// L101: The data root could not be walked
    #[error("[L101] Failed to discover {dataset} files: {source}")]
    Discovery {
        dataset: &'static str,
        source: CoreError,
    },

    /// L102: A file could not be read, parsed or resolved
    #[error("[L102] Failed to extract {path}: {source}")]
    Extract { path: String, source: CoreError },

    /// L103: The warehouse rejected a file's rows or its commit
    #[error("[L103] Failed to load {path}: {source}")]
    Persist { path: String, source: DbError },
}

impl LoadError {
    /// The file the error is attached to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            LoadError::Discovery { .. } => None,
            LoadError::Extract { path, .. } | LoadError::Persist { path, .. } => Some(path),
        }
    }
}

/// Result type alias for LoadError
pub type LoadResult<T> = Result<T, LoadError>;
