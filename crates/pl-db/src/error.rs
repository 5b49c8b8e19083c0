//! Error types for pl-db

use thiserror::Error;

/// Warehouse operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Warehouse connection failed: {0}")]
    ConnectionError(String),

    /// Schema migration failed (D002)
    #[error("[D002] Warehouse migration failed: {0}")]
    MigrationError(String),

    /// Row insert rejected by the store (D003)
    #[error("[D003] Insert into {table} failed: {message}")]
    InsertFailed {
        table: &'static str,
        message: String,
    },

    /// Catalog resolution query failed (D004)
    #[error("[D004] Song lookup failed: {0}")]
    LookupFailed(String),

    /// Transaction management error (D005)
    #[error("[D005] Warehouse transaction failed: {0}")]
    TransactionError(String),

    /// Read query failed (D006)
    #[error("[D006] Warehouse query failed: {0}")]
    QueryError(String),

    /// DuckDB driver error with preserved source chain (D007)
    #[error("[D007] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::DuckDb(err)
    }
}
