//! pl-db - Warehouse layer for Playlog
//!
//! This crate provides the `Warehouse` persistence trait, its DuckDB
//! implementation, the SQL statement set it executes, and the embedded
//! schema migrations for the five star-schema tables.

pub mod ddl;
pub mod duckdb;
pub mod error;
pub mod migration;
pub mod statements;
pub mod traits;

pub use crate::duckdb::{DuckDbWarehouse, TableCounts};
pub use error::{DbError, DbResult};
pub use statements::{SqlStatements, DEFAULT_STATEMENTS, TABLES};
pub use traits::Warehouse;
