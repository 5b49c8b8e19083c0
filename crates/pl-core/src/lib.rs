//! pl-core - Core library for Playlog
//!
//! This crate provides the row types of the listening warehouse, project
//! configuration, data-file discovery, and the two extractors that turn
//! catalog files and event logs into rows.

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod events;
pub mod extract;
pub mod ids;
mod newtype_string;
pub mod records;
pub(crate) mod serde_helpers;

pub use catalog::{read_catalog_file, CatalogEntry, SongFileExtractor};
pub use config::{Config, DatabaseConfig, FailurePolicy, ResolutionConfig};
pub use discovery::{discover_files, DiscoveredFiles};
pub use error::{CoreError, CoreResult, LookupSource};
pub use events::{read_event_log, LogFileExtractor, PlayEvent};
pub use extract::{CatalogLookup, Extractor};
pub use ids::{ArtistId, SongId, UserId};
pub use records::{
    ArtistRow, Resolution, RowBatch, SongKey, SongRow, SongplayRow, TimeRow, UserRow,
};
