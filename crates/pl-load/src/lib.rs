//! pl-load - Load driver for Playlog
//!
//! Walks the catalog and event-log trees, runs the matching extractor on
//! each file, and loads the resulting rows into a [`pl_db::Warehouse`] with
//! one transaction per file.

pub mod driver;
pub mod error;
pub mod pipeline;

pub use driver::{
    process_data, FileOutcome, LoadEvent, LoadOptions, LoadSummary, RowCounts, SkippedFile,
};
pub use error::{LoadError, LoadResult};
pub use pipeline::{run_pipeline, Dataset, PipelineSummary};
