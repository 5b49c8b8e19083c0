//! Per-file load driver.
//!
//! Discovers the data files under a root, then for each file in discovery
//! order: extract rows, insert them, commit. One file is fully committed
//! before the next one is read.

use crate::error::{LoadError, LoadResult};
use pl_core::{discover_files, Extractor, FailurePolicy, RowBatch};
use pl_db::Warehouse;
use std::path::{Path, PathBuf};

/// Options controlling a single [`process_data`] run.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Extension (without the dot) of the files to load
    pub extension: String,
    pub on_error: FailurePolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            on_error: FailurePolicy::default(),
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Rows were inserted and committed
    Loaded { rows: usize },
    /// The file failed and was rolled back (skip policy only)
    Skipped,
}

/// Progress notifications emitted while a root is being loaded.
#[derive(Debug)]
pub enum LoadEvent<'a> {
    /// Discovery finished; `total` files will be processed.
    Discovered {
        dataset: &'static str,
        root: &'a Path,
        total: usize,
    },
    /// The `processed`-th of `total` files is done.
    FileDone {
        dataset: &'static str,
        path: &'a Path,
        processed: usize,
        total: usize,
        outcome: FileOutcome,
    },
}

/// Rows handed to the warehouse, per table.
///
/// These are insert attempts; duplicate-key inserts that the warehouse
/// ignores are still counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    pub songs: usize,
    pub artists: usize,
    pub times: usize,
    pub users: usize,
    pub songplays: usize,
    /// Songplays whose song and artist were found in the catalog
    pub resolved_songplays: usize,
}

impl RowCounts {
    pub fn add_batch(&mut self, batch: &RowBatch) {
        self.songs += batch.songs.len();
        self.artists += batch.artists.len();
        self.times += batch.times.len();
        self.users += batch.users.len();
        self.songplays += batch.songplays.len();
        self.resolved_songplays += batch.songplays.iter().filter(|p| p.is_resolved()).count();
    }

    pub fn total(&self) -> usize {
        self.songs + self.artists + self.times + self.users + self.songplays
    }
}

/// A file that failed under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: LoadError,
}

/// Outcome of loading one data root.
#[derive(Debug)]
pub struct LoadSummary {
    pub dataset: &'static str,
    /// Canonical root that was walked
    pub root: PathBuf,
    /// Number of files discovered
    pub found: usize,
    /// Number of files committed
    pub loaded: usize,
    pub skipped: Vec<SkippedFile>,
    pub rows: RowCounts,
}

impl LoadSummary {
    pub fn has_failures(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Load every data file under `root` through `extractor` into `warehouse`.
///
/// Each file gets its own transaction. Under [`FailurePolicy::Abort`] the
/// first failing file ends the run with its error; files committed before
/// it stay loaded. Under [`FailurePolicy::Skip`] the failing file is rolled
/// back, recorded in the summary, and the run continues.
pub fn process_data<W: Warehouse>(
    warehouse: &W,
    root: &Path,
    extractor: &dyn Extractor,
    options: &LoadOptions,
    on_event: &mut dyn FnMut(&LoadEvent<'_>),
) -> LoadResult<LoadSummary> {
    let dataset = extractor.name();
    let discovered =
        discover_files(root, &options.extension).map_err(|source| LoadError::Discovery {
            dataset,
            source,
        })?;

    let total = discovered.len();
    log::info!("{} {dataset} files found in {}", total, discovered.root.display());
    on_event(&LoadEvent::Discovered {
        dataset,
        root: &discovered.root,
        total,
    });

    let mut summary = LoadSummary {
        dataset,
        root: discovered.root.clone(),
        found: total,
        loaded: 0,
        skipped: Vec::new(),
        rows: RowCounts::default(),
    };

    for (idx, path) in discovered.iter().enumerate() {
        let processed = idx + 1;

        let outcome = match load_file(warehouse, path, extractor) {
            Ok(batch) => {
                summary.loaded += 1;
                summary.rows.add_batch(&batch);
                log::debug!("{}: committed {} rows", path.display(), batch.len());
                FileOutcome::Loaded { rows: batch.len() }
            }
            Err(error) => match options.on_error {
                FailurePolicy::Abort => {
                    log::error!("Aborting {dataset} load at file {processed}/{total}: {error}");
                    return Err(error);
                }
                FailurePolicy::Skip => {
                    log::warn!("Skipping {}: {error}", path.display());
                    summary.skipped.push(SkippedFile {
                        path: path.clone(),
                        error,
                    });
                    FileOutcome::Skipped
                }
            },
        };

        on_event(&LoadEvent::FileDone {
            dataset,
            path,
            processed,
            total,
            outcome,
        });
    }

    Ok(summary)
}

/// Extract one file and load it in a single transaction.
fn load_file<W: Warehouse>(
    warehouse: &W,
    path: &Path,
    extractor: &dyn Extractor,
) -> LoadResult<RowBatch> {
    let batch = extractor
        .extract(path, warehouse)
        .map_err(|source| LoadError::Extract {
            path: path.display().to_string(),
            source,
        })?;

    warehouse
        .load_batch(&batch)
        .map_err(|source| LoadError::Persist {
            path: path.display().to_string(),
            source,
        })?;

    Ok(batch)
}

#[cfg(test)]
#[path = "driver_test.rs"]
mod tests;
