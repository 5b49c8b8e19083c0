//! Two-phase pipeline: catalog files first, then event logs.
//!
//! Events are resolved against the catalog already in the warehouse, so the
//! song phase always runs before the log phase.

use crate::driver::{process_data, LoadEvent, LoadOptions, LoadSummary};
use crate::error::LoadResult;
use pl_core::{Config, Extractor, LogFileExtractor, SongFileExtractor};
use pl_db::Warehouse;
use std::path::{Path, PathBuf};

/// One of the two data trees a project loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Song/artist catalog (`song_data`)
    Songs,
    /// Listening event logs (`log_data`)
    Logs,
}

impl Dataset {
    /// Both datasets in load order.
    pub const ALL: [Dataset; 2] = [Dataset::Songs, Dataset::Logs];

    pub fn root(&self, config: &Config, project_root: &Path) -> PathBuf {
        match self {
            Dataset::Songs => config.song_data_absolute(project_root),
            Dataset::Logs => config.log_data_absolute(project_root),
        }
    }

    pub fn extractor(&self) -> &'static dyn Extractor {
        match self {
            Dataset::Songs => &SongFileExtractor,
            Dataset::Logs => &LogFileExtractor,
        }
    }
}

/// Per-dataset summaries of a pipeline run. `None` means the phase was not requested.
#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub songs: Option<LoadSummary>,
    pub logs: Option<LoadSummary>,
}

impl PipelineSummary {
    pub fn phases(&self) -> impl Iterator<Item = &LoadSummary> {
        self.songs.iter().chain(self.logs.iter())
    }

    pub fn files_loaded(&self) -> usize {
        self.phases().map(|s| s.loaded).sum()
    }

    pub fn files_skipped(&self) -> usize {
        self.phases().map(|s| s.skipped.len()).sum()
    }
}

/// Load the requested datasets of a project, catalog first.
///
/// `datasets` selects the phases; they always run in [`Dataset::ALL`] order
/// regardless of the order given.
pub fn run_pipeline<W: Warehouse>(
    warehouse: &W,
    config: &Config,
    project_root: &Path,
    datasets: &[Dataset],
    on_event: &mut dyn FnMut(&LoadEvent<'_>),
) -> LoadResult<PipelineSummary> {
    let options = LoadOptions {
        extension: config.file_extension.clone(),
        on_error: config.on_error,
    };
    log::info!(
        "Loading project '{}' into {} (on_error: {})",
        config.name,
        warehouse.db_type(),
        options.on_error
    );

    let mut summary = PipelineSummary::default();
    for dataset in Dataset::ALL {
        if !datasets.contains(&dataset) {
            continue;
        }
        let root = dataset.root(config, project_root);
        let phase = process_data(warehouse, &root, dataset.extractor(), &options, on_event)?;
        match dataset {
            Dataset::Songs => summary.songs = Some(phase),
            Dataset::Logs => summary.logs = Some(phase),
        }
    }
    Ok(summary)
}
