//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use pl_core::Config;
use pl_db::DuckDbWarehouse;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and the warehouse connection closes cleanly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main maps it to the process status.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its directory and parsed configuration.
#[derive(Debug)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

/// Load the project config from `--config` or the project directory.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project")?;

    if global.verbose {
        eprintln!(
            "[verbose] Project '{}' at {}",
            config.name,
            root.display()
        );
    }

    Ok(Project { root, config })
}

/// Warehouse location: `--database` if given, else the config's path
/// resolved against the project directory.
pub(crate) fn database_path(project: &Project, global: &GlobalArgs) -> String {
    global
        .database
        .clone()
        .unwrap_or_else(|| project.config.database_path(&project.root))
}

/// Open the project's warehouse with the configured resolution tolerance.
pub(crate) fn open_warehouse(project: &Project, global: &GlobalArgs) -> Result<DuckDbWarehouse> {
    let path = database_path(project, global);
    let warehouse = DuckDbWarehouse::new(&path)
        .with_context(|| format!("Failed to open warehouse at {path}"))?
        .with_duration_tolerance(project.config.resolution.duration_tolerance);
    Ok(warehouse)
}
