//! Configuration types and parsing for playlog.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["playlog.yml", "playlog.yaml"];

/// Main project configuration from playlog.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Root directory of the song/artist catalog files
    #[serde(default = "default_song_data")]
    pub song_data: String,

    /// Root directory of the listening event log files
    #[serde(default = "default_log_data")]
    pub log_data: String,

    /// Extension (without the dot) a data file must carry to be discovered
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// What to do when a single file fails to extract or load
    #[serde(default)]
    pub on_error: FailurePolicy,

    /// Warehouse connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Catalog resolution settings
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

/// Per-file failure handling for the load driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failing file; earlier commits remain.
    #[default]
    Abort,
    /// Roll back the failing file, record it, and continue with the next one.
    Skip,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// Warehouse connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Returns `true` for the in-memory pseudo path.
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Catalog resolution settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Maximum absolute difference (seconds) between an event's `length` and
    /// a catalog song's `duration`. `0.0` means exact equality.
    #[serde(default)]
    pub duration_tolerance: f64,
}

fn default_song_data() -> String {
    "data/song_data".to_string()
}

fn default_log_data() -> String {
    "data/log_data".to_string()
}

fn default_file_extension() -> String {
    "json".to_string()
}

fn default_db_path() -> String {
    "target/playlog.duckdb".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for playlog.yml or playlog.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.file_extension.is_empty() || self.file_extension.starts_with('.') {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "file_extension must be a bare extension such as 'json', got '{}'",
                    self.file_extension
                ),
            });
        }

        let tolerance = self.resolution.duration_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "resolution.duration_tolerance must be a non-negative number, got {tolerance}"
                ),
            });
        }

        Ok(())
    }

    /// Get absolute song_data path relative to a project root
    pub fn song_data_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.song_data)
    }

    /// Get absolute log_data path relative to a project root
    pub fn log_data_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.log_data)
    }

    /// Resolve the database path against a project root.
    ///
    /// `:memory:` is returned unchanged.
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.is_memory() {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
