//! Extractor and catalog-lookup seams shared by the load driver.

use crate::error::{CoreResult, LookupSource};
use crate::records::{Resolution, RowBatch, SongKey};
use std::path::Path;

/// Resolves an event's (title, artist name, duration) against the song catalog.
///
/// "No match" is [`Resolution::NotFound`], never an error. An `Err` means the
/// lookup itself could not be performed.
pub trait CatalogLookup {
    fn resolve(&self, key: &SongKey<'_>) -> Result<Resolution, LookupSource>;
}

/// Turns one data file into the rows it contributes to the warehouse.
pub trait Extractor {
    /// Short label used in progress and log output (e.g. `"songs"`).
    fn name(&self) -> &'static str;

    /// Extract every row from `path`, resolving against `catalog` where needed.
    fn extract(&self, path: &Path, catalog: &dyn CatalogLookup) -> CoreResult<RowBatch>;
}
