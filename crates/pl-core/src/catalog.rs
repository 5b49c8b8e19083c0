//! Song/artist extraction from catalog files.
//!
//! A catalog file holds a single JSON object describing one song and the
//! artist who recorded it.

use crate::error::{CoreError, CoreResult};
use crate::extract::{CatalogLookup, Extractor};
use crate::ids::{ArtistId, SongId};
use crate::records::{ArtistRow, RowBatch, SongRow};
use serde::Deserialize;
use std::path::Path;

/// Raw shape of a catalog record. Extra fields (e.g. `num_songs`) are ignored.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    song_id: Option<String>,
    title: Option<String>,
    artist_id: Option<String>,
    year: Option<i32>,
    duration: Option<f64>,
    artist_name: Option<String>,
    artist_location: Option<String>,
    artist_latitude: Option<f64>,
    artist_longitude: Option<f64>,
}

/// One catalog file projected into its two target rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub song: SongRow,
    pub artist: ArtistRow,
}

/// Read and project a single catalog file.
pub fn read_catalog_file(path: &Path) -> CoreResult<CatalogEntry> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_catalog_record(&content, &path.display().to_string())
}

/// Parse catalog JSON text. `origin` names the source in error messages.
pub fn parse_catalog_record(content: &str, origin: &str) -> CoreResult<CatalogEntry> {
    if content.trim().is_empty() {
        return Err(CoreError::EmptyFile {
            path: origin.to_string(),
        });
    }

    let record: CatalogRecord =
        serde_json::from_str(content).map_err(|e| CoreError::MalformedRecord {
            path: origin.to_string(),
            line: e.line(),
            source: e,
        })?;

    let missing = |field: &'static str| CoreError::MissingField {
        path: origin.to_string(),
        line: 1,
        field,
    };

    let song_id = record
        .song_id
        .and_then(SongId::try_new)
        .ok_or_else(|| missing("song_id"))?;
    let artist_id = record
        .artist_id
        .and_then(ArtistId::try_new)
        .ok_or_else(|| missing("artist_id"))?;
    let title = record.title.ok_or_else(|| missing("title"))?;
    let year = record.year.ok_or_else(|| missing("year"))?;
    let duration = record.duration.ok_or_else(|| missing("duration"))?;
    let name = record.artist_name.ok_or_else(|| missing("artist_name"))?;

    Ok(CatalogEntry {
        song: SongRow {
            song_id,
            title,
            artist_id: artist_id.clone(),
            year,
            duration,
        },
        artist: ArtistRow {
            artist_id,
            name,
            location: record.artist_location.filter(|l| !l.trim().is_empty()),
            latitude: record.artist_latitude,
            longitude: record.artist_longitude,
        },
    })
}

/// Extractor for the `song_data` tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SongFileExtractor;

impl Extractor for SongFileExtractor {
    fn name(&self) -> &'static str {
        "songs"
    }

    fn extract(&self, path: &Path, _catalog: &dyn CatalogLookup) -> CoreResult<RowBatch> {
        let entry = read_catalog_file(path)?;
        log::debug!("Extracted song {} by {}", entry.song.song_id, entry.artist.artist_id);
        Ok(RowBatch {
            songs: vec![entry.song],
            artists: vec![entry.artist],
            ..Default::default()
        })
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
