//! Listening-event extraction from newline-delimited event logs.
//!
//! Only `NextSong` events describe a song being played; every other page
//! action (Home, Login, Logout, ...) is dropped before any row is derived.
//! Each retained event contributes one time row, one user row and one
//! songplay row, the latter resolved against the catalog.

use crate::error::{CoreError, CoreResult};
use crate::extract::{CatalogLookup, Extractor};
use crate::ids::UserId;
use crate::records::{RowBatch, SongKey, SongplayRow, TimeRow, UserRow};
use crate::serde_helpers::{opt_int_or_string, opt_string_or_number};
use serde::Deserialize;
use std::path::Path;

/// Page action that marks a playback event.
pub const NEXT_SONG: &str = "NextSong";

/// Raw shape of one event-log line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    page: String,
    ts: Option<i64>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<f64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    user_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    session_id: Option<i64>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// A validated `NextSong` event.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayEvent {
    /// 1-based line number in the source file
    pub line: usize,
    pub ts: i64,
    pub song: String,
    pub artist: String,
    pub length: f64,
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl PlayEvent {
    pub fn song_key(&self) -> SongKey<'_> {
        SongKey {
            title: &self.song,
            artist_name: &self.artist,
            duration: self.length,
        }
    }

    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }
}

impl RawEvent {
    fn into_play_event(self, origin: &str, line: usize) -> CoreResult<PlayEvent> {
        let missing = |field: &'static str| CoreError::MissingField {
            path: origin.to_string(),
            line,
            field,
        };

        Ok(PlayEvent {
            line,
            ts: self.ts.ok_or_else(|| missing("ts"))?,
            song: self.song.ok_or_else(|| missing("song"))?,
            artist: self.artist.ok_or_else(|| missing("artist"))?,
            length: self.length.ok_or_else(|| missing("length"))?,
            user_id: self
                .user_id
                .and_then(UserId::try_new)
                .ok_or_else(|| missing("userId"))?,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender,
            level: self.level.ok_or_else(|| missing("level"))?,
            session_id: self.session_id.ok_or_else(|| missing("sessionId"))?,
            location: self.location,
            user_agent: self.user_agent,
        })
    }
}

/// Read an event log and return its `NextSong` events in file order.
pub fn read_event_log(path: &Path) -> CoreResult<Vec<PlayEvent>> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_event_log(&content, &path.display().to_string())
}

/// Parse newline-delimited event JSON. `origin` names the source in errors.
///
/// Any malformed line fails the whole log.
pub fn parse_event_log(content: &str, origin: &str) -> CoreResult<Vec<PlayEvent>> {
    let mut events = Vec::new();
    let mut dropped = 0usize;

    for (idx, text) in content.lines().enumerate() {
        let line = idx + 1;
        if text.trim().is_empty() {
            continue;
        }

        let raw: RawEvent =
            serde_json::from_str(text).map_err(|e| CoreError::MalformedRecord {
                path: origin.to_string(),
                line,
                source: e,
            })?;

        if raw.page != NEXT_SONG {
            dropped += 1;
            continue;
        }
        events.push(raw.into_play_event(origin, line)?);
    }

    log::debug!(
        "{origin}: {} NextSong events, {dropped} other actions dropped",
        events.len()
    );
    Ok(events)
}

/// Derive the time, user and songplay rows for a list of events.
///
/// Rows keep event order. Duplicate timestamps and repeated users are not
/// collapsed here; the warehouse's key constraints take care of that.
pub fn derive_rows(
    events: &[PlayEvent],
    catalog: &dyn CatalogLookup,
    origin: &str,
) -> CoreResult<RowBatch> {
    let mut batch = RowBatch::default();
    let mut resolved = 0usize;

    for event in events {
        let time = TimeRow::from_epoch_millis(event.ts).ok_or_else(|| {
            CoreError::InvalidTimestamp {
                path: origin.to_string(),
                line: event.line,
                ts: event.ts,
            }
        })?;

        let resolution =
            catalog
                .resolve(&event.song_key())
                .map_err(|source| CoreError::Lookup {
                    path: origin.to_string(),
                    line: event.line,
                    source,
                })?;
        if resolution.is_found() {
            resolved += 1;
        }
        let (song_id, artist_id) = resolution.into_columns();

        batch.songplays.push(SongplayRow {
            epoch_millis: time.epoch_millis,
            start_time: time.start_time,
            user_id: event.user_id.clone(),
            level: event.level.clone(),
            song_id,
            artist_id,
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
        });
        batch.users.push(event.user_row());
        batch.times.push(time);
    }

    log::debug!(
        "{origin}: resolved {resolved} of {} events against the catalog",
        events.len()
    );
    Ok(batch)
}

/// Extractor for the `log_data` tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFileExtractor;

impl Extractor for LogFileExtractor {
    fn name(&self) -> &'static str {
        "logs"
    }

    fn extract(&self, path: &Path, catalog: &dyn CatalogLookup) -> CoreResult<RowBatch> {
        let events = read_event_log(path)?;
        derive_rows(&events, catalog, &path.display().to_string())
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
