//! Row types for the five warehouse tables.
//!
//! Field order in each struct is the column order of the target table.

use crate::ids::{ArtistId, SongId, UserId};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

/// One row of the `songs` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRow {
    pub song_id: SongId,
    pub title: String,
    pub artist_id: ArtistId,
    pub year: i32,
    /// Track length in seconds
    pub duration: f64,
}

/// One row of the `artists` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRow {
    pub artist_id: ArtistId,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One row of the `time` dimension, derived from an event timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRow {
    /// Milliseconds since the Unix epoch (the event's `ts`)
    pub epoch_millis: i64,
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    /// ISO 8601 week number
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Day of week, Monday = 0 through Sunday = 6
    pub weekday: u32,
}

impl TimeRow {
    /// Derive the calendar fields for a UTC timestamp given in epoch milliseconds.
    ///
    /// Returns `None` when the value is outside chrono's representable range.
    pub fn from_epoch_millis(epoch_millis: i64) -> Option<Self> {
        let start_time = chrono::DateTime::from_timestamp_millis(epoch_millis)?.naive_utc();
        Some(Self {
            epoch_millis,
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        })
    }
}

/// One row of the `users` dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub user_id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Subscription tier (`free` / `paid`); mutable over time
    pub level: String,
}

/// Outcome of resolving an event against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { song_id: SongId, artist_id: ArtistId },
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    /// Split into the nullable `(song_id, artist_id)` column pair.
    pub fn into_columns(self) -> (Option<SongId>, Option<ArtistId>) {
        match self {
            Resolution::Found { song_id, artist_id } => (Some(song_id), Some(artist_id)),
            Resolution::NotFound => (None, None),
        }
    }
}

/// One row of the `songplays` fact table.
///
/// `songplay_id` is assigned by the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongplayRow {
    pub epoch_millis: i64,
    pub start_time: NaiveDateTime,
    pub user_id: UserId,
    pub level: String,
    pub song_id: Option<SongId>,
    pub artist_id: Option<ArtistId>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl SongplayRow {
    pub fn is_resolved(&self) -> bool {
        self.song_id.is_some() && self.artist_id.is_some()
    }
}

/// The fields an event is resolved by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SongKey<'a> {
    pub title: &'a str,
    pub artist_name: &'a str,
    pub duration: f64,
}

/// Every row extracted from a single data file.
///
/// Each vector keeps the order in which records appeared in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBatch {
    pub songs: Vec<SongRow>,
    pub artists: Vec<ArtistRow>,
    pub times: Vec<TimeRow>,
    pub users: Vec<UserRow>,
    pub songplays: Vec<SongplayRow>,
}

impl RowBatch {
    /// Total number of rows across all tables.
    pub fn len(&self) -> usize {
        self.songs.len()
            + self.artists.len()
            + self.times.len()
            + self.users.len()
            + self.songplays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
