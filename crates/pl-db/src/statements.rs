//! SQL statement text used by the DuckDB warehouse.
//!
//! The warehouse holds a reference to a [`SqlStatements`] value instead of
//! reaching for module-level strings, so callers can substitute their own.

/// Parameterized statements for the five star-schema tables.
#[derive(Debug, Clone, Copy)]
pub struct SqlStatements {
    /// `(song_id, title, artist_id, year, duration)`; duplicate keys ignored
    pub song_insert: &'static str,
    /// `(artist_id, name, location, latitude, longitude)`; duplicate keys ignored
    pub artist_insert: &'static str,
    /// `(epoch_ms, hour, day, week, month, year, weekday)`; duplicate keys ignored
    pub time_insert: &'static str,
    /// `(user_id, first_name, last_name, gender, level)`; existing users get the new level
    pub user_upsert: &'static str,
    /// `(epoch_ms, user_id, level, song_id, artist_id, session_id, location, user_agent)`
    pub songplay_insert: &'static str,
    /// `(title, artist_name, duration, tolerance)` -> `(song_id, artist_id)`
    pub song_select: &'static str,
}

pub const DEFAULT_STATEMENTS: SqlStatements = SqlStatements {
    song_insert: "INSERT INTO songs (song_id, title, artist_id, year, duration)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (song_id) DO NOTHING",
    artist_insert: "INSERT INTO artists (artist_id, name, location, latitude, longitude)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (artist_id) DO NOTHING",
    time_insert: "INSERT INTO \"time\" (start_time, hour, day, week, month, year, weekday)
         VALUES (epoch_ms(CAST(? AS BIGINT)), ?, ?, ?, ?, ?, ?)
         ON CONFLICT (start_time) DO NOTHING",
    user_upsert: "INSERT INTO users (user_id, first_name, last_name, gender, level)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT (user_id) DO UPDATE SET level = excluded.level",
    songplay_insert: "INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
         VALUES (epoch_ms(CAST(? AS BIGINT)), ?, ?, ?, ?, ?, ?, ?)",
    song_select: "SELECT s.song_id, a.artist_id
         FROM songs s
         JOIN artists a ON s.artist_id = a.artist_id
         WHERE s.title = ? AND a.name = ? AND abs(s.duration - ?) <= ?
         ORDER BY s.song_id, a.artist_id
         LIMIT 1",
};

/// Warehouse tables, fact table first so drops respect references.
pub const TABLES: &[&str] = &["songplays", "users", "songs", "artists", "time"];

/// Statements that remove every warehouse object, including migration history.
pub(crate) const DROP_STMTS: &[&str] = &[
    "DROP TABLE IF EXISTS songplays",
    "DROP SEQUENCE IF EXISTS songplay_id_seq",
    "DROP TABLE IF EXISTS users",
    "DROP TABLE IF EXISTS songs",
    "DROP TABLE IF EXISTS artists",
    "DROP TABLE IF EXISTS \"time\"",
    "DROP TABLE IF EXISTS schema_version",
];
