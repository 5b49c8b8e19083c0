//! DuckDB warehouse implementation

use crate::error::{DbError, DbResult};
use crate::migration::run_migrations;
use crate::statements::{SqlStatements, DEFAULT_STATEMENTS, DROP_STMTS, TABLES};
use crate::traits::Warehouse;
use duckdb::Connection;
use pl_core::{
    ArtistId, ArtistRow, CatalogLookup, LookupSource, Resolution, SongId, SongKey, SongRow,
    SongplayRow, TimeRow, UserRow,
};
use std::path::Path;

/// Row counts of the five warehouse tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub songplays: i64,
    pub users: i64,
    pub songs: i64,
    pub artists: i64,
    pub time: i64,
}

impl TableCounts {
    /// `(table, count)` pairs in [`TABLES`] order.
    pub fn entries(&self) -> [(&'static str, i64); 5] {
        [
            ("songplays", self.songplays),
            ("users", self.users),
            ("songs", self.songs),
            ("artists", self.artists),
            ("time", self.time),
        ]
    }
}

/// DuckDB-backed warehouse.
///
/// Owns a single connection; loads are sequential so no `Mutex` is needed.
pub struct DuckDbWarehouse {
    conn: Connection,
    statements: &'static SqlStatements,
    duration_tolerance: f64,
}

impl DuckDbWarehouse {
    /// Open (or create) a warehouse file and apply pending migrations.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::ConnectionError(format!("{e}: {}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory warehouse with all migrations applied.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open from a path string (handles the `:memory:` special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn,
            statements: &DEFAULT_STATEMENTS,
            duration_tolerance: 0.0,
        })
    }

    /// Replace the statement set used for inserts and lookups.
    pub fn with_statements(mut self, statements: &'static SqlStatements) -> Self {
        self.statements = statements;
        self
    }

    /// Allow catalog durations to differ from event lengths by up to `tolerance` seconds.
    pub fn with_duration_tolerance(mut self, tolerance: f64) -> Self {
        self.duration_tolerance = tolerance;
        self
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Drop every warehouse table and recreate the schema from scratch.
    pub fn reset(&self) -> DbResult<()> {
        for stmt in DROP_STMTS {
            self.conn
                .execute_batch(stmt)
                .map_err(|e| DbError::MigrationError(format!("reset failed ({stmt}): {e}")))?;
        }
        log::info!("Dropped warehouse tables, recreating schema");
        run_migrations(&self.conn)
    }

    /// Row count of one warehouse table.
    pub fn table_row_count(&self, table: &str) -> DbResult<i64> {
        if !TABLES.contains(&table) {
            return Err(DbError::QueryError(format!(
                "unknown table '{table}'; expected one of {}",
                TABLES.join(", ")
            )));
        }
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM \"{table}\""), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::QueryError(format!("count failed for {table}: {e}")))
    }

    /// Row counts of all warehouse tables.
    pub fn table_counts(&self) -> DbResult<TableCounts> {
        Ok(TableCounts {
            songplays: self.table_row_count("songplays")?,
            users: self.table_row_count("users")?,
            songs: self.table_row_count("songs")?,
            artists: self.table_row_count("artists")?,
            time: self.table_row_count("time")?,
        })
    }

    fn lookup(&self, key: &SongKey<'_>) -> DbResult<Resolution> {
        let lookup_err = |e: duckdb::Error| DbError::LookupFailed(e.to_string());

        let mut stmt = self
            .conn
            .prepare(self.statements.song_select)
            .map_err(lookup_err)?;
        let mut rows = stmt
            .query(duckdb::params![
                key.title,
                key.artist_name,
                key.duration,
                self.duration_tolerance
            ])
            .map_err(lookup_err)?;

        let Some(row) = rows.next().map_err(lookup_err)? else {
            return Ok(Resolution::NotFound);
        };
        let song_id: String = row.get(0).map_err(lookup_err)?;
        let artist_id: String = row.get(1).map_err(lookup_err)?;

        match (SongId::try_new(song_id), ArtistId::try_new(artist_id)) {
            (Some(song_id), Some(artist_id)) => Ok(Resolution::Found { song_id, artist_id }),
            _ => Err(DbError::LookupFailed(format!(
                "catalog row for '{}' has an empty id",
                key.title
            ))),
        }
    }

    fn transaction_stmt(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::TransactionError(format!("{sql} failed: {e}")))
    }
}

impl CatalogLookup for DuckDbWarehouse {
    fn resolve(&self, key: &SongKey<'_>) -> Result<Resolution, LookupSource> {
        self.lookup(key).map_err(|e| e.to_string().into())
    }
}

impl Warehouse for DuckDbWarehouse {
    fn insert_song(&self, row: &SongRow) -> DbResult<()> {
        self.conn
            .execute(
                self.statements.song_insert,
                duckdb::params![
                    row.song_id.as_str(),
                    row.title,
                    row.artist_id.as_str(),
                    row.year,
                    row.duration,
                ],
            )
            .map_err(|e| DbError::InsertFailed {
                table: "songs",
                message: format!("{e} (song_id {})", row.song_id),
            })?;
        Ok(())
    }

    fn insert_artist(&self, row: &ArtistRow) -> DbResult<()> {
        self.conn
            .execute(
                self.statements.artist_insert,
                duckdb::params![
                    row.artist_id.as_str(),
                    row.name,
                    row.location,
                    row.latitude,
                    row.longitude,
                ],
            )
            .map_err(|e| DbError::InsertFailed {
                table: "artists",
                message: format!("{e} (artist_id {})", row.artist_id),
            })?;
        Ok(())
    }

    fn insert_time(&self, row: &TimeRow) -> DbResult<()> {
        self.conn
            .execute(
                self.statements.time_insert,
                duckdb::params![
                    row.epoch_millis,
                    row.hour as i32,
                    row.day as i32,
                    row.week as i32,
                    row.month as i32,
                    row.year,
                    row.weekday as i32,
                ],
            )
            .map_err(|e| DbError::InsertFailed {
                table: "time",
                message: format!("{e} (ts {})", row.epoch_millis),
            })?;
        Ok(())
    }

    fn upsert_user(&self, row: &UserRow) -> DbResult<()> {
        self.conn
            .execute(
                self.statements.user_upsert,
                duckdb::params![
                    row.user_id.as_str(),
                    row.first_name,
                    row.last_name,
                    row.gender,
                    row.level,
                ],
            )
            .map_err(|e| DbError::InsertFailed {
                table: "users",
                message: format!("{e} (user_id {})", row.user_id),
            })?;
        Ok(())
    }

    fn insert_songplay(&self, row: &SongplayRow) -> DbResult<()> {
        self.conn
            .execute(
                self.statements.songplay_insert,
                duckdb::params![
                    row.epoch_millis,
                    row.user_id.as_str(),
                    row.level,
                    row.song_id.as_ref().map(|id| id.as_str()),
                    row.artist_id.as_ref().map(|id| id.as_str()),
                    row.session_id,
                    row.location,
                    row.user_agent,
                ],
            )
            .map_err(|e| DbError::InsertFailed {
                table: "songplays",
                message: format!("{e} (session {}, ts {})", row.session_id, row.epoch_millis),
            })?;
        Ok(())
    }

    fn begin(&self) -> DbResult<()> {
        self.transaction_stmt("BEGIN TRANSACTION")
    }

    fn commit(&self) -> DbResult<()> {
        self.transaction_stmt("COMMIT")
    }

    fn rollback(&self) -> DbResult<()> {
        self.transaction_stmt("ROLLBACK")
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
