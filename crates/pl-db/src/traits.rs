//! Warehouse trait definition

use crate::error::DbResult;
use pl_core::{ArtistRow, CatalogLookup, RowBatch, SongRow, SongplayRow, TimeRow, UserRow};

/// Persistence capability for the listening warehouse.
///
/// Inserts into `songs`, `artists` and `time` must tolerate duplicate keys;
/// `upsert_user` must overwrite the stored level of an existing user.
/// Implementations also answer catalog lookups for event resolution.
pub trait Warehouse: CatalogLookup {
    fn insert_song(&self, row: &SongRow) -> DbResult<()>;

    fn insert_artist(&self, row: &ArtistRow) -> DbResult<()>;

    fn insert_time(&self, row: &TimeRow) -> DbResult<()>;

    fn upsert_user(&self, row: &UserRow) -> DbResult<()>;

    fn insert_songplay(&self, row: &SongplayRow) -> DbResult<()>;

    fn begin(&self) -> DbResult<()>;

    fn commit(&self) -> DbResult<()>;

    fn rollback(&self) -> DbResult<()>;

    /// Backend identifier for logging
    fn db_type(&self) -> &'static str;

    /// Insert every row of `batch` within the current transaction.
    ///
    /// Catalog rows go first, then dimensions, then facts.
    fn insert_batch(&self, batch: &RowBatch) -> DbResult<()> {
        for row in &batch.songs {
            self.insert_song(row)?;
        }
        for row in &batch.artists {
            self.insert_artist(row)?;
        }
        for row in &batch.times {
            self.insert_time(row)?;
        }
        for row in &batch.users {
            self.upsert_user(row)?;
        }
        for row in &batch.songplays {
            self.insert_songplay(row)?;
        }
        Ok(())
    }

    /// Insert `batch` in its own `BEGIN` / `COMMIT` transaction, rolling back
    /// on error.
    fn load_batch(&self, batch: &RowBatch) -> DbResult<()> {
        self.begin()?;

        if let Err(e) = self.insert_batch(batch) {
            let _ = self.rollback();
            return Err(e);
        }
        if let Err(e) = self.commit() {
            let _ = self.rollback();
            return Err(e);
        }
        Ok(())
    }
}
