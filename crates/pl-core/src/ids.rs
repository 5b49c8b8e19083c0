//! Strongly-typed catalog and listener identifiers.

use crate::newtype_string::define_id;

define_id! {
    /// Catalog song identifier (e.g. `SOZCTXZ12AB0182364`).
    pub struct SongId;
}

define_id! {
    /// Catalog artist identifier (e.g. `AR5KOSW1187FB35FF4`).
    pub struct ArtistId;
}

define_id! {
    /// Listener identifier from the event log.
    pub struct UserId;
}
