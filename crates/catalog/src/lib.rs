//! Music catalog schemas and storage.
//!
//! Four record types live in four Postgres tables: [`Artist`], [`Album`],
//! [`Song`] and [`Playlist`]. Cross-references (album → artist, song → album,
//! playlist → songs) are optional identifiers with no integrity enforcement;
//! they are resolved only through the explicit `get_*` lookups on
//! [`Database`].

pub mod database;
pub mod errors;
pub mod models;

pub use database::Database;
pub use errors::CatalogError;
pub use models::{
    Album, Artist, Collection, NewAlbum, NewArtist, NewPlaylist, NewSong, Playlist, Song,
};
