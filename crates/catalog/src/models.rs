use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// The four catalog collections, one table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Artists,
    Albums,
    Songs,
    Playlists,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Artists,
        Collection::Albums,
        Collection::Songs,
        Collection::Playlists,
    ];

    /// Table backing this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Artists => "artists",
            Collection::Albums => "albums",
            Collection::Songs => "songs",
            Collection::Playlists => "playlists",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Artist {
    pub id: Uuid,
    pub name: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Album {
    pub id: Uuid,
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub artist_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Song {
    pub id: Uuid,
    pub title: Option<String>,
    /// Length in seconds.
    pub duration: Option<f64>,
    pub album_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Playlist {
    pub id: Uuid,
    pub name: Option<String>,
    /// Song references in playlist order.
    pub song_ids: Vec<Uuid>,
    pub created_at: OffsetDateTime,
}

// Insert shapes. These deserialize straight from fixture records, so they
// follow the fixture's camelCase keys and accept a caller-chosen `_id`.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewArtist {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default, rename = "artist")]
    pub artist_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSong {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default, rename = "album")]
    pub album_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPlaylist {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "songs", alias = "song")]
    pub song_ids: Vec<Uuid>,
}
