//! Static fixture data.
//!
//! A fixture is a JSON object with one array per collection:
//!
//! ```json
//! {
//!   "artists":   [{ "name": "Miles Davis" }],
//!   "albums":    [{ "title": "Kind of Blue", "releaseYear": 1959, "artist": "<uuid>" }],
//!   "songs":     [{ "title": "So What", "duration": 562, "album": "<uuid>" }],
//!   "playlists": [{ "name": "Modal", "songs": ["<uuid>"] }]
//! }
//! ```
//!
//! Records are kept as raw JSON until their batch decodes them, so a
//! malformed record only fails its own collection. Missing or `null` keys
//! are read as empty.
//!
//! `_id`s in a fixture are local keys: [`Fixture::assign_fresh_ids`] swaps
//! them for new UUIDs on every run and rewrites the references that point
//! at them, so seeding the same file twice yields two linked copies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use catalog::Collection;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

const ID_KEYS: [&str; 2] = ["_id", "id"];
const PLAYLIST_SONG_KEYS: [&str; 2] = ["songs", "song"];

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse fixture: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Fixture must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Raw records for each collection, in file order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artists: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub albums: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub songs: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub playlists: Vec<Value>,
}

impl Fixture {
    /// Reads and parses a fixture file.
    pub async fn load(path: &Path) -> Result<Self, FixtureError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FixtureError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(FixtureError::NotAnObject(json_kind(&value)));
        }

        Ok(Fixture::deserialize(value)?)
    }

    /// Replaces every fixture-local id with a fresh UUID.
    ///
    /// The same local id maps to the same fresh id across all four
    /// collections, and `artist`, `album` and playlist song references to a
    /// local id are rewritten to match. References to ids the fixture does
    /// not define are left alone. Returns the number of ids replaced.
    pub fn assign_fresh_ids(&mut self) -> usize {
        let mut fresh: HashMap<Uuid, Uuid> = HashMap::new();

        for record in self
            .artists
            .iter()
            .chain(&self.albums)
            .chain(&self.songs)
            .chain(&self.playlists)
        {
            for key in ID_KEYS {
                if let Some(id) = record.get(key).and_then(as_uuid) {
                    fresh.entry(id).or_insert_with(Uuid::new_v4);
                }
            }
        }

        if fresh.is_empty() {
            return 0;
        }

        for record in self
            .artists
            .iter_mut()
            .chain(&mut self.albums)
            .chain(&mut self.songs)
            .chain(&mut self.playlists)
        {
            for key in ID_KEYS {
                rewrite(record.get_mut(key), &fresh);
            }
        }
        for album in &mut self.albums {
            rewrite(album.get_mut("artist"), &fresh);
        }
        for song in &mut self.songs {
            rewrite(song.get_mut("album"), &fresh);
        }
        for playlist in &mut self.playlists {
            for key in PLAYLIST_SONG_KEYS {
                if let Some(Value::Array(songs)) = playlist.get_mut(key) {
                    for song in songs {
                        rewrite(Some(song), &fresh);
                    }
                }
            }
        }

        fresh.len()
    }

    /// Raw records for one collection.
    pub fn records(&self, collection: Collection) -> &[Value] {
        match collection {
            Collection::Artists => &self.artists,
            Collection::Albums => &self.albums,
            Collection::Songs => &self.songs,
            Collection::Playlists => &self.playlists,
        }
    }

    /// Number of records for one collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.records(collection).len()
    }

    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.len(*c) == 0)
    }
}

fn as_uuid(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|s| Uuid::parse_str(s).ok())
}

fn rewrite(value: Option<&mut Value>, fresh: &HashMap<Uuid, Uuid>) {
    if let Some(value) = value {
        if let Some(id) = as_uuid(value).and_then(|old| fresh.get(&old)) {
            *value = Value::String(id.to_string());
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}
