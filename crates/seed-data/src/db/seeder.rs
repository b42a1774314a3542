//! Database seeding utilities.

use catalog::{
    CatalogError, Collection, Database, NewAlbum, NewArtist, NewPlaylist, NewSong,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, info};

use super::report::{BatchOutcome, SeedReport};
use crate::config::{ConfigError, DEFAULT_BATCH_SIZE};
use crate::fixture::{Fixture, FixtureError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Fixture error: {0}")]
    Fixture(#[from] FixtureError),
    #[error("Could not connect to the database: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Invalid {collection} record at index {index}: {source}")]
    InvalidRecord {
        collection: Collection,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Inserting {collection} failed: {source}")]
    Insert {
        collection: Collection,
        #[source]
        source: CatalogError,
    },
    #[error("Seeding task for {collection} did not finish: {source}")]
    Task {
        collection: Collection,
        #[source]
        source: JoinError,
    },
}

/// Database seeder for inserting fixture records.
pub struct Seeder {
    db: Database,
    batch_size: usize,
}

impl Seeder {
    /// Creates a new seeder on top of the given catalog database.
    pub fn new(db: Database) -> Self {
        Self {
            db,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the batch size for bulk operations.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Seeds all four collections concurrently and waits for every batch.
    ///
    /// Each collection runs as its own task inside its own transaction, so a
    /// failing batch inserts nothing and leaves the other three untouched.
    /// The report carries one outcome per collection.
    ///
    /// Fixture `_id`s are swapped for fresh ids before any batch starts, so
    /// the same fixture can be seeded again without key collisions.
    pub async fn seed(&self, mut fixture: Fixture) -> SeedReport {
        let remapped = fixture.assign_fresh_ids();
        debug!("Assigned fresh ids to {} fixture records", remapped);

        info!(
            "Seeding {} artists, {} albums, {} songs, {} playlists...",
            fixture.artists.len(),
            fixture.albums.len(),
            fixture.songs.len(),
            fixture.playlists.len()
        );

        let Fixture {
            artists,
            albums,
            songs,
            playlists,
        } = fixture;

        let artists = tokio::spawn(seed_artists(self.db.clone(), artists, self.batch_size));
        let albums = tokio::spawn(seed_albums(self.db.clone(), albums, self.batch_size));
        let songs = tokio::spawn(seed_songs(self.db.clone(), songs, self.batch_size));
        let playlists =
            tokio::spawn(seed_playlists(self.db.clone(), playlists, self.batch_size));

        let (artists, albums, songs, playlists) = tokio::join!(artists, albums, songs, playlists);

        SeedReport::new(vec![
            BatchOutcome::joined(Collection::Artists, artists),
            BatchOutcome::joined(Collection::Albums, albums),
            BatchOutcome::joined(Collection::Songs, songs),
            BatchOutcome::joined(Collection::Playlists, playlists),
        ])
    }

    /// Clears all catalog collections.
    ///
    /// **WARNING**: This deletes every artist, album, song and playlist, not
    /// only the ones a previous run inserted.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        info!("Clearing all catalog data...");

        let removed = self.db.clear(&Collection::ALL).await?;

        info!("Removed {} records", removed);
        Ok(())
    }

    /// Returns the underlying catalog database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

async fn seed_artists(
    db: Database,
    raw: Vec<Value>,
    batch_size: usize,
) -> Result<usize, SeedError> {
    let artists: Vec<NewArtist> = decode_records(Collection::Artists, raw)?;
    info!("Seeding {} artists...", artists.len());

    let created = db
        .insert_artists(&artists, batch_size)
        .await
        .map_err(|source| SeedError::Insert {
            collection: Collection::Artists,
            source,
        })?;

    info!("Seeded {} artists", created.len());
    Ok(created.len())
}

async fn seed_albums(db: Database, raw: Vec<Value>, batch_size: usize) -> Result<usize, SeedError> {
    let albums: Vec<NewAlbum> = decode_records(Collection::Albums, raw)?;
    info!("Seeding {} albums...", albums.len());

    let created = db
        .insert_albums(&albums, batch_size)
        .await
        .map_err(|source| SeedError::Insert {
            collection: Collection::Albums,
            source,
        })?;

    info!("Seeded {} albums", created.len());
    Ok(created.len())
}

async fn seed_songs(db: Database, raw: Vec<Value>, batch_size: usize) -> Result<usize, SeedError> {
    let songs: Vec<NewSong> = decode_records(Collection::Songs, raw)?;
    info!("Seeding {} songs...", songs.len());

    let created = db
        .insert_songs(&songs, batch_size)
        .await
        .map_err(|source| SeedError::Insert {
            collection: Collection::Songs,
            source,
        })?;

    info!("Seeded {} songs", created.len());
    Ok(created.len())
}

async fn seed_playlists(
    db: Database,
    raw: Vec<Value>,
    batch_size: usize,
) -> Result<usize, SeedError> {
    let playlists: Vec<NewPlaylist> = decode_records(Collection::Playlists, raw)?;
    info!("Seeding {} playlists...", playlists.len());

    let created = db
        .insert_playlists(&playlists, batch_size)
        .await
        .map_err(|source| SeedError::Insert {
            collection: Collection::Playlists,
            source,
        })?;

    info!("Seeded {} playlists", created.len());
    Ok(created.len())
}

/// Decodes raw fixture records into insert shapes, failing on the first bad one.
fn decode_records<T: DeserializeOwned>(
    collection: Collection,
    raw: Vec<Value>,
) -> Result<Vec<T>, SeedError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|source| SeedError::InvalidRecord {
                collection,
                index,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_records_keeps_order() {
        let raw = vec![
            json!({ "title": "So What", "duration": 562 }),
            json!({ "title": "Freddie Freeloader", "duration": 589.5 }),
        ];
        let songs: Vec<NewSong> = decode_records(Collection::Songs, raw).unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].title.as_deref(), Some("So What"));
        assert_eq!(songs[0].duration, Some(562.0));
        assert_eq!(songs[1].title.as_deref(), Some("Freddie Freeloader"));
    }

    #[test]
    fn test_decode_records_reports_bad_index() {
        let raw = vec![
            json!({ "title": "Kind of Blue", "releaseYear": 1959 }),
            json!({ "title": "Sketches of Spain", "releaseYear": "1960" }),
        ];
        let err = decode_records::<NewAlbum>(Collection::Albums, raw).unwrap_err();

        match err {
            SeedError::InvalidRecord {
                collection, index, ..
            } => {
                assert_eq!(collection, Collection::Albums);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_records_rejects_non_object() {
        let err = decode_records::<NewArtist>(Collection::Artists, vec![json!(42)]).unwrap_err();
        assert!(matches!(err, SeedError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn test_decode_empty() {
        let playlists: Vec<NewPlaylist> = decode_records(Collection::Playlists, vec![]).unwrap();
        assert!(playlists.is_empty());
    }
}
