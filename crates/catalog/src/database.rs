use crate::errors::CatalogError;
use crate::models::{
    Album, Artist, Collection, NewAlbum, NewArtist, NewPlaylist, NewSong, Playlist, Song,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

/// Postgres caps bind parameters per statement at `u16::MAX`.
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

const ARTIST_COLUMNS: usize = 2;
const ALBUM_COLUMNS: usize = 4;
const SONG_COLUMNS: usize = 4;
const PLAYLIST_COLUMNS: usize = 3;

/// Rows per `INSERT`, clamped so a statement never exceeds the bind limit.
fn rows_per_statement(batch_size: usize, columns: usize) -> usize {
    batch_size.clamp(1, MAX_BIND_PARAMS / columns)
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded catalog migrations.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Name of the database the pool is connected to.
    pub async fn database_name(&self) -> Result<String, CatalogError> {
        let name = sqlx::query_scalar("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await?;

        Ok(name)
    }

    /// Bulk inserts artists, `batch_size` rows per statement, in one transaction.
    ///
    /// Batch sizes too large for the bind parameter limit are clamped.
    ///
    /// Records are returned in input order with their identifiers; rows without
    /// an explicit id get a fresh v4 UUID.
    pub async fn insert_artists(
        &self,
        artists: &[NewArtist],
        batch_size: usize,
    ) -> Result<Vec<Artist>, CatalogError> {
        if artists.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(artists.len());

        for chunk in artists.chunks(rows_per_statement(batch_size, ARTIST_COLUMNS)) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO artists (id, name) ");
            builder.push_values(chunk, |mut row, artist| {
                row.push_bind(artist.id.unwrap_or_else(Uuid::new_v4))
                    .push_bind(artist.name.as_deref());
            });
            builder.push(" RETURNING id, name, created_at");

            let rows: Vec<Artist> = builder.build_query_as().fetch_all(&mut *tx).await?;
            debug!("Inserted chunk of {} artists", rows.len());
            created.extend(rows);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Bulk inserts albums. Artist references are stored as given.
    pub async fn insert_albums(
        &self,
        albums: &[NewAlbum],
        batch_size: usize,
    ) -> Result<Vec<Album>, CatalogError> {
        if albums.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(albums.len());

        for chunk in albums.chunks(rows_per_statement(batch_size, ALBUM_COLUMNS)) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO albums (id, title, release_year, artist_id) ");
            builder.push_values(chunk, |mut row, album| {
                row.push_bind(album.id.unwrap_or_else(Uuid::new_v4))
                    .push_bind(album.title.as_deref())
                    .push_bind(album.release_year)
                    .push_bind(album.artist_id);
            });
            builder.push(" RETURNING id, title, release_year, artist_id, created_at");

            let rows: Vec<Album> = builder.build_query_as().fetch_all(&mut *tx).await?;
            debug!("Inserted chunk of {} albums", rows.len());
            created.extend(rows);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Bulk inserts songs. Album references are stored as given.
    pub async fn insert_songs(
        &self,
        songs: &[NewSong],
        batch_size: usize,
    ) -> Result<Vec<Song>, CatalogError> {
        if songs.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(songs.len());

        for chunk in songs.chunks(rows_per_statement(batch_size, SONG_COLUMNS)) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO songs (id, title, duration, album_id) ");
            builder.push_values(chunk, |mut row, song| {
                row.push_bind(song.id.unwrap_or_else(Uuid::new_v4))
                    .push_bind(song.title.as_deref())
                    .push_bind(song.duration)
                    .push_bind(song.album_id);
            });
            builder.push(" RETURNING id, title, duration, album_id, created_at");

            let rows: Vec<Song> = builder.build_query_as().fetch_all(&mut *tx).await?;
            debug!("Inserted chunk of {} songs", rows.len());
            created.extend(rows);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Bulk inserts playlists, keeping each playlist's song order.
    pub async fn insert_playlists(
        &self,
        playlists: &[NewPlaylist],
        batch_size: usize,
    ) -> Result<Vec<Playlist>, CatalogError> {
        if playlists.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(playlists.len());

        for chunk in playlists.chunks(rows_per_statement(batch_size, PLAYLIST_COLUMNS)) {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO playlists (id, name, song_ids) ");
            builder.push_values(chunk, |mut row, playlist| {
                row.push_bind(playlist.id.unwrap_or_else(Uuid::new_v4))
                    .push_bind(playlist.name.as_deref())
                    .push_bind(playlist.song_ids.as_slice());
            });
            builder.push(" RETURNING id, name, song_ids, created_at");

            let rows: Vec<Playlist> = builder.build_query_as().fetch_all(&mut *tx).await?;
            debug!("Inserted chunk of {} playlists", rows.len());
            created.extend(rows);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>, CatalogError> {
        let artist = sqlx::query_as(
            r#"
            SELECT id, name, created_at
            FROM artists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(artist)
    }

    pub async fn get_album(&self, id: Uuid) -> Result<Option<Album>, CatalogError> {
        let album = sqlx::query_as(
            r#"
            SELECT id, title, release_year, artist_id, created_at
            FROM albums
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }

    pub async fn get_song(&self, id: Uuid) -> Result<Option<Song>, CatalogError> {
        let song = sqlx::query_as(
            r#"
            SELECT id, title, duration, album_id, created_at
            FROM songs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(song)
    }

    pub async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>, CatalogError> {
        let playlist = sqlx::query_as(
            r#"
            SELECT id, name, song_ids, created_at
            FROM playlists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(playlist)
    }

    /// Number of records stored in a collection.
    pub async fn count(&self, collection: Collection) -> Result<i64, CatalogError> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.as_str());
        let count = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;

        Ok(count)
    }

    /// Deletes every record of the given collections in one transaction.
    ///
    /// Returns the number of rows removed.
    pub async fn clear(&self, collections: &[Collection]) -> Result<u64, CatalogError> {
        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for collection in collections {
            let sql = format!("DELETE FROM {}", collection.as_str());
            removed += sqlx::query(&sql).execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(removed)
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_per_statement_respects_bind_limit() {
        assert_eq!(rows_per_statement(500, ALBUM_COLUMNS), 500);
        assert_eq!(rows_per_statement(0, SONG_COLUMNS), 1);
        assert_eq!(rows_per_statement(20_000, ALBUM_COLUMNS), 16_383);
        assert_eq!(rows_per_statement(usize::MAX, ARTIST_COLUMNS), 32_767);

        for columns in [ARTIST_COLUMNS, ALBUM_COLUMNS, SONG_COLUMNS, PLAYLIST_COLUMNS] {
            assert!(rows_per_statement(100_000, columns) * columns <= MAX_BIND_PARAMS);
        }
    }
}
