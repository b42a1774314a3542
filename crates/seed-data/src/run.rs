//! End-to-end seeding run: fixture, connection, migrations, batches.

use catalog::{Collection, Database};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::{MIN_CONNECTIONS, SeedConfig};
use crate::db::{SeedError, SeedReport, Seeder};
use crate::fixture::Fixture;

/// Reads the configuration from the environment, then seeds.
pub async fn run_from_env() -> Result<SeedReport, SeedError> {
    let config = SeedConfig::from_env()?;
    run(&config).await
}

/// Seeds the configured database from the configured fixture.
///
/// Fixture, connection and migration failures abort the run before anything
/// is inserted. Once the batches start, the run always completes and each
/// collection's outcome is in the returned report.
pub async fn run(config: &SeedConfig) -> Result<SeedReport, SeedError> {
    let fixture = Fixture::load(&config.fixture_path).await?;
    info!(
        "Loaded fixture {} ({} artists, {} albums, {} songs, {} playlists)",
        config.fixture_path.display(),
        fixture.len(Collection::Artists),
        fixture.len(Collection::Albums),
        fixture.len(Collection::Songs),
        fixture.len(Collection::Playlists)
    );

    // Fewer connections than batches would leave a batch waiting on the
    // acquire timeout while the others hold theirs.
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.max(MIN_CONNECTIONS))
        .acquire_timeout(config.connect_timeout)
        .connect_with(config.connect_options.clone())
        .await
        .map_err(SeedError::Connection)?;

    let db = Database::new(pool);
    let name = db.database_name().await?;
    info!("Connected to the database: {}", name);

    db.migrate().await?;
    info!("Catalog schema is up to date");

    let seeder = Seeder::new(db).with_batch_size(config.batch_size);

    if config.reset {
        seeder.clear_all().await?;
    }

    let report = seeder.seed(fixture).await;
    seeder.database().pool().close().await;

    Ok(report)
}
