//! Seeds the music catalog from the fixture file.
//!
//! Run with:
//! ```
//! DATABASE_URL=postgres://... cargo run -p seed-data --bin seed
//! ```

use anyhow::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine, the variables may already be exported.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let report = seed_data::run_from_env().await.context("Seeding aborted")?;

    report.log_summary();

    let failed = report.failed_collections();
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(|c| c.as_str()).collect();
        anyhow::bail!("Seeding failed for: {}", names.join(", "));
    }

    tracing::info!("Seed completed!");
    Ok(())
}
