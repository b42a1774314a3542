//! Fixture seeding for the music catalog.
//!
//! Loads a static JSON fixture and inserts its artists, albums, songs and
//! playlists into the catalog database as four concurrent bulk inserts,
//! reporting the outcome of each one.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let config = SeedConfig::from_env()?;
//! let report = run(&config).await?;
//! report.log_summary();
//! ```

pub mod config;
pub mod db;
pub mod fixture;
pub mod run;

pub use catalog::Collection;
pub use run::{run, run_from_env};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{ConfigError, SeedConfig};
    pub use crate::db::{BatchOutcome, SeedError, SeedReport, Seeder};
    pub use crate::fixture::{Fixture, FixtureError};
    pub use crate::run::{run, run_from_env};
    pub use crate::Collection;
}
