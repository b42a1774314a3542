//! Database integration for seeding the catalog.
//!
//! The [`Seeder`] inserts fixture records into the four catalog collections
//! as concurrent bulk operations and collects one [`BatchOutcome`] per
//! collection into a [`SeedReport`].

mod report;
mod seeder;

pub use report::{BatchOutcome, SeedReport};
pub use seeder::{SeedError, Seeder};
