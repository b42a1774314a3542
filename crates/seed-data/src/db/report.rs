//! Per-collection outcome of a seeding run.

use catalog::Collection;
use tokio::task::JoinError;
use tracing::{error, info};

use super::seeder::SeedError;

/// Result of one collection's bulk insert.
#[derive(Debug)]
pub struct BatchOutcome {
    pub collection: Collection,
    /// Number of records created, or why the batch failed.
    pub result: Result<usize, SeedError>,
}

impl BatchOutcome {
    pub fn new(collection: Collection, result: Result<usize, SeedError>) -> Self {
        Self { collection, result }
    }

    /// Builds an outcome from a joined task, folding a panic or cancellation
    /// into [`SeedError::Task`].
    pub(crate) fn joined(
        collection: Collection,
        joined: Result<Result<usize, SeedError>, JoinError>,
    ) -> Self {
        let result = joined.unwrap_or_else(|source| Err(SeedError::Task { collection, source }));
        Self::new(collection, result)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Aggregated outcome of the four collection batches.
#[derive(Debug, Default)]
pub struct SeedReport {
    outcomes: Vec<BatchOutcome>,
}

impl SeedReport {
    pub fn new(outcomes: Vec<BatchOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[BatchOutcome] {
        &self.outcomes
    }

    /// True when every batch succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(BatchOutcome::is_success)
    }

    /// Records created for a collection, if its batch succeeded.
    pub fn inserted(&self, collection: Collection) -> Option<usize> {
        self.outcome(collection)
            .and_then(|o| o.result.as_ref().ok().copied())
    }

    /// Failure of a collection's batch, if any.
    pub fn error(&self, collection: Collection) -> Option<&SeedError> {
        self.outcome(collection)
            .and_then(|o| o.result.as_ref().err())
    }

    pub fn total_inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }

    pub fn failed_collections(&self) -> Vec<Collection> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.collection)
            .collect()
    }

    /// Logs one line per collection, then a summary.
    pub fn log_summary(&self) {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(count) => info!("  {}: {}", outcome.collection, count),
                Err(e) => error!("  {}: failed: {}", outcome.collection, e),
            }
        }

        let failed = self.failed_collections();
        if failed.is_empty() {
            info!("Inserted {} records", self.total_inserted());
        } else {
            error!(
                "Inserted {} records; {} of {} collections failed",
                self.total_inserted(),
                failed.len(),
                self.outcomes.len()
            );
        }
    }

    fn outcome(&self, collection: Collection) -> Option<&BatchOutcome> {
        self.outcomes.iter().find(|o| o.collection == collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_record(collection: Collection) -> SeedError {
        SeedError::InvalidRecord {
            collection,
            index: 0,
            source: serde_json::from_str::<i32>("x").unwrap_err(),
        }
    }

    #[test]
    fn test_all_batches_succeed() {
        let report = SeedReport::new(vec![
            BatchOutcome::new(Collection::Artists, Ok(3)),
            BatchOutcome::new(Collection::Albums, Ok(2)),
            BatchOutcome::new(Collection::Songs, Ok(10)),
            BatchOutcome::new(Collection::Playlists, Ok(0)),
        ]);

        assert!(report.is_success());
        assert_eq!(report.total_inserted(), 15);
        assert_eq!(report.inserted(Collection::Songs), Some(10));
        assert!(report.failed_collections().is_empty());
    }

    #[test]
    fn test_partial_success_is_visible() {
        let report = SeedReport::new(vec![
            BatchOutcome::new(Collection::Artists, Ok(3)),
            BatchOutcome::new(Collection::Albums, Err(invalid_record(Collection::Albums))),
            BatchOutcome::new(Collection::Songs, Ok(10)),
            BatchOutcome::new(Collection::Playlists, Ok(1)),
        ]);

        assert!(!report.is_success());
        assert_eq!(report.total_inserted(), 14);
        assert_eq!(report.inserted(Collection::Albums), None);
        assert!(matches!(
            report.error(Collection::Albums),
            Some(SeedError::InvalidRecord { .. })
        ));
        assert_eq!(report.failed_collections(), vec![Collection::Albums]);
    }

    #[tokio::test]
    async fn test_cancelled_task_becomes_task_error() {
        let handle =
            tokio::spawn(async { std::future::pending::<Result<usize, SeedError>>().await });
        handle.abort();
        let joined = handle.await;

        let outcome = BatchOutcome::joined(Collection::Playlists, joined);

        assert!(matches!(
            outcome.result,
            Err(SeedError::Task {
                collection: Collection::Playlists,
                ..
            })
        ));
    }
}
