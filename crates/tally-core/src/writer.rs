use std::sync::Arc;

use crate::models::Transaction;
use crate::store::TransactionStore;

/// Outcome of persisting one batch of generated occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<uuid::Uuid>,
    /// Already stored under the same id; not an error.
    pub skipped_existing: usize,
    pub failed: usize,
}

impl WriteSummary {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }
}

/// Persists generated occurrences one by one without propagating errors.
///
/// A failed write is logged and counted; the rest of the batch is still
/// attempted. Background generation uses it so one bad record never stops
/// a run.
#[derive(Debug)]
pub struct SilentWriter<S> {
    store: Arc<S>,
}

impl<S> Clone for SilentWriter<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: TransactionStore> SilentWriter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn persist(&self, occurrences: &[Transaction]) -> WriteSummary {
        let mut summary = WriteSummary::default();
        for occurrence in occurrences {
            match self.store.append_if_absent(occurrence).await {
                Ok(true) => summary.written.push(occurrence.id),
                Ok(false) => summary.skipped_existing += 1,
                Err(e) => {
                    tracing::warn!(
                        occurrence_id = %occurrence.id,
                        parent_id = ?occurrence.parent_transaction_id,
                        date = %occurrence.date,
                        error = %e,
                        "failed to persist generated occurrence"
                    );
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
