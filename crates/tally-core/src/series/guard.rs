//! Idempotency check for generated occurrences.
//!
//! One predicate serves every generation path: a candidate exists iff a
//! stored transaction has the same parent and either the same calendar date
//! (fixed series) or the same installment index (installment series).

use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{RecurringType, Transaction};

/// Identity of one occurrence within a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccurrenceKey {
    Fixed { parent: Uuid, date: NaiveDate },
    Installment { parent: Uuid, index: u32 },
}

impl OccurrenceKey {
    /// The key a stored occurrence occupies, or `None` for records that are
    /// not generated occurrences (no parent).
    pub fn of(transaction: &Transaction) -> Option<Self> {
        let parent = transaction.parent_transaction_id?;
        match (transaction.recurring_type, transaction.current_installment) {
            (Some(RecurringType::Installment), Some(index)) => {
                Some(OccurrenceKey::Installment { parent, index })
            }
            _ => Some(OccurrenceKey::Fixed {
                parent,
                date: transaction.date.date_naive(),
            }),
        }
    }

    pub fn parent(&self) -> Uuid {
        match self {
            OccurrenceKey::Fixed { parent, .. } | OccurrenceKey::Installment { parent, .. } => {
                *parent
            }
        }
    }

    /// Deterministic identifier for the occurrence behind this key.
    ///
    /// A name-based (v5) UUID in the parent's namespace, so recomputing the
    /// same occurrence always yields the same id.
    pub fn occurrence_id(&self) -> Uuid {
        let name = match self {
            OccurrenceKey::Fixed { date, .. } => format!("fixed:{}", date.format("%Y-%m-%d")),
            OccurrenceKey::Installment { index, .. } => format!("installment:{}", index),
        };
        Uuid::new_v5(&self.parent(), name.as_bytes())
    }
}

/// Returns whether an occurrence equivalent to `key` is already present.
pub fn occurrence_exists(key: &OccurrenceKey, known: &[Transaction]) -> bool {
    known
        .iter()
        .filter_map(OccurrenceKey::of)
        .any(|existing| existing == *key)
}

/// Indexed form of [`occurrence_exists`] for one series, used when many
/// candidates are checked against the same snapshot.
#[derive(Debug, Default)]
pub struct ExistenceGuard {
    keys: HashSet<OccurrenceKey>,
}

impl ExistenceGuard {
    pub fn for_series(root: Uuid, known: &[Transaction]) -> Self {
        let keys = known
            .iter()
            .filter(|t| t.parent_transaction_id == Some(root))
            .filter_map(OccurrenceKey::of)
            .collect();
        Self { keys }
    }

    pub fn contains(&self, key: &OccurrenceKey) -> bool {
        self.keys.contains(key)
    }

    /// Claims `key`, returning `false` if it was already present.
    pub fn claim(&mut self, key: OccurrenceKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
