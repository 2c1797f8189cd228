//! Recurring series generation.
//!
//! Everything here is pure with respect to the store: functions take a
//! snapshot of known transactions and return what should be written or
//! deleted. Persistence is left to [`crate::writer::SilentWriter`] and the
//! [`crate::engine::RecurringEngine`].

use chrono::{DateTime, Utc};

use crate::models::Transaction;

pub mod cancellation;
pub mod cascade;
pub mod expander;
pub mod guard;

pub use cancellation::resolve_cancellation;
pub use cascade::on_paid;
pub use expander::{expand, MAX_OCCURRENCES_PER_EXPANSION};
pub use guard::{occurrence_exists, ExistenceGuard, OccurrenceKey};

/// Builds a generated occurrence from the record it is derived from.
///
/// All fields are copied from `source`; identity, date, payment state,
/// bookkeeping timestamps and the parent reference are overridden. The
/// parent is always the series root, never an intermediate occurrence.
pub(crate) fn materialize(
    source: &Transaction,
    key: &OccurrenceKey,
    date: DateTime<Utc>,
) -> Transaction {
    let now = Utc::now();
    let mut occurrence = source.clone();
    occurrence.id = key.occurrence_id();
    occurrence.date = date;
    occurrence.paid = false;
    occurrence.is_recurring = true;
    occurrence.parent_transaction_id = Some(key.parent());
    occurrence.created_at = now;
    occurrence.updated_at = now;
    if let OccurrenceKey::Installment { index, .. } = key {
        occurrence.current_installment = Some(*index);
    }
    occurrence
}
