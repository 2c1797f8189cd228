use super::guard::OccurrenceKey;
use super::materialize;
use crate::error::CoreError;
use crate::models::{RecurrenceRule, Transaction, TransactionUpdate};
use crate::recurrence::next_fixed_date;

/// Reacts to an occurrence being marked paid.
///
/// `occurrence` is the record as it was before `update` was applied and
/// `root` is its series root as currently stored (the same record when a
/// template is paid). The cascade fires only when the update sets
/// `paid = true` on a record that was unpaid, and the series still runs the
/// fixed rule the occurrence was generated under. It then yields the
/// occurrence one frequency step later, parented to the series root.
/// Installment series, ended series and occurrences left over from a
/// replaced rule never cascade, nor does a step landing on or before the
/// root's `recurrence_anchor`.
///
/// Whether the returned occurrence is already stored is decided by the
/// caller through the existence guard.
pub fn on_paid(
    occurrence: &Transaction,
    root: &Transaction,
    update: &TransactionUpdate,
) -> Result<Option<Transaction>, CoreError> {
    if update.paid != Some(true) || occurrence.paid {
        return Ok(None);
    }
    let Some(RecurrenceRule::Fixed(frequency)) = root.recurrence_rule() else {
        return Ok(None);
    };
    if occurrence.recurrence_rule() != Some(RecurrenceRule::Fixed(frequency)) {
        return Ok(None);
    }

    let date = next_fixed_date(occurrence.date, frequency)?;
    if !root.rule_covers(date) {
        return Ok(None);
    }
    let key = OccurrenceKey::Fixed {
        parent: root.id,
        date: date.date_naive(),
    };

    Ok(Some(materialize(occurrence, &key, date)))
}
