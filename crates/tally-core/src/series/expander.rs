use chrono::{DateTime, Utc};

use super::guard::{ExistenceGuard, OccurrenceKey};
use super::materialize;
use crate::error::CoreError;
use crate::models::{RecurrenceRule, Transaction};
use crate::recurrence::{installment_date, FixedDates};

/// Upper bound on occurrences produced by one expansion
pub const MAX_OCCURRENCES_PER_EXPANSION: usize = 5_000;

/// Expands a recurring record into the occurrences missing up to `target`.
///
/// - Fixed: one occurrence per frequency step after `template.date`, while
///   the step is on or before `target`.
/// - Installment: indices `current + 1 ..= count`, installment `i` dated
///   `template.date + (i - current) · period`; stops at the first index
///   past `target`.
///
/// Dates on or before the record's `recurrence_anchor` belong to an earlier
/// rule and are never emitted. Occurrences already present in `known` (per
/// [`ExistenceGuard`]) are not emitted either. Generated occurrences point at the series root, so `template`
/// may itself be a generated occurrence.
///
/// Returns [`CoreError::InvalidRecurrence`] if `template` carries no valid
/// rule; batch callers check eligibility first and skip such records.
pub fn expand(
    template: &Transaction,
    known: &[Transaction],
    target: DateTime<Utc>,
) -> Result<Vec<Transaction>, CoreError> {
    let rule = template.recurrence_rule().ok_or_else(|| {
        CoreError::InvalidRecurrence(format!(
            "transaction {} has no usable recurrence rule",
            template.id
        ))
    })?;

    let root = template.series_root();
    let mut guard = ExistenceGuard::for_series(root, known);
    let mut occurrences = Vec::new();

    match rule {
        RecurrenceRule::Fixed(frequency) => {
            for date in FixedDates::after(template.date, frequency) {
                let date = date?;
                if date > target {
                    break;
                }
                if !template.rule_covers(date) {
                    continue;
                }
                if occurrences.len() >= MAX_OCCURRENCES_PER_EXPANSION {
                    tracing::warn!(
                        template_id = %template.id,
                        limit = MAX_OCCURRENCES_PER_EXPANSION,
                        "expansion truncated"
                    );
                    break;
                }
                let key = OccurrenceKey::Fixed {
                    parent: root,
                    date: date.date_naive(),
                };
                if guard.claim(key) {
                    occurrences.push(materialize(template, &key, date));
                }
            }
        }
        RecurrenceRule::Installment {
            count,
            period,
            current,
        } => {
            for index in (current + 1)..=count {
                let date = installment_date(template.date, index - current, period)?;
                if date > target {
                    break;
                }
                if !template.rule_covers(date) {
                    continue;
                }
                let key = OccurrenceKey::Installment {
                    parent: root,
                    index,
                };
                if guard.claim(key) {
                    occurrences.push(materialize(template, &key, date));
                }
            }
        }
    }

    Ok(occurrences)
}
