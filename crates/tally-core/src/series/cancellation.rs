use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Transaction;

/// Ids of the occurrences to delete when the series seeded by `template_id`
/// is cancelled: children of the template dated after `now` and still
/// unpaid. Paid or elapsed occurrences are history and are never returned.
pub fn resolve_cancellation(
    template_id: Uuid,
    known: &[Transaction],
    now: DateTime<Utc>,
) -> Vec<Uuid> {
    known
        .iter()
        .filter(|t| t.parent_transaction_id == Some(template_id))
        .filter(|t| t.date > now && !t.paid)
        .map(|t| t.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{at, template};
    use crate::models::{FixedFrequency, RecurrenceRule};
    use crate::series::expand;

    #[test]
    fn test_only_future_unpaid_children_are_returned() {
        let rent = template("2024-01-05", RecurrenceRule::Fixed(FixedFrequency::Monthly));
        let mut known = vec![rent.clone()];
        known.extend(expand(&rent, &[], at("2024-06-30")).unwrap());
        // Feb and Mar have elapsed, Apr is paid ahead of time.
        let now = at("2024-03-20");
        let april = known
            .iter_mut()
            .find(|t| t.date == at("2024-04-05"))
            .unwrap();
        april.paid = true;

        let other = template("2024-01-05", RecurrenceRule::Fixed(FixedFrequency::Monthly));
        known.extend(expand(&other, &[], at("2024-06-30")).unwrap());

        let ids = resolve_cancellation(rent.id, &known, now);
        let dates: Vec<_> = known
            .iter()
            .filter(|t| ids.contains(&t.id))
            .map(|t| t.date)
            .collect();

        assert_eq!(dates, vec![at("2024-05-05"), at("2024-06-05")]);
        assert!(!ids.contains(&rent.id));
    }

    #[test]
    fn test_nothing_to_cancel() {
        let rent = template("2024-01-05", RecurrenceRule::Fixed(FixedFrequency::Monthly));
        assert!(resolve_cancellation(rent.id, &[rent.clone()], at("2024-01-06")).is_empty());
        assert!(resolve_cancellation(Uuid::now_v7(), &[], at("2024-01-06")).is_empty());
    }
}
