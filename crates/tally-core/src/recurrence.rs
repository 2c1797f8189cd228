//! Calendar arithmetic for recurring series.
//!
//! Pure functions only. Month and year steps use chrono's calendar-aware
//! addition, which clamps to the last day of a shorter month
//! (Jan 31 + 1 month = Feb 29 in a leap year).

use chrono::{DateTime, Days, Months, Utc};

use crate::error::CoreError;
use crate::models::{FixedFrequency, InstallmentPeriod};

/// Returns the date exactly one `frequency` step after `date`.
///
/// The time of day is preserved.
pub fn next_fixed_date(
    date: DateTime<Utc>,
    frequency: FixedFrequency,
) -> Result<DateTime<Utc>, CoreError> {
    let next = match frequency {
        FixedFrequency::Daily => date.checked_add_days(Days::new(1)),
        FixedFrequency::Weekly => date.checked_add_days(Days::new(7)),
        FixedFrequency::Monthly => date.checked_add_months(Months::new(1)),
        FixedFrequency::Quarterly => date.checked_add_months(Months::new(3)),
        FixedFrequency::Annual => date.checked_add_months(Months::new(12)),
    };

    next.ok_or_else(|| {
        CoreError::DateOutOfRange(format!("{} plus one {} step", date.to_rfc3339(), frequency))
    })
}

/// Returns `base + offset · period`, where `offset` is zero-based
/// (`offset = 0` is `base` itself).
pub fn installment_date(
    base: DateTime<Utc>,
    offset: u32,
    period: InstallmentPeriod,
) -> Result<DateTime<Utc>, CoreError> {
    let out_of_range = || {
        CoreError::DateOutOfRange(format!(
            "{} plus {} {}",
            base.to_rfc3339(),
            offset,
            period
        ))
    };

    match period {
        InstallmentPeriod::Months => base.checked_add_months(Months::new(offset)),
        InstallmentPeriod::Weeks => base.checked_add_days(Days::new(u64::from(offset) * 7)),
        InstallmentPeriod::Years => offset
            .checked_mul(12)
            .and_then(|months| base.checked_add_months(Months::new(months))),
    }
    .ok_or_else(out_of_range)
}

/// Iterator over the successive fixed dates strictly after an anchor.
///
/// Stops (after yielding the error) if the calendar overflows.
pub struct FixedDates {
    current: DateTime<Utc>,
    frequency: FixedFrequency,
    exhausted: bool,
}

impl FixedDates {
    pub fn after(anchor: DateTime<Utc>, frequency: FixedFrequency) -> Self {
        Self {
            current: anchor,
            frequency,
            exhausted: false,
        }
    }
}

impl Iterator for FixedDates {
    type Item = Result<DateTime<Utc>, CoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match next_fixed_date(self.current, self.frequency) {
            Ok(next) => {
                self.current = next;
                Some(Ok(next))
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::at;
    use rstest::rstest;

    #[rstest]
    #[case(FixedFrequency::Daily, "2024-01-05", "2024-01-06")]
    #[case(FixedFrequency::Daily, "2024-02-28", "2024-02-29")]
    #[case(FixedFrequency::Weekly, "2024-03-01", "2024-03-08")]
    #[case(FixedFrequency::Weekly, "2024-12-28", "2025-01-04")]
    #[case(FixedFrequency::Monthly, "2024-01-05", "2024-02-05")]
    #[case(FixedFrequency::Monthly, "2024-01-31", "2024-02-29")]
    #[case(FixedFrequency::Monthly, "2023-01-31", "2023-02-28")]
    #[case(FixedFrequency::Quarterly, "2024-11-30", "2025-02-28")]
    #[case(FixedFrequency::Annual, "2024-02-29", "2025-02-28")]
    #[case(FixedFrequency::Annual, "2024-07-15", "2025-07-15")]
    fn test_next_fixed_date_steps_one_unit(
        #[case] frequency: FixedFrequency,
        #[case] from: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(next_fixed_date(at(from), frequency).unwrap(), at(expected));
    }

    #[rstest]
    #[case(InstallmentPeriod::Months, 0, "2024-01-10")]
    #[case(InstallmentPeriod::Months, 1, "2024-02-10")]
    #[case(InstallmentPeriod::Months, 2, "2024-03-10")]
    #[case(InstallmentPeriod::Weeks, 3, "2024-01-31")]
    #[case(InstallmentPeriod::Years, 2, "2026-01-10")]
    fn test_installment_date(
        #[case] period: InstallmentPeriod,
        #[case] offset: u32,
        #[case] expected: &str,
    ) {
        assert_eq!(
            installment_date(at("2024-01-10"), offset, period).unwrap(),
            at(expected)
        );
    }

    #[test]
    fn test_installment_dates_are_computed_from_base_not_chained() {
        // Offsets are taken from the base, so the 31st survives a short month.
        let base = at("2024-01-31");
        assert_eq!(
            installment_date(base, 1, InstallmentPeriod::Months).unwrap(),
            at("2024-02-29")
        );
        assert_eq!(
            installment_date(base, 2, InstallmentPeriod::Months).unwrap(),
            at("2024-03-31")
        );
    }

    #[test]
    fn test_time_of_day_is_preserved() {
        let morning = "2024-05-01T08:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let next = next_fixed_date(morning, FixedFrequency::Monthly).unwrap();
        assert_eq!(next, "2024-06-01T08:30:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = next_fixed_date(DateTime::<Utc>::MAX_UTC, FixedFrequency::Daily);
        assert!(matches!(result, Err(CoreError::DateOutOfRange(_))));

        let result = installment_date(at("2024-01-01"), u32::MAX, InstallmentPeriod::Years);
        assert!(matches!(result, Err(CoreError::DateOutOfRange(_))));
    }

    #[test]
    fn test_fixed_dates_iterator() {
        let dates: Vec<_> = FixedDates::after(at("2024-01-05"), FixedFrequency::Monthly)
            .take(3)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(dates, vec![at("2024-02-05"), at("2024-03-05"), at("2024-04-05")]);

        let mut at_end = FixedDates::after(DateTime::<Utc>::MAX_UTC, FixedFrequency::Weekly);
        assert!(matches!(at_end.next(), Some(Err(_))));
        assert!(at_end.next().is_none());
    }
}
