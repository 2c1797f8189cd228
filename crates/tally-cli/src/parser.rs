use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_english::{parse_date_string, Dialect};
use tally_core::models::RecurrenceRule;

use crate::cli::RecurrenceArgs;

/// Parses a user-supplied date. Plain `YYYY-MM-DD` dates land at noon UTC so
/// the calendar day survives display in any timezone.
pub fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
        return date
            .and_hms_opt(12, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| anyhow!("Invalid date '{}'", date_str));
    }
    parse_date_string(date_str, Utc::now(), Dialect::Uk)
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))
}

/// Parses an amount like `1200`, `49.9` or `1,200.50` into cents.
pub fn parse_amount(amount_str: &str) -> Result<i64> {
    let cleaned: String = amount_str.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.starts_with('-') {
        bail!("Amount must not be negative; use --income for money coming in");
    }

    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        bail!("Invalid amount '{}'", amount_str);
    }
    if fraction.len() > 2 {
        bail!("Amount '{}' has more than two decimal places", amount_str);
    }

    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        bail!("Invalid amount '{}'", amount_str);
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse()? };
    let cents: i64 = format!("{:0<2}", fraction).parse()?;
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(cents))
        .ok_or_else(|| anyhow!("Amount '{}' is too large", amount_str))
}

pub fn format_amount(cents: i64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}.{:02}", grouped, cents % 100)
}

/// Builds a rule from `--every` or `--installments`/`--period`.
pub fn recurrence_rule(args: &RecurrenceArgs) -> Option<RecurrenceRule> {
    match (args.every, args.installments) {
        (Some(frequency), _) => Some(RecurrenceRule::Fixed(frequency)),
        (None, Some(count)) => Some(RecurrenceRule::installments(count, args.period)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tally_core::models::{FixedFrequency, InstallmentPeriod};

    #[rstest]
    #[case("1200", 120_000)]
    #[case("49.9", 4_990)]
    #[case("49.90", 4_990)]
    #[case("1,200.50", 120_050)]
    #[case(".5", 50)]
    #[case("0", 0)]
    fn test_parse_amount(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[rstest]
    #[case("-5")]
    #[case("12.345")]
    #[case("twelve")]
    #[case("")]
    #[case(".")]
    #[case("1.2.3")]
    fn test_parse_amount_rejects(#[case] input: &str) {
        assert!(parse_amount(input).is_err());
    }

    #[rstest]
    #[case(0, "0.00")]
    #[case(4_990, "49.90")]
    #[case(120_050, "1,200.50")]
    #[case(123_456_789, "1,234,567.89")]
    fn test_format_amount(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(format_amount(cents), expected);
    }

    #[test]
    fn test_iso_dates_land_at_noon() {
        let date = parse_date("2024-01-05").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-05T12:00:00+00:00");
        assert!(parse_date("tomorrow").is_ok());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_recurrence_rule_from_args() {
        let fixed = RecurrenceArgs {
            every: Some(FixedFrequency::Weekly),
            installments: None,
            period: InstallmentPeriod::Months,
        };
        assert_eq!(
            recurrence_rule(&fixed),
            Some(RecurrenceRule::Fixed(FixedFrequency::Weekly))
        );

        let plan = RecurrenceArgs {
            every: None,
            installments: Some(12),
            period: InstallmentPeriod::Weeks,
        };
        assert_eq!(
            recurrence_rule(&plan),
            Some(RecurrenceRule::installments(12, InstallmentPeriod::Weeks))
        );

        let none = RecurrenceArgs {
            every: None,
            installments: None,
            period: InstallmentPeriod::Months,
        };
        assert_eq!(recurrence_rule(&none), None);
    }
}
