use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid transaction type: {0}")]
pub struct ParseTransactionTypeError(String);

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ParseTransactionTypeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

/// Which kind of series a recurring template seeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    /// Open-ended, one occurrence per frequency step
    Fixed,
    /// Closed plan with a known number of installments
    Installment,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurring type: {0}")]
pub struct ParseRecurringTypeError(String);

impl FromStr for RecurringType {
    type Err = ParseRecurringTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(RecurringType::Fixed),
            "installment" => Ok(RecurringType::Installment),
            _ => Err(ParseRecurringTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FixedFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0} (expected daily, weekly, monthly, quarterly or annual)")]
pub struct ParseFrequencyError(String);

impl FromStr for FixedFrequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(FixedFrequency::Daily),
            "weekly" => Ok(FixedFrequency::Weekly),
            "monthly" => Ok(FixedFrequency::Monthly),
            "quarterly" => Ok(FixedFrequency::Quarterly),
            "annual" | "yearly" => Ok(FixedFrequency::Annual),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

impl std::fmt::Display for FixedFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixedFrequency::Daily => write!(f, "daily"),
            FixedFrequency::Weekly => write!(f, "weekly"),
            FixedFrequency::Monthly => write!(f, "monthly"),
            FixedFrequency::Quarterly => write!(f, "quarterly"),
            FixedFrequency::Annual => write!(f, "annual"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentPeriod {
    Months,
    Weeks,
    Years,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid installment period: {0} (expected months, weeks or years)")]
pub struct ParsePeriodError(String);

impl FromStr for InstallmentPeriod {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "months" | "month" => Ok(InstallmentPeriod::Months),
            "weeks" | "week" => Ok(InstallmentPeriod::Weeks),
            "years" | "year" => Ok(InstallmentPeriod::Years),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

impl std::fmt::Display for InstallmentPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallmentPeriod::Months => write!(f, "months"),
            InstallmentPeriod::Weeks => write!(f, "weeks"),
            InstallmentPeriod::Years => write!(f, "years"),
        }
    }
}

/// A ledger transaction: a one-off entry, a recurring template, or an
/// occurrence generated from a template.
///
/// The recurrence fields are stored flat, the way they are persisted. Use
/// [`Transaction::recurrence_rule`] for a typed, validated view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    /// Always non-negative; the direction comes from `transaction_type`
    pub amount_cents: i64,
    pub transaction_type: TransactionType,
    pub category_id: Uuid,
    pub account_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub paid: bool,
    pub is_recurring: bool,
    pub recurring_type: Option<RecurringType>,
    /// Set iff `recurring_type` is fixed
    pub fixed_frequency: Option<FixedFrequency>,
    /// Set iff `recurring_type` is installment
    pub installment_count: Option<u32>,
    pub installment_period: Option<InstallmentPeriod>,
    /// 1-based index within the installment plan
    pub current_installment: Option<u32>,
    /// When the current rule took effect, if it replaced an earlier one.
    /// The rule produces no occurrences on or before this instant.
    pub recurrence_anchor: Option<DateTime<Utc>>,
    /// Absent on templates, always the template id on generated occurrences
    pub parent_transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// A recurring transaction without a parent seeds a series and is never
    /// itself due.
    pub fn is_template(&self) -> bool {
        self.is_recurring && self.parent_transaction_id.is_none()
    }

    /// The id every occurrence of this series points back to.
    pub fn series_root(&self) -> Uuid {
        self.parent_transaction_id.unwrap_or(self.id)
    }

    /// Typed view of the recurrence fields.
    ///
    /// Returns `None` for non-recurring transactions and for records whose
    /// fields are incomplete or inconsistent (missing frequency, zero
    /// installments, current index outside the plan).
    pub fn recurrence_rule(&self) -> Option<RecurrenceRule> {
        if !self.is_recurring {
            return None;
        }
        match self.recurring_type? {
            RecurringType::Fixed => self.fixed_frequency.map(RecurrenceRule::Fixed),
            RecurringType::Installment => {
                let count = self.installment_count?;
                let period = self.installment_period?;
                let current = self.current_installment.unwrap_or(1);
                if count == 0 || current == 0 || current > count {
                    return None;
                }
                Some(RecurrenceRule::Installment {
                    count,
                    period,
                    current,
                })
            }
        }
    }

    /// Whether the current rule may produce an occurrence on `date`.
    pub fn rule_covers(&self, date: DateTime<Utc>) -> bool {
        !matches!(self.recurrence_anchor, Some(anchor) if date <= anchor)
    }

    /// Overwrites the flat recurrence fields from a typed rule.
    pub fn set_recurrence_rule(&mut self, rule: Option<RecurrenceRule>) {
        self.is_recurring = rule.is_some();
        self.recurring_type = rule.map(|r| r.recurring_type());
        self.fixed_frequency = None;
        self.installment_count = None;
        self.installment_period = None;
        self.current_installment = None;

        match rule {
            Some(RecurrenceRule::Fixed(frequency)) => {
                self.fixed_frequency = Some(frequency);
            }
            Some(RecurrenceRule::Installment {
                count,
                period,
                current,
            }) => {
                self.installment_count = Some(count);
                self.installment_period = Some(period);
                self.current_installment = Some(current);
            }
            None => {}
        }
    }
}

/// Recurrence definition of a template, in validated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurrenceRule {
    Fixed(FixedFrequency),
    Installment {
        count: u32,
        period: InstallmentPeriod,
        /// 1-based index of the record carrying this rule
        current: u32,
    },
}

impl RecurrenceRule {
    pub fn recurring_type(&self) -> RecurringType {
        match self {
            RecurrenceRule::Fixed(_) => RecurringType::Fixed,
            RecurrenceRule::Installment { .. } => RecurringType::Installment,
        }
    }

    /// Convenience constructor for a plan starting at its first installment.
    pub fn installments(count: u32, period: InstallmentPeriod) -> Self {
        RecurrenceRule::Installment {
            count,
            period,
            current: 1,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        match *self {
            RecurrenceRule::Fixed(_) => Ok(()),
            RecurrenceRule::Installment { count, current, .. } => {
                if count == 0 {
                    return Err(CoreError::InvalidRecurrence(
                        "installment count must be at least 1".to_string(),
                    ));
                }
                if current == 0 || current > count {
                    return Err(CoreError::InvalidRecurrence(format!(
                        "current installment {} is outside 1..={}",
                        current, count
                    )));
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceRule::Fixed(frequency) => write!(f, "{}", frequency),
            RecurrenceRule::Installment {
                count,
                period,
                current,
            } => write!(f, "{}/{} every {}", current, count, period),
        }
    }
}

/// Data for an interactively created transaction (one-off or template).
#[derive(Debug, Clone)]
pub struct NewTransactionData {
    pub description: String,
    pub amount_cents: i64,
    pub transaction_type: TransactionType,
    pub category_id: Uuid,
    pub account_id: Option<Uuid>,
    pub credit_card_id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub paid: bool,
    /// When present the transaction becomes a template seeding a series
    pub recurrence: Option<RecurrenceRule>,
}

impl Default for NewTransactionData {
    fn default() -> Self {
        Self {
            description: String::new(),
            amount_cents: 0,
            transaction_type: TransactionType::Expense,
            category_id: Uuid::nil(),
            account_id: None,
            credit_card_id: None,
            date: Utc::now(),
            paid: false,
            recurrence: None,
        }
    }
}

impl NewTransactionData {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.description.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }
        if self.amount_cents < 0 {
            return Err(CoreError::InvalidInput(
                "amount must not be negative; use the transaction type for direction".to_string(),
            ));
        }
        if let Some(rule) = &self.recurrence {
            rule.validate()?;
        }
        Ok(())
    }

    pub fn into_transaction(self, now: DateTime<Utc>) -> Transaction {
        let mut transaction = Transaction {
            id: Uuid::now_v7(),
            description: self.description,
            amount_cents: self.amount_cents,
            transaction_type: self.transaction_type,
            category_id: self.category_id,
            account_id: self.account_id,
            credit_card_id: self.credit_card_id,
            date: self.date,
            paid: self.paid,
            is_recurring: false,
            recurring_type: None,
            fixed_frequency: None,
            installment_count: None,
            installment_period: None,
            current_installment: None,
            recurrence_anchor: None,
            parent_transaction_id: None,
            created_at: now,
            updated_at: now,
        };
        transaction.set_recurrence_rule(self.recurrence);
        transaction
    }
}

/// Interactive edit of a single transaction. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub description: Option<String>,
    pub amount_cents: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub paid: Option<bool>,
}

impl TransactionUpdate {
    pub fn mark_paid() -> Self {
        Self {
            paid: Some(true),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err(CoreError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }
        if matches!(self.amount_cents, Some(a) if a < 0) {
            return Err(CoreError::InvalidInput(
                "amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn apply(&self, transaction: &mut Transaction, now: DateTime<Utc>) {
        if let Some(description) = &self.description {
            transaction.description = description.clone();
        }
        if let Some(amount_cents) = self.amount_cents {
            transaction.amount_cents = amount_cents;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(paid) = self.paid {
            transaction.paid = paid;
        }
        transaction.updated_at = now;
    }
}
