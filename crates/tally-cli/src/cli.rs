use clap::{Args, Parser, Subcommand};
use tally_core::models::{FixedFrequency, InstallmentPeriod};

/// Tally: a personal ledger with recurring transactions and installment plans
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Record a transaction, or a recurring template
    Add(AddCommand),
    /// List transactions
    List(ListCommand),
    /// Mark a transaction as paid
    Pay(PayCommand),
    /// Edit a single transaction
    Edit(EditCommand),
    /// Stop a recurring series and delete its unpaid future occurrences
    Cancel(CancelCommand),
    /// Change the recurrence rule of a template
    Reschedule(RescheduleCommand),
    /// Run one renewal pass over all recurring series
    Renew,
    /// Keep recurring series renewed in the background until interrupted
    Watch,
}

/// Recurrence options shared by `add` and `reschedule`.
#[derive(Args, Debug, Clone)]
pub struct RecurrenceArgs {
    /// Repeat forever at this frequency (daily, weekly, monthly, quarterly, annual)
    #[arg(long, conflicts_with = "installments")]
    pub every: Option<FixedFrequency>,
    /// Split into this many installments
    #[arg(long)]
    pub installments: Option<u32>,
    /// Spacing between installments (weeks, months, years)
    #[arg(long, default_value = "months")]
    pub period: InstallmentPeriod,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// What the transaction is for
    pub description: String,
    /// Amount, e.g. 1200 or 49.90
    pub amount: String,
    /// Record as income instead of expense
    #[arg(long)]
    pub income: bool,
    /// Date of the transaction (e.g. "2024-01-05", "tomorrow")
    #[arg(short, long)]
    pub date: Option<String>,
    /// Category id
    #[arg(long)]
    pub category: Option<String>,
    /// Account id
    #[arg(long, conflicts_with = "card")]
    pub account: Option<String>,
    /// Credit card id
    #[arg(long)]
    pub card: Option<String>,
    /// Already settled
    #[arg(long)]
    pub paid: bool,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Only the given series (template id or prefix)
    #[arg(long)]
    pub series: Option<String>,
    /// Hide settled transactions
    #[arg(long)]
    pub unpaid: bool,
    /// Only templates
    #[arg(long, conflicts_with = "series")]
    pub templates: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PayCommand {
    /// Transaction id or unique prefix
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// Transaction id or unique prefix
    pub id: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    /// Mark as not paid
    #[arg(long)]
    pub unpaid: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CancelCommand {
    /// Template id or unique prefix
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RescheduleCommand {
    /// Template id or unique prefix
    pub id: String,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}
