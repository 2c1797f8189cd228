use anyhow::{anyhow, Result};
use chrono::Utc;
use owo_colors::{OwoColorize, Style};
use tally_core::models::{NewTransactionData, TransactionType};
use uuid::Uuid;

use super::Engine;
use crate::cli::AddCommand;
use crate::parser::{format_amount, parse_amount, parse_date, recurrence_rule};

fn parse_id(value: Option<&String>, what: &str) -> Result<Option<Uuid>> {
    value
        .map(|v| Uuid::parse_str(v).map_err(|e| anyhow!("Invalid {} id '{}': {}", what, v, e)))
        .transpose()
}

pub async fn add_transaction(engine: &Engine, command: AddCommand) -> Result<()> {
    let now = Utc::now();
    let data = NewTransactionData {
        description: command.description,
        amount_cents: parse_amount(&command.amount)?,
        transaction_type: if command.income {
            TransactionType::Income
        } else {
            TransactionType::Expense
        },
        category_id: parse_id(command.category.as_ref(), "category")?.unwrap_or_else(Uuid::nil),
        account_id: parse_id(command.account.as_ref(), "account")?,
        credit_card_id: parse_id(command.card.as_ref(), "card")?,
        date: command.date.as_deref().map(parse_date).transpose()?.unwrap_or(now),
        paid: command.paid,
        recurrence: recurrence_rule(&command.recurrence),
    };

    let created = engine.create_transaction(data, now).await?;
    let template = &created.template;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    match template.recurrence_rule() {
        Some(rule) => {
            println!(
                "{} Created recurring transaction: {}",
                "✓".style(success_style),
                template.description.bright_white().bold()
            );
            println!("  {} ID: {}", "→".style(info_style), template.id.to_string().yellow());
            println!("  {} Recurrence: {}", "→".style(info_style), rule);
            println!(
                "  {} {} upcoming occurrence(s) generated",
                "→".style(info_style),
                created.generated.written_count()
            );
        }
        None => {
            println!(
                "{} Added transaction: {} ({})",
                "✓".style(success_style),
                template.description.bright_white().bold(),
                format_amount(template.amount_cents)
            );
            println!("  {} ID: {}", "→".style(info_style), template.id.to_string().yellow());
        }
    }
    Ok(())
}
