use anyhow::{bail, Result};
use chrono::Utc;
use tally_core::models::TransactionUpdate;

use super::Engine;
use crate::cli::EditCommand;
use crate::parser::{parse_amount, parse_date};
use crate::util::resolve_transaction_id;

pub async fn edit_transaction(engine: &Engine, command: EditCommand) -> Result<()> {
    let update = TransactionUpdate {
        description: command.description,
        amount_cents: command.amount.as_deref().map(parse_amount).transpose()?,
        date: command.date.as_deref().map(parse_date).transpose()?,
        paid: command.unpaid.then_some(false),
    };
    if update.description.is_none()
        && update.amount_cents.is_none()
        && update.date.is_none()
        && update.paid.is_none()
    {
        bail!("Nothing to change; pass --description, --amount, --date or --unpaid");
    }

    let id = resolve_transaction_id(engine.store().as_ref(), &command.id).await?;
    let outcome = engine.update_transaction(id, update, Utc::now()).await?;
    println!("Updated: '{}'", outcome.transaction.description);
    Ok(())
}
