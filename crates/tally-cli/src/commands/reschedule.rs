use anyhow::{anyhow, Result};
use chrono::Utc;

use super::Engine;
use crate::cli::RescheduleCommand;
use crate::parser::recurrence_rule;
use crate::util::resolve_transaction_id;

pub async fn reschedule_series(engine: &Engine, command: RescheduleCommand) -> Result<()> {
    let rule = recurrence_rule(&command.recurrence)
        .ok_or_else(|| anyhow!("Pass --every or --installments to set the new rule"))?;
    let id = resolve_transaction_id(engine.store().as_ref(), &command.id).await?;

    let change = engine.edit_template_rule(id, rule, Utc::now()).await?;
    println!("Rescheduled '{}' to {}", change.template.description, rule);
    println!(
        "  {} occurrence(s) removed, {} generated",
        change.cancelled.len(),
        change.generated.written_count()
    );
    Ok(())
}
