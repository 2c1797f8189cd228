use anyhow::Result;
use chrono::Utc;
use dialoguer::Confirm;
use tally_core::error::CoreError;
use tally_core::store::TransactionStore;

use super::Engine;
use crate::cli::CancelCommand;
use crate::util::resolve_transaction_id;

pub async fn cancel_series(engine: &Engine, command: CancelCommand) -> Result<()> {
    let id = resolve_transaction_id(engine.store().as_ref(), &command.id).await?;
    let template = engine
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Stop '{}' and delete its unpaid future occurrences?",
                template.description
            ))
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Cancellation aborted.");
            return Ok(());
        }
    }

    let removed = engine.cancel_series(id, Utc::now()).await?;
    println!(
        "Cancelled series '{}': {} future occurrence(s) removed",
        template.description,
        removed.len()
    );
    Ok(())
}
