use anyhow::Result;
use chrono::Utc;

use super::Engine;
use crate::cli::PayCommand;
use crate::util::resolve_transaction_id;

pub async fn pay_transaction(engine: &Engine, command: PayCommand) -> Result<()> {
    let id = resolve_transaction_id(engine.store().as_ref(), &command.id).await?;
    let outcome = engine.mark_paid(id, Utc::now()).await?;

    println!("Paid: '{}'", outcome.transaction.description);
    if let Some(next) = outcome.cascaded {
        if outcome.generated.written.contains(&next.id) {
            println!("Scheduled next occurrence for {}", next.date.format("%Y-%m-%d"));
        } else {
            println!("Next occurrence on {} is already scheduled", next.date.format("%Y-%m-%d"));
        }
    }
    Ok(())
}
