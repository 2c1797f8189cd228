use anyhow::Result;
use tally_core::store::TransactionStore;

use super::Engine;
use crate::cli::ListCommand;
use crate::util::resolve_transaction_id;
use crate::views::table::{display_transactions, ViewTransaction};

pub async fn list_transactions(engine: &Engine, command: ListCommand) -> Result<()> {
    let store = engine.store();
    let transactions = match &command.series {
        Some(series) => {
            let id = resolve_transaction_id(store.as_ref(), series).await?;
            store.list_by_parent(id).await?
        }
        None => store.list().await?,
    };

    let view: Vec<ViewTransaction> = transactions
        .iter()
        .filter(|t| !command.unpaid || !t.paid)
        .filter(|t| !command.templates || t.is_template())
        .map(ViewTransaction::from)
        .collect();

    display_transactions(&view);
    Ok(())
}
