use anyhow::{anyhow, Result};
use tally_core::error::CoreError;
use tally_core::store::TransactionStore;
use uuid::Uuid;

const MIN_PREFIX_LEN: usize = 4;

/// Resolves a full id or a unique id prefix to a transaction id.
pub async fn resolve_transaction_id(store: &impl TransactionStore, short_id: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(short_id) {
        return Ok(id);
    }
    if short_id.len() < MIN_PREFIX_LEN {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "Short ID must be at least {} characters long.",
            MIN_PREFIX_LEN
        ))));
    }

    let prefix = short_id.to_lowercase();
    let matches: Vec<_> = store
        .list()
        .await?
        .into_iter()
        .filter(|t| t.id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [only] => Ok(only.id),
        [] => Err(anyhow!(CoreError::NotFound(format!(
            "No transaction found with ID prefix '{}'",
            short_id
        )))),
        _ => {
            let candidates: Vec<(String, String)> = matches
                .into_iter()
                .map(|t| (t.id.to_string(), t.description))
                .collect();
            Err(anyhow!(CoreError::AmbiguousId(candidates)))
        }
    }
}
