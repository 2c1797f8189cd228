use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TransactionStore;
use crate::error::CoreError;
use crate::models::Transaction;

/// In-process store with optional failure injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<Uuid, Transaction>>,
    failing_writes: RwLock<HashSet<Uuid>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write of the record with this id fail.
    pub async fn fail_writes_for(&self, id: Uuid) {
        self.failing_writes.write().await.insert(id);
    }

    /// While set, reads and writes fail with [`CoreError::StoreUnavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::StoreUnavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    async fn check_writable(&self, id: Uuid) -> Result<(), CoreError> {
        self.check_available()?;
        if self.failing_writes.read().await.contains(&id) {
            return Err(CoreError::StoreUnavailable(format!("write rejected for {}", id)));
        }
        Ok(())
    }
}

fn sorted(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    transactions
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Transaction>, CoreError> {
        self.check_available()?;
        let rows = self.rows.read().await;
        Ok(sorted(rows.values().cloned().collect()))
    }

    async fn list_by_parent(&self, parent: Uuid) -> Result<Vec<Transaction>, CoreError> {
        self.check_available()?;
        let rows = self.rows.read().await;
        Ok(sorted(
            rows.values()
                .filter(|t| t.id == parent || t.parent_transaction_id == Some(parent))
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, CoreError> {
        self.check_available()?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, transaction: &Transaction) -> Result<(), CoreError> {
        self.check_writable(transaction.id).await?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&transaction.id) {
            return Err(CoreError::InvalidInput(format!(
                "transaction {} already exists",
                transaction.id
            )));
        }
        rows.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), CoreError> {
        self.check_writable(transaction.id).await?;
        let mut rows = self.rows.write().await;
        match rows.get_mut(&transaction.id) {
            Some(row) => {
                *row = transaction.clone();
                Ok(())
            }
            None => Err(CoreError::NotFound(transaction.id.to_string())),
        }
    }

    async fn append_if_absent(&self, transaction: &Transaction) -> Result<bool, CoreError> {
        self.check_writable(transaction.id).await?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&transaction.id) {
            return Ok(false);
        }
        rows.insert(transaction.id, transaction.clone());
        Ok(true)
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<usize, CoreError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        Ok(ids.iter().filter(|id| rows.remove(id).is_some()).count())
    }
}
