//! Persistence port for transactions.
//!
//! The engine only talks to a [`TransactionStore`]; [`SqliteStore`] is the
//! production backend and [`MemoryStore`] backs tests and benchmarks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::Transaction;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Every transaction, ordered by date.
    async fn list(&self) -> Result<Vec<Transaction>, CoreError>;

    /// The series root itself plus every occurrence parented to it.
    async fn list_by_parent(&self, parent: Uuid) -> Result<Vec<Transaction>, CoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, CoreError>;

    async fn insert(&self, transaction: &Transaction) -> Result<(), CoreError>;

    /// Replaces a stored transaction. [`CoreError::NotFound`] if absent.
    async fn update(&self, transaction: &Transaction) -> Result<(), CoreError>;

    /// Inserts unless a record with the same id exists. Returns whether a
    /// row was written.
    async fn append_if_absent(&self, transaction: &Transaction) -> Result<bool, CoreError>;

    /// Removes the given ids, returning how many were present.
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<usize, CoreError>;
}
