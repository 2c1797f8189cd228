use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use super::TransactionStore;
use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::Transaction;

const INSERT_COLUMNS: &str = "INSERT INTO transactions (id, description, amount_cents, \
    transaction_type, category_id, account_id, credit_card_id, date, paid, is_recurring, \
    recurring_type, fixed_frequency, installment_count, installment_period, \
    current_installment, recurrence_anchor, parent_transaction_id, created_at, updated_at) ";

/// SQLite implementation of [`TransactionStore`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn insert_query(transaction: &Transaction) -> QueryBuilder<'static, Sqlite> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(INSERT_COLUMNS);
        qb.push("VALUES (");
        let mut values = qb.separated(", ");
        values
            .push_bind(transaction.id)
            .push_bind(transaction.description.clone())
            .push_bind(transaction.amount_cents)
            .push_bind(transaction.transaction_type)
            .push_bind(transaction.category_id)
            .push_bind(transaction.account_id)
            .push_bind(transaction.credit_card_id)
            .push_bind(transaction.date)
            .push_bind(transaction.paid)
            .push_bind(transaction.is_recurring)
            .push_bind(transaction.recurring_type)
            .push_bind(transaction.fixed_frequency)
            .push_bind(transaction.installment_count)
            .push_bind(transaction.installment_period)
            .push_bind(transaction.current_installment)
            .push_bind(transaction.recurrence_anchor)
            .push_bind(transaction.parent_transaction_id)
            .push_bind(transaction.created_at)
            .push_bind(transaction.updated_at);
        values.push_unseparated(")");
        qb
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Transaction>, CoreError> {
        let transactions = sqlx::query_as("SELECT * FROM transactions ORDER BY date, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    async fn list_by_parent(&self, parent: Uuid) -> Result<Vec<Transaction>, CoreError> {
        let transactions = sqlx::query_as(
            "SELECT * FROM transactions WHERE id = $1 OR parent_transaction_id = $1 ORDER BY date, id",
        )
        .bind(parent)
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, CoreError> {
        let transaction = sqlx::query_as("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(transaction)
    }

    async fn insert(&self, transaction: &Transaction) -> Result<(), CoreError> {
        Self::insert_query(transaction)
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update(&self, transaction: &Transaction) -> Result<(), CoreError> {
        let result = sqlx::query(
            r#"UPDATE transactions SET description = $1, amount_cents = $2, transaction_type = $3,
                category_id = $4, account_id = $5, credit_card_id = $6, date = $7, paid = $8,
                is_recurring = $9, recurring_type = $10, fixed_frequency = $11,
                installment_count = $12, installment_period = $13, current_installment = $14,
                recurrence_anchor = $15, parent_transaction_id = $16, updated_at = $17
            WHERE id = $18"#,
        )
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.transaction_type)
        .bind(transaction.category_id)
        .bind(transaction.account_id)
        .bind(transaction.credit_card_id)
        .bind(transaction.date)
        .bind(transaction.paid)
        .bind(transaction.is_recurring)
        .bind(transaction.recurring_type)
        .bind(transaction.fixed_frequency)
        .bind(transaction.installment_count)
        .bind(transaction.installment_period)
        .bind(transaction.current_installment)
        .bind(transaction.recurrence_anchor)
        .bind(transaction.parent_transaction_id)
        .bind(transaction.updated_at)
        .bind(transaction.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(transaction.id.to_string()));
        }
        Ok(())
    }

    async fn append_if_absent(&self, transaction: &Transaction) -> Result<bool, CoreError> {
        let mut qb = Self::insert_query(transaction);
        qb.push(" ON CONFLICT(id) DO NOTHING");
        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<usize, CoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM transactions WHERE id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() as usize)
    }
}
