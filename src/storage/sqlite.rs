use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Kind, Transaction, TransactionDraft, TransactionId, TransactionPatch};

use super::{LedgerStore, StoreError, MIGRATION_001_INITIAL};

/// Row-oriented store backed by SQLite: one row per transaction.
///
/// Insertion order is the implicit rowid, which survives `replace_all`
/// because rows are re-inserted in the order given.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self, StoreError> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Fetch a single record by id.
    pub async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, description, amount_cents, kind, timestamp
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch transaction")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let kind_str: String = row.get("kind");
        let timestamp_str: String = row.get("timestamp");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            description: row.get("description"),
            amount_cents: row.get("amount_cents"),
            kind: Kind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid kind: {}", kind_str))?,
            timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                .context("Invalid timestamp")?
                .with_timezone(&Utc),
        })
    }
}

impl LedgerStore for SqliteStore {
    async fn insert(&self, draft: TransactionDraft) -> Result<Transaction, StoreError> {
        let transaction = draft.into_transaction();

        sqlx::query(
            r#"
            INSERT INTO transactions (id, description, amount_cents, kind, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.kind.as_str())
        .bind(transaction.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save transaction")?;

        debug!(id = %transaction.id, kind = %transaction.kind, "inserted transaction");
        Ok(transaction)
    }

    async fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, amount_cents, kind, timestamp
            FROM transactions
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list transactions")?;

        rows.iter()
            .map(|row| Self::row_to_transaction(row).map_err(StoreError::Unavailable))
            .collect()
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let mut transaction = self.get(id).await?.ok_or(StoreError::NotFound(id))?;
        patch.apply(&mut transaction);

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET description = ?, amount_cents = ?, kind = ?
            WHERE id = ?
            "#,
        )
        .bind(&transaction.description)
        .bind(transaction.amount_cents)
        .bind(transaction.kind.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update transaction")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(id = %id, "updated transaction");
        Ok(transaction)
    }

    async fn remove(&self, id: TransactionId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete transaction")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        debug!(id = %id, "removed transaction");
        Ok(())
    }

    async fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM transactions")
            .execute(&mut *tx)
            .await
            .context("Failed to clear transactions")?;

        for transaction in &transactions {
            sqlx::query(
                r#"
                INSERT INTO transactions (id, description, amount_cents, kind, timestamp)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(transaction.id.to_string())
            .bind(&transaction.description)
            .bind(transaction.amount_cents)
            .bind(transaction.kind.as_str())
            .bind(transaction.timestamp.to_rfc3339())
            .execute(&mut *tx)
            .await
            .context("Failed to save transaction")?;
        }

        tx.commit().await.context("Failed to commit replace_all")?;

        debug!(count = transactions.len(), "replaced all transactions");
        Ok(())
    }
}
