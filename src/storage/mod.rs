mod snapshot;
mod sqlite;

pub use snapshot::*;
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{Transaction, TransactionDraft, TransactionId, TransactionPatch};

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] anyhow::Error),
}

/// Durable mapping from transaction id to record.
///
/// Implementations must keep `list` in insertion order; history views that
/// want most-recent-first reverse the snapshot caller-side. A failed insert
/// must leave the store as if it never happened.
pub trait LedgerStore {
    /// Persist a new record, assigning a fresh id (and timestamp if the
    /// draft carries none). Returns the stored record.
    async fn insert(&self, draft: TransactionDraft) -> Result<Transaction, StoreError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Overwrite only the supplied fields of an existing record. The id and
    /// original timestamp are never touched. Fails with `NotFound` if the id
    /// is absent.
    async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError>;

    /// Delete a record. A second remove of the same id fails with `NotFound`
    /// again; callers must treat already-removed as an error distinct from
    /// success.
    async fn remove(&self, id: TransactionId) -> Result<(), StoreError>;

    /// Bulk overwrite of the whole collection, preserving the given order.
    async fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), StoreError>;
}
