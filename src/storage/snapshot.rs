use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::domain::{Transaction, TransactionDraft, TransactionId, TransactionPatch};

use super::{LedgerStore, StoreError};

/// Whole-collection store: the entire ledger is one JSON array on disk,
/// read and rewritten wholesale on every mutation.
///
/// A missing file reads as an empty ledger; a file that exists but does not
/// parse is a storage fault, not an empty result. Writes go through a
/// sibling temp file and a rename so a failed save never leaves a
/// half-written snapshot behind.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the snapshot file with an empty ledger if it does not exist.
    pub fn init(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        if !store.path.exists() {
            store.save(&[])?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Transaction>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot {}", self.path.display()))?;
        let transactions =
            serde_json::from_str(&data).context("Failed to parse snapshot")?;
        Ok(transactions)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(transactions)
            .context("Failed to serialize snapshot")?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)
            .with_context(|| format!("Failed to write snapshot {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace snapshot {}", self.path.display()))?;
        Ok(())
    }
}

impl LedgerStore for SnapshotStore {
    async fn insert(&self, draft: TransactionDraft) -> Result<Transaction, StoreError> {
        let mut transactions = self.load()?;
        let transaction = draft.into_transaction();
        transactions.push(transaction.clone());
        self.save(&transactions)?;

        debug!(id = %transaction.id, kind = %transaction.kind, "inserted transaction");
        Ok(transaction)
    }

    async fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        self.load()
    }

    async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let mut transactions = self.load()?;
        let transaction = transactions
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or(StoreError::NotFound(id))?;

        patch.apply(transaction);
        let updated = transaction.clone();
        self.save(&transactions)?;

        debug!(id = %id, "updated transaction");
        Ok(updated)
    }

    async fn remove(&self, id: TransactionId) -> Result<(), StoreError> {
        let mut transactions = self.load()?;
        let position = transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(StoreError::NotFound(id))?;

        transactions.remove(position);
        self.save(&transactions)?;

        debug!(id = %id, "removed transaction");
        Ok(())
    }

    async fn replace_all(&self, transactions: Vec<Transaction>) -> Result<(), StoreError> {
        self.save(&transactions)?;

        debug!(count = transactions.len(), "replaced all transactions");
        Ok(())
    }
}
