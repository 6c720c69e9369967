use crate::domain::{
    compute_balance, compute_cumulative_series, parse_cents, Cents, CumulativeSeries, Kind,
    Transaction, TransactionDraft, TransactionId, TransactionPatch,
};
use crate::storage::{LedgerStore, SnapshotStore, SqliteStore};

use super::{AppError, ValidationError};

/// Validated user input for a new or edited transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInput {
    pub description: String,
    pub amount_cents: Cents,
    pub kind: Kind,
}

/// Validate raw user text into a typed transaction input.
///
/// This is the single boundary where free text enters the system: the
/// description is trimmed, the amount parsed to a non-negative magnitude in
/// cents (any sign is discarded; direction comes from the kind), and the
/// kind must be exactly `income` or `expense`.
pub fn validate(
    description: &str,
    amount_text: &str,
    kind_text: &str,
) -> Result<ValidInput, ValidationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyField("description"));
    }

    let amount_text = amount_text.trim();
    if amount_text.is_empty() {
        return Err(ValidationError::EmptyField("amount"));
    }
    let amount_cents = parse_cents(amount_text)
        .map_err(|_| ValidationError::NotANumber(amount_text.to_string()))?
        .abs();

    let kind = Kind::from_str(kind_text)
        .ok_or_else(|| ValidationError::InvalidKind(kind_text.to_string()))?;

    Ok(ValidInput {
        description: description.to_string(),
        amount_cents,
        kind,
    })
}

/// Fields to change when editing a transaction; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct EditInput<'a> {
    pub description: Option<&'a str>,
    pub amount_text: Option<&'a str>,
    pub kind_text: Option<&'a str>,
}

/// Validate an edit into a patch, checking only the supplied fields.
pub fn validate_edit(edit: &EditInput<'_>) -> Result<TransactionPatch, ValidationError> {
    let mut patch = TransactionPatch::default();

    if let Some(description) = edit.description {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyField("description"));
        }
        patch.description = Some(description.to_string());
    }

    if let Some(amount_text) = edit.amount_text {
        let amount_text = amount_text.trim();
        if amount_text.is_empty() {
            return Err(ValidationError::EmptyField("amount"));
        }
        let amount_cents = parse_cents(amount_text)
            .map_err(|_| ValidationError::NotANumber(amount_text.to_string()))?
            .abs();
        patch.amount_cents = Some(amount_cents);
    }

    if let Some(kind_text) = edit.kind_text {
        let kind = Kind::from_str(kind_text)
            .ok_or_else(|| ValidationError::InvalidKind(kind_text.to_string()))?;
        patch.kind = Some(kind);
    }

    Ok(patch)
}

/// High-level ledger operations over any store backend. The service holds
/// no durable state of its own: every derived value is computed from a
/// fresh snapshot, never from anything cached across calls.
pub struct LedgerService<S: LedgerStore> {
    store: S,
}

impl LedgerService<SqliteStore> {
    /// Initialize a new SQLite-backed ledger at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing SQLite-backed ledger.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }
}

impl LedgerService<SnapshotStore> {
    /// Open a JSON-snapshot-backed ledger, creating the file if missing.
    pub fn open_snapshot(path: &str) -> Result<Self, AppError> {
        let store = SnapshotStore::init(path)?;
        Ok(Self::new(store))
    }
}

impl<S: LedgerStore> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and record a new transaction.
    pub async fn record(
        &self,
        description: &str,
        amount_text: &str,
        kind_text: &str,
    ) -> Result<Transaction, AppError> {
        let input = validate(description, amount_text, kind_text)?;
        let draft = TransactionDraft::new(input.description, input.amount_cents, input.kind);
        Ok(self.store.insert(draft).await?)
    }

    /// Validate and apply an edit to an existing transaction. The original
    /// timestamp is left untouched; edits do not re-stamp time.
    pub async fn update(
        &self,
        id: TransactionId,
        edit: EditInput<'_>,
    ) -> Result<Transaction, AppError> {
        let patch = validate_edit(&edit)?;
        Ok(self.store.update(id, patch).await?)
    }

    /// Delete a transaction. Removing an id twice fails on the second call.
    pub async fn remove(&self, id: TransactionId) -> Result<(), AppError> {
        Ok(self.store.remove(id).await?)
    }

    /// All transactions in insertion order.
    pub async fn list(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.store.list().await?)
    }

    /// All transactions, most recent first (the ordering history views use).
    pub async fn history(&self) -> Result<Vec<Transaction>, AppError> {
        let mut transactions = self.list().await?;
        transactions.reverse();
        Ok(transactions)
    }

    /// Current balance over a fresh snapshot.
    pub async fn balance(&self) -> Result<Cents, AppError> {
        let transactions = self.list().await?;
        Ok(compute_balance(&transactions))
    }

    /// Cumulative income/expense series over a fresh snapshot, in
    /// chronological (insertion) order.
    pub async fn series(&self) -> Result<CumulativeSeries, AppError> {
        let transactions = self.list().await?;
        Ok(compute_cumulative_series(&transactions))
    }
}
