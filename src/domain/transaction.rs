use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

/// The direction of a transaction. Amounts are stored as non-negative
/// magnitudes; the kind alone decides whether a transaction adds to or
/// subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Kind::Income),
            "expense" => Some(Kind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger entry. The id and timestamp are assigned when the record
/// is created and never change afterwards; edits only touch description,
/// amount and kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    /// Amount in cents (always non-negative; direction comes from `kind`)
    pub amount_cents: Cents,
    pub kind: Kind,
    /// When the transaction was recorded
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn new(description: impl Into<String>, amount_cents: Cents, kind: Kind) -> Self {
        assert!(amount_cents >= 0, "Transaction amount must be non-negative");
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount_cents,
            kind,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Input for creating a transaction. The store fills in the id, and the
/// timestamp when none is supplied.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub description: String,
    pub amount_cents: Cents,
    pub kind: Kind,
    pub timestamp: Option<DateTime<Utc>>,
}

impl TransactionDraft {
    pub fn new(description: impl Into<String>, amount_cents: Cents, kind: Kind) -> Self {
        Self {
            description: description.into(),
            amount_cents,
            kind,
            timestamp: None,
        }
    }

    /// Materialize the draft into a full record with a fresh id.
    pub fn into_transaction(self) -> Transaction {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);
        Transaction::new(self.description, self.amount_cents, self.kind).with_timestamp(timestamp)
    }
}

/// Partial update for an existing transaction. Only the supplied fields are
/// overwritten; id and timestamp are never part of a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount_cents: Option<Cents>,
    pub kind: Option<Kind>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount_cents.is_none() && self.kind.is_none()
    }

    /// Apply this patch to a record in place, leaving unset fields untouched.
    pub fn apply(&self, transaction: &mut Transaction) {
        if let Some(description) = &self.description {
            transaction.description = description.clone();
        }
        if let Some(amount_cents) = self.amount_cents {
            transaction.amount_cents = amount_cents;
        }
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [Kind::Income, Kind::Expense] {
            let parsed = Kind::from_str(kind.as_str()).unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert_eq!(Kind::from_str("transfer"), None);
        assert_eq!(Kind::from_str(""), None);
    }

    #[test]
    fn test_create_transaction() {
        let tx = Transaction::new("Groceries", 4550, Kind::Expense);
        assert_eq!(tx.description, "Groceries");
        assert_eq!(tx.amount_cents, 4550);
        assert_eq!(tx.kind, Kind::Expense);
    }

    #[test]
    #[should_panic(expected = "Transaction amount must be non-negative")]
    fn test_transaction_rejects_negative_amount() {
        Transaction::new("Bad", -100, Kind::Expense);
    }

    #[test]
    fn test_patch_apply_only_touches_supplied_fields() {
        let mut tx = Transaction::new("Lunch", 1200, Kind::Expense);
        let original_id = tx.id;
        let original_timestamp = tx.timestamp;

        let patch = TransactionPatch {
            amount_cents: Some(1500),
            ..Default::default()
        };
        patch.apply(&mut tx);

        assert_eq!(tx.amount_cents, 1500);
        assert_eq!(tx.description, "Lunch");
        assert_eq!(tx.kind, Kind::Expense);
        assert_eq!(tx.id, original_id);
        assert_eq!(tx.timestamp, original_timestamp);
    }

    #[test]
    fn test_draft_materialization_keeps_explicit_timestamp() {
        let ts = Utc::now() - chrono::Duration::days(3);
        let mut draft = TransactionDraft::new("Salary", 100_000, Kind::Income);
        draft.timestamp = Some(ts);

        let tx = draft.into_transaction();
        assert_eq!(tx.timestamp, ts);
        assert_eq!(tx.kind, Kind::Income);
    }
}
