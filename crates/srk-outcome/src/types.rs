use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Queue-side notification shapes
// ---------------------------------------------------------------------------

/// Opaque handle of a transaction owned by the external purchase queue.
///
/// Only the identifier is ever copied out of a notification; queue-managed
/// transaction state stays with the queue.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Queue-defined status carried by every notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionState {
    /// Purchase is being processed by the queue.
    Purchasing,
    /// A new purchase completed.
    Purchased,
    /// The purchase failed.
    Failed,
    /// A previously completed purchase was replayed by a restore.
    Restored,
    /// Awaiting an external decision (e.g. parental approval).
    Deferred,
}

impl TransactionState {
    /// `true` only for notifications produced by a restore.
    pub fn is_restoration(&self) -> bool {
        matches!(self, Self::Restored)
    }
}

/// One transaction notification as delivered by the queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub product_id: String,
    pub state: TransactionState,
}

impl Transaction {
    pub fn new(
        transaction_id: impl Into<String>,
        product_id: impl Into<String>,
        state: TransactionState,
    ) -> Self {
        Self {
            transaction_id: TransactionId::new(transaction_id),
            product_id: product_id.into(),
            state,
        }
    }
}

// ---------------------------------------------------------------------------
// Restore results
// ---------------------------------------------------------------------------

/// One successfully restored purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoredItem {
    /// Catalog identifier of the restored product.
    pub item_id: String,
    /// Identifier of the originating queue transaction.
    pub transaction: TransactionId,
    /// `true` when the transaction was left open and the caller must
    /// finalize it explicitly.
    pub needs_finalization: bool,
}

impl RestoredItem {
    /// Build from a restoration notification under the given policy.
    pub fn from_transaction(tx: &Transaction, finalize_automatically: bool) -> Self {
        Self {
            item_id: tx.product_id.clone(),
            transaction: tx.transaction_id.clone(),
            needs_finalization: !finalize_automatically,
        }
    }
}

/// Opaque upstream error reported by the purchase queue. Forwarded verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueError {
    pub domain: String,
    pub code: i64,
    pub message: String,
}

impl QueueError {
    pub fn new(domain: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RESTORE_FAILED: {}({}): {}", self.domain, self.code, self.message)
    }
}

impl std::error::Error for QueueError {}

/// Per-item result handed to a restore callback.
///
/// A callback receives either zero or more `Restored` values or exactly one
/// `Failed`; the two are never mixed in one invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RestoreOutcome {
    Restored(RestoredItem),
    Failed(QueueError),
}

impl RestoreOutcome {
    pub fn restored_item(&self) -> Option<&RestoredItem> {
        match self {
            RestoreOutcome::Restored(item) => Some(item),
            RestoreOutcome::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RestoreOutcome::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_restored_state_is_restoration() {
        assert!(TransactionState::Restored.is_restoration());
        for s in [
            TransactionState::Purchasing,
            TransactionState::Purchased,
            TransactionState::Failed,
            TransactionState::Deferred,
        ] {
            assert!(!s.is_restoration(), "{s:?} must not count as restoration");
        }
    }

    #[test]
    fn restored_item_inverts_finalize_policy() {
        let tx = Transaction::new("t-1", "sku.a", TransactionState::Restored);

        let auto = RestoredItem::from_transaction(&tx, true);
        assert_eq!(auto.item_id, "sku.a");
        assert_eq!(auto.transaction, TransactionId::new("t-1"));
        assert!(!auto.needs_finalization);

        let manual = RestoredItem::from_transaction(&tx, false);
        assert!(manual.needs_finalization);
    }

    #[test]
    fn outcome_json_is_tagged() {
        let failed = RestoreOutcome::Failed(QueueError::new("paper", 2, "cancelled"));
        let v = serde_json::to_value(&failed).unwrap();
        assert_eq!(v["outcome"], "failed");
        assert_eq!(v["code"], 2);

        let tx = Transaction::new("t-9", "sku.z", TransactionState::Restored);
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["transaction_id"], "t-9");
        assert_eq!(v["state"], "restored");
    }

    #[test]
    fn queue_error_display_is_stable() {
        let e = QueueError::new("paper", 7, "network down");
        assert_eq!(e.to_string(), "RESTORE_FAILED: paper(7): network down");
    }
}
