//! Deterministic in-memory "paper" purchase queue.
//!
//! Design decisions (kept intentionally simple/deterministic):
//! - Transaction ids are `paper:txn:{seq:06}` from a single counter, so a
//!   given sequence of calls always yields the same ids.
//! - Purchases recorded with [`PaperQueue::record_purchase`] are complete
//!   history; they never appear as notifications on their own.
//! - [`PaymentQueue::restore_completed_transactions`] stages one `Restored`
//!   notification per history record, each under a fresh transaction id.
//! - Nothing is delivered until the driver calls [`PaperQueue::deliver`];
//!   batch boundaries are chosen by the caller.
//! - Finalization is recorded, never rejected. Finalizing an unknown or
//!   already-finalized transaction is logged and otherwise a no-op.
//!
//! No randomness. No timestamps.

use std::collections::{BTreeMap, VecDeque};

use srk_outcome::{Transaction, TransactionId, TransactionState};
use srk_restore::PaymentQueue;
use tracing::{debug, warn};

pub mod types;

use types::{PurchaseRecord, RestoreCall};

#[derive(Clone, Debug, Default)]
pub struct PaperQueue {
    next_seq: u64,
    history: Vec<PurchaseRecord>,
    staged: VecDeque<Transaction>,
    /// Delivered and not yet finalized, keyed by transaction id.
    open: BTreeMap<TransactionId, Transaction>,
    /// Every finalize call, in call order.
    finalize_log: Vec<TransactionId>,
    restore_calls: Vec<RestoreCall>,
}

impl PaperQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> TransactionId {
        self.next_seq += 1;
        TransactionId::new(format!("paper:txn:{:06}", self.next_seq))
    }

    /// Add a completed purchase to the restorable history.
    pub fn record_purchase(&mut self, product_id: impl Into<String>) -> TransactionId {
        let id = self.next_id();
        self.history.push(PurchaseRecord {
            original_transaction_id: id.clone(),
            product_id: product_id.into(),
        });
        id
    }

    pub fn record_purchases<I, S>(&mut self, product_ids: I) -> Vec<TransactionId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        product_ids
            .into_iter()
            .map(|p| self.record_purchase(p))
            .collect()
    }

    /// Stage an arbitrary notification (e.g. a live purchase arriving in the
    /// middle of a restore). Returns the id assigned to it.
    pub fn enqueue(&mut self, product_id: impl Into<String>, state: TransactionState) -> TransactionId {
        let id = self.next_id();
        self.staged.push_back(Transaction {
            transaction_id: id.clone(),
            product_id: product_id.into(),
            state,
        });
        id
    }

    /// Deliver the next batch of at most `max` staged notifications.
    pub fn deliver(&mut self, max: usize) -> Vec<Transaction> {
        let n = max.min(self.staged.len());
        let batch: Vec<Transaction> = self.staged.drain(..n).collect();
        for tx in &batch {
            self.open.insert(tx.transaction_id.clone(), tx.clone());
        }
        debug!(delivered = batch.len(), remaining = self.staged.len(), "paper queue delivery");
        batch
    }

    /// Deliver everything staged as a single batch.
    pub fn deliver_all(&mut self) -> Vec<Transaction> {
        self.deliver(self.staged.len())
    }

    /// Number of staged, undelivered notifications.
    pub fn pending_count(&self) -> usize {
        self.staged.len()
    }

    pub fn history(&self) -> &[PurchaseRecord] {
        &self.history
    }

    /// `true` if `id` was delivered and has not been finalized.
    pub fn is_open(&self, id: &TransactionId) -> bool {
        self.open.contains_key(id)
    }

    /// Finalize calls in call order (duplicates included).
    pub fn finalized(&self) -> &[TransactionId] {
        &self.finalize_log
    }

    pub fn finalize_count(&self, id: &TransactionId) -> usize {
        self.finalize_log.iter().filter(|f| *f == id).count()
    }

    pub fn restore_calls(&self) -> &[RestoreCall] {
        &self.restore_calls
    }
}

impl PaymentQueue for PaperQueue {
    fn finalize(&mut self, transaction: &Transaction) {
        let id = transaction.transaction_id.clone();
        if self.open.remove(&id).is_none() {
            warn!(transaction = %id, "finalize for transaction that is not open");
        }
        self.finalize_log.push(id);
    }

    fn restore_completed_transactions(&mut self, application_username: Option<&str>) {
        let products: Vec<String> = self.history.iter().map(|r| r.product_id.clone()).collect();
        for product_id in &products {
            let id = self.next_id();
            self.staged.push_back(Transaction {
                transaction_id: id,
                product_id: product_id.clone(),
                state: TransactionState::Restored,
            });
        }
        self.restore_calls.push(RestoreCall {
            application_username: application_username.map(str::to_string),
            staged: products.len(),
        });
    }
}

/// Convenience constructors for notifications used by tests/scripts.
pub fn restored(transaction_id: impl Into<String>, product_id: impl Into<String>) -> Transaction {
    Transaction::new(transaction_id, product_id, TransactionState::Restored)
}

pub fn purchased(transaction_id: impl Into<String>, product_id: impl Into<String>) -> Transaction {
    Transaction::new(transaction_id, product_id, TransactionState::Purchased)
}
