use srk_outcome::TransactionId;

/// A completed purchase held in the paper queue's history. Restores replay
/// one notification per record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub original_transaction_id: TransactionId,
    pub product_id: String,
}

/// One `restore_completed_transactions` call as observed by the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoreCall {
    pub application_username: Option<String>,
    /// Number of restoration notifications staged by this call.
    pub staged: usize,
}
