//! Capability contract consumed from the external purchase queue.
//!
//! Declared `pub` so queue adapters (store SDK bindings, the paper queue,
//! test doubles) can implement it. The controller only ever calls
//! [`PaymentQueue::finalize`]; beginning a restore is the caller's job
//! (see [`crate::begin_restore`]).

use srk_outcome::Transaction;

pub trait PaymentQueue {
    /// Acknowledge `transaction` so the queue stops redelivering it.
    ///
    /// Fire-and-forget: idempotency and failure handling belong to the queue.
    fn finalize(&mut self, transaction: &Transaction);

    /// Ask the queue to replay previously completed purchases as
    /// restoration notifications.
    fn restore_completed_transactions(&mut self, application_username: Option<&str>);
}
