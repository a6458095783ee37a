//! Controller chaining for notification batches.
//!
//! A queue observer typically hosts several controllers (purchase, restore,
//! completion). Each batch is offered to them in order; every controller
//! receives only what the previous one left unhandled, and whatever survives
//! the whole chain is returned to the caller.

use srk_outcome::Transaction;

use crate::controller::RestoreController;
use crate::queue::PaymentQueue;

/// A stage that consumes the notifications it understands and returns the
/// rest, preserving their relative order.
pub trait TransactionController {
    fn process_transactions(
        &mut self,
        batch: Vec<Transaction>,
        queue: &mut dyn PaymentQueue,
    ) -> Vec<Transaction>;
}

impl TransactionController for RestoreController {
    fn process_transactions(
        &mut self,
        batch: Vec<Transaction>,
        queue: &mut dyn PaymentQueue,
    ) -> Vec<Transaction> {
        self.scan(batch, queue)
    }
}

/// Run `batch` through `controllers` in order and return the unhandled residue.
pub fn dispatch_batch(
    controllers: &mut [&mut dyn TransactionController],
    batch: Vec<Transaction>,
    queue: &mut dyn PaymentQueue,
) -> Vec<Transaction> {
    let mut remaining = batch;
    for controller in controllers.iter_mut() {
        remaining = controller.process_transactions(remaining, queue);
    }
    remaining
}
