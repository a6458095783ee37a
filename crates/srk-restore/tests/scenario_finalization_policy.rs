//! Scenario: Finalization Policy
//!
//! # Invariant under test
//! Automatic policy: every matched item has `needs_finalization == false`
//! and the queue saw exactly one finalize per matched transaction.
//! Manual policy: every matched item has `needs_finalization == true`, the
//! controller never finalizes, and the transactions stay open on the queue
//! until the caller finalizes them.

use std::cell::RefCell;
use std::rc::Rc;

use srk_paper_queue::PaperQueue;
use srk_restore::{
    begin_restore, PaymentQueue, RestoreController, RestoreOutcome, RestoreRequest, Transaction,
    TransactionState,
};

fn run_restore(finalize_automatically: bool) -> (PaperQueue, Vec<RestoreOutcome>) {
    let mut controller = RestoreController::new();
    let mut queue = PaperQueue::new();
    queue.record_purchases(["sku.a", "sku.b", "sku.c"]);

    let got: Rc<RefCell<Vec<RestoreOutcome>>> = Rc::default();
    let sink = Rc::clone(&got);
    let req = RestoreRequest::new(finalize_automatically, move |outcomes| {
        sink.borrow_mut().extend(outcomes)
    });

    begin_restore(&mut controller, &mut queue, req);
    let batch = queue.deliver_all();
    let unmatched = controller.scan(batch, &mut queue);
    assert!(unmatched.is_empty());
    assert!(!controller.is_pending());

    let outcomes = got.borrow().clone();
    (queue, outcomes)
}

#[test]
fn automatic_policy_finalizes_each_match_once() {
    let (queue, outcomes) = run_restore(true);
    assert_eq!(outcomes.len(), 3);

    for outcome in &outcomes {
        let item = outcome.restored_item().expect("restored outcome");
        assert!(!item.needs_finalization);
        assert_eq!(queue.finalize_count(&item.transaction), 1);
        assert!(!queue.is_open(&item.transaction));
    }
    assert_eq!(queue.finalized().len(), 3);
}

#[test]
fn manual_policy_leaves_transactions_open_for_caller() {
    let (mut queue, outcomes) = run_restore(false);
    assert_eq!(outcomes.len(), 3);
    assert!(queue.finalized().is_empty());

    for outcome in &outcomes {
        let item = outcome.restored_item().expect("restored outcome");
        assert!(item.needs_finalization);
        assert!(queue.is_open(&item.transaction));
    }

    // The caller finalizes explicitly once it has processed the items.
    for item in outcomes.iter().filter_map(RestoreOutcome::restored_item) {
        let tx = Transaction {
            transaction_id: item.transaction.clone(),
            product_id: item.item_id.clone(),
            state: TransactionState::Restored,
        };
        queue.finalize(&tx);
        assert!(!queue.is_open(&item.transaction));
    }
    assert_eq!(queue.finalized().len(), 3);
}
