//! Scenario: Paper Queue End to End
//!
//! # Invariant under test
//! Driving a full restore through `begin_restore`, a chained dispatcher and
//! the paper queue: the application username reaches the queue, the first
//! batch carrying restorations resolves the request, and restorations that
//! arrive in later batches are forwarded downstream without being finalized
//! by the (now idle) restore controller.

use std::cell::RefCell;
use std::rc::Rc;

use srk_paper_queue::PaperQueue;
use srk_restore::{
    begin_restore, dispatch_batch, RestoreController, RestoreOutcome, RestoreRequest,
    TransactionController, TransactionState,
};

#[test]
fn split_delivery_resolves_on_first_matching_batch() {
    let mut controller = RestoreController::new();
    let mut queue = PaperQueue::new();
    queue.record_purchases(["sku.a", "sku.b", "sku.c"]);

    let got: Rc<RefCell<Vec<Vec<RestoreOutcome>>>> = Rc::default();
    let sink = Rc::clone(&got);
    let req = RestoreRequest::new(true, move |o| sink.borrow_mut().push(o))
        .with_application_username("acct-hash");
    begin_restore(&mut controller, &mut queue, req);

    assert_eq!(
        queue.restore_calls()[0].application_username.as_deref(),
        Some("acct-hash")
    );

    // A live purchase lands in the middle of the restore.
    queue.enqueue("sku.live", TransactionState::Purchased);

    let mut downstream = Vec::new();
    while queue.pending_count() > 0 {
        let batch = queue.deliver(2);
        let mut chain: [&mut dyn TransactionController; 1] = [&mut controller];
        downstream.extend(dispatch_batch(&mut chain, batch, &mut queue));
    }
    controller.on_queue_restore_finished();

    let calls = got.borrow();
    assert_eq!(calls.len(), 1);
    let items: Vec<_> = calls[0]
        .iter()
        .filter_map(|o| o.restored_item().map(|i| i.item_id.as_str()))
        .collect();
    assert_eq!(items, vec!["sku.a", "sku.b"]);

    // sku.c arrived after resolution; sku.live is not a restoration.
    let products: Vec<_> = downstream.iter().map(|t| t.product_id.as_str()).collect();
    assert_eq!(products, vec!["sku.c", "sku.live"]);
    assert_eq!(queue.finalized().len(), 2);
    assert!(queue.is_open(&downstream[0].transaction_id));
}
