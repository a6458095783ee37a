//! Restore controller
//!
//! # Design
//!
//! Single-slot state machine for one outstanding restore request:
//!
//! ```text
//!            submit(req)                       submit(req') overwrites req
//!   Idle  ──────────────►  Pending  ◄──────────────────────────────────┐
//!    ▲                       │  │                                     │
//!    │   scan: ≥1 restored   │  └─────────────────────────────────────┘
//!    ├───────────────────────┤
//!    │   restore failed      │   scan: 0 restored → stays Pending
//!    ├───────────────────────┤
//!    │   restore finished    │
//!    └───────────────────────┘
//! ```
//!
//! Every `Pending → Idle` edge goes through [`RestoreController::resolve`],
//! which takes the request out of the slot and then consumes it. A request
//! can therefore report at most once, and the slot is never cleared without
//! its callback being invoked.

use srk_outcome::{QueueError, RestoreOutcome, RestoreRequest, RestoredItem, Transaction};
use tracing::{debug, info, warn};

use crate::queue::PaymentQueue;

// ---------------------------------------------------------------------------
// RestoreState
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RestoreState {
    /// No restore request outstanding.
    Idle,
    /// One request awaiting a matching batch or a terminal signal.
    Pending,
}

// ---------------------------------------------------------------------------
// ScanReport
// ---------------------------------------------------------------------------

/// Partition of one notification batch.
///
/// `matched` holds one `Restored` outcome per restoration notification, in
/// scan order. `unmatched` holds every other notification, in input order;
/// it is the only part downstream consumers see.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub matched: Vec<RestoreOutcome>,
    pub unmatched: Vec<Transaction>,
}

impl ScanReport {
    fn passthrough(batch: Vec<Transaction>) -> Self {
        Self {
            matched: Vec::new(),
            unmatched: batch,
        }
    }
}

// ---------------------------------------------------------------------------
// RestoreController
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RestoreController {
    pending: Option<RestoreRequest>,
}

impl RestoreController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RestoreState {
        if self.pending.is_some() {
            RestoreState::Pending
        } else {
            RestoreState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Read-only view of the outstanding request (the queue reads
    /// `application_username` from here).
    pub fn pending_request(&self) -> Option<&RestoreRequest> {
        self.pending.as_ref()
    }

    /// Make `request` the outstanding restore.
    ///
    /// Any request already pending is displaced and handed back WITHOUT its
    /// callback having been invoked. Dropping the returned value drops that
    /// callback silently.
    pub fn submit(&mut self, request: RestoreRequest) -> Option<RestoreRequest> {
        let displaced = self.pending.replace(request);
        if displaced.is_some() {
            warn!("restore request overwritten while pending; previous callback will not fire");
        }
        displaced
    }

    /// Scan one notification batch and return the notifications this
    /// controller did not handle, in input order.
    pub fn scan<Q>(&mut self, batch: Vec<Transaction>, queue: &mut Q) -> Vec<Transaction>
    where
        Q: PaymentQueue + ?Sized,
    {
        self.scan_batch(batch, queue).unmatched
    }

    /// Like [`scan`][Self::scan] but returns the full partition.
    ///
    /// With no request pending the batch passes through untouched: nothing is
    /// matched, nothing is finalized, no callback fires. Otherwise each
    /// restoration notification is (optionally) finalized and matched before
    /// the next notification is looked at. A non-empty match set resolves the
    /// pending request with exactly those outcomes; an empty one leaves it
    /// pending.
    pub fn scan_batch<Q>(&mut self, batch: Vec<Transaction>, queue: &mut Q) -> ScanReport
    where
        Q: PaymentQueue + ?Sized,
    {
        let batch_len = batch.len();
        let report = match self.pending.as_ref().map(|r| r.finalize_automatically) {
            None => ScanReport::passthrough(batch),
            Some(finalize_automatically) => partition(batch, finalize_automatically, queue),
        };

        debug!(
            batch_len,
            matched = report.matched.len(),
            unmatched = report.unmatched.len(),
            pending = self.is_pending(),
            "restore scan"
        );

        if !report.matched.is_empty() {
            self.resolve(report.matched.clone());
        }

        report
    }

    /// Terminal signal: the queue reported that the restore failed.
    pub fn on_queue_restore_failed(&mut self, error: QueueError) {
        if !self.resolve(vec![RestoreOutcome::Failed(error)]) {
            debug!("restore-failed signal with no pending request; ignored");
        }
    }

    /// Terminal signal: the queue finished replaying restorations.
    ///
    /// Reaching this with a request still pending means nothing was
    /// restored, so the callback receives an empty list.
    pub fn on_queue_restore_finished(&mut self) {
        if !self.resolve(Vec::new()) {
            debug!("restore-finished signal with no pending request; ignored");
        }
    }

    // The only Pending → Idle transition. Returns `false` when Idle.
    fn resolve(&mut self, outcomes: Vec<RestoreOutcome>) -> bool {
        let Some(request) = self.pending.take() else {
            return false;
        };
        info!(
            outcomes = outcomes.len(),
            failed = outcomes.iter().any(RestoreOutcome::is_failure),
            "restore request resolved"
        );
        request.complete(outcomes);
        true
    }
}

fn partition<Q>(batch: Vec<Transaction>, finalize_automatically: bool, queue: &mut Q) -> ScanReport
where
    Q: PaymentQueue + ?Sized,
{
    let mut report = ScanReport::default();
    for tx in batch {
        if tx.state.is_restoration() {
            let item = RestoredItem::from_transaction(&tx, finalize_automatically);
            if finalize_automatically {
                queue.finalize(&tx);
            }
            report.matched.push(RestoreOutcome::Restored(item));
        } else {
            report.unmatched.push(tx);
        }
    }
    report
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
