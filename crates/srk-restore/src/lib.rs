//! srk-restore
//!
//! Restore reconciliation against an external purchase queue.
//!
//! - `RestoreController` holds at most one pending restore request, scans
//!   notification batches for restorations, finalizes matches per the
//!   request's policy, and resolves the request exactly once.
//! - `PaymentQueue` is the capability the controller consumes from the queue.
//! - `TransactionController` / `dispatch_batch` chain controllers so each one
//!   sees only what the previous one left unhandled.
//!
//! Pure in-memory logic. No IO, no locks, no blocking: every entry point is
//! expected to run on the single context that receives queue notifications.

mod controller;
mod dispatch;
mod queue;
mod session;

pub use controller::{RestoreController, RestoreState, ScanReport};
pub use dispatch::{dispatch_batch, TransactionController};
pub use queue::PaymentQueue;
pub use session::begin_restore;

pub use srk_outcome::{
    QueueError, RestoreOutcome, RestoreRequest, RestoredItem, Transaction, TransactionId,
    TransactionState,
};
