//! srk-outcome
//!
//! Value types shared by the restore controller and its callers:
//! - queue-side notifications (`Transaction`, `TransactionState`, `TransactionId`)
//! - restore results (`RestoredItem`, `RestoreOutcome`, `QueueError`)
//! - the restore request descriptor (`RestoreRequest`)
//!
//! No behavior lives here beyond constructors and small predicates.

mod request;
mod types;

pub use request::{RestoreCallback, RestoreRequest};
pub use types::*;
