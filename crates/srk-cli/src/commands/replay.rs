//! `srk replay`: drive a `RestoreController` against the paper queue from a
//! JSON script and print one JSON line per observable event.
//!
//! Script shape (array of steps, executed in order):
//!
//! ```text
//! {"step":"history","products":["sku.a","sku.b"]}
//! {"step":"submit","finalize_automatically":true,"application_username":"acct"}
//! {"step":"deliver","max":1}
//! {"step":"batch","transactions":[{"transaction_id":"t-1","product_id":"sku.a","state":"restored"}]}
//! {"step":"finished"}
//! {"step":"failed","error":{"domain":"paper","code":2,"message":"cancelled"}}
//! ```
//!
//! `submit` fields left out fall back to the resolved config settings.

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::rc::Rc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use srk_config::RestoreSettings;
use srk_outcome::{QueueError, RestoreOutcome, RestoreRequest, Transaction, TransactionId};
use srk_paper_queue::PaperQueue;
use srk_restore::{begin_restore, RestoreController};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Seed the paper queue with completed purchases.
    History { products: Vec<String> },
    /// Begin a restore (submit + queue restore call).
    Submit {
        finalize_automatically: Option<bool>,
        application_username: Option<String>,
    },
    /// Deliver staged paper-queue notifications as one batch.
    Deliver { max: Option<usize> },
    /// Deliver an explicit batch of notifications.
    Batch { transactions: Vec<Transaction> },
    /// Queue signalled restore-finished.
    Finished,
    /// Queue signalled restore-failed.
    Failed { error: QueueError },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A restore callback fired.
    Callback {
        request: usize,
        outcomes: Vec<RestoreOutcome>,
    },
    /// A pending request was overwritten; its callback will not fire.
    Displaced { request: usize },
    /// Notifications left for downstream consumers after a scan.
    Unmatched { transactions: Vec<Transaction> },
    /// Final state after the last step.
    Summary {
        finalized: Vec<TransactionId>,
        pending: bool,
        config_hash: Option<String>,
    },
}

pub fn load_script(path: &str) -> Result<Vec<Step>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read script failed: {path}"))?;
    parse_script(&raw)
}

pub fn parse_script(raw: &str) -> Result<Vec<Step>> {
    serde_json::from_str(raw).context("SCRIPT_INVALID: expected a JSON array of steps")
}

/// Execute `steps` and write events as JSON lines to `out`. Returns every
/// event written.
pub fn run_script<W: Write>(
    steps: &[Step],
    settings: &RestoreSettings,
    config_hash: Option<&str>,
    out: &mut W,
) -> Result<Vec<Event>> {
    let mut controller = RestoreController::new();
    let mut queue = PaperQueue::new();
    let fired: Rc<RefCell<Vec<Event>>> = Rc::default();
    let mut written: Vec<Event> = Vec::new();
    let mut next_request = 0usize;
    let mut active_request = None;

    for (i, step) in steps.iter().enumerate() {
        debug!(index = i, ?step, "replay step");
        let mut events = Vec::new();

        match step {
            Step::History { products } => {
                queue.record_purchases(products.iter().cloned());
            }
            Step::Submit {
                finalize_automatically,
                application_username,
            } => {
                let request_no = next_request;
                next_request += 1;

                let sink = Rc::clone(&fired);
                let mut req = RestoreRequest::new(
                    finalize_automatically.unwrap_or(settings.finalize_automatically),
                    move |outcomes| {
                        sink.borrow_mut().push(Event::Callback {
                            request: request_no,
                            outcomes,
                        })
                    },
                );
                req.application_username = application_username
                    .clone()
                    .or_else(|| settings.application_username.clone());

                if begin_restore(&mut controller, &mut queue, req).is_some() {
                    if let Some(prev) = active_request {
                        events.push(Event::Displaced { request: prev });
                    }
                }
                active_request = Some(request_no);
            }
            Step::Deliver { max } => {
                let batch = match max {
                    Some(n) => queue.deliver(*n),
                    None => queue.deliver_all(),
                };
                let unmatched = controller.scan(batch, &mut queue);
                events.push(Event::Unmatched {
                    transactions: unmatched,
                });
            }
            Step::Batch { transactions } => {
                let unmatched = controller.scan(transactions.clone(), &mut queue);
                events.push(Event::Unmatched {
                    transactions: unmatched,
                });
            }
            Step::Finished => controller.on_queue_restore_finished(),
            Step::Failed { error } => controller.on_queue_restore_failed(error.clone()),
        }

        // Callbacks fire synchronously inside the step; report them first.
        let mut step_events: Vec<Event> = fired.borrow_mut().drain(..).collect();
        step_events.append(&mut events);
        if !controller.is_pending() {
            active_request = None;
        }

        for ev in step_events {
            emit(out, &ev)?;
            written.push(ev);
        }
    }

    let summary = Event::Summary {
        finalized: queue.finalized().to_vec(),
        pending: controller.is_pending(),
        config_hash: config_hash.map(str::to_string),
    };
    emit(out, &summary)?;
    written.push(summary);

    Ok(written)
}

fn emit<W: Write>(out: &mut W, ev: &Event) -> Result<()> {
    let line = serde_json::to_string(ev).context("serialize event failed")?;
    writeln!(out, "{line}").context("write event failed")
}
