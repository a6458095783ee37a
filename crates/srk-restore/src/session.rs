use tracing::info;

use srk_outcome::RestoreRequest;

use crate::controller::RestoreController;
use crate::queue::PaymentQueue;

/// Caller-side entry point for a restore: register `request` with the
/// controller, then ask the queue to start replaying completed purchases on
/// behalf of the request's `application_username`.
///
/// Returns the request displaced from the controller, if one was pending
/// (its callback has not fired; see [`RestoreController::submit`]).
pub fn begin_restore<Q>(
    controller: &mut RestoreController,
    queue: &mut Q,
    request: RestoreRequest,
) -> Option<RestoreRequest>
where
    Q: PaymentQueue + ?Sized,
{
    let application_username = request.application_username.clone();
    let displaced = controller.submit(request);
    info!(
        has_application_username = application_username.is_some(),
        "restore begun"
    );
    queue.restore_completed_transactions(application_username.as_deref());
    displaced
}
