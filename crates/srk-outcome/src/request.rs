use std::fmt;

use crate::RestoreOutcome;

/// Completion callback of a restore request.
///
/// `FnOnce`: invoking it consumes the request, so a single request can never
/// report twice.
pub type RestoreCallback = Box<dyn FnOnce(Vec<RestoreOutcome>)>;

/// Descriptor for one in-flight restore operation.
pub struct RestoreRequest {
    /// Finalize each restored transaction on the queue as soon as it is matched.
    pub finalize_automatically: bool,
    /// Passed through to the queue when the restore is begun. Not read by the
    /// controller.
    pub application_username: Option<String>,
    on_complete: RestoreCallback,
}

impl RestoreRequest {
    pub fn new<F>(finalize_automatically: bool, on_complete: F) -> Self
    where
        F: FnOnce(Vec<RestoreOutcome>) + 'static,
    {
        Self {
            finalize_automatically,
            application_username: None,
            on_complete: Box::new(on_complete),
        }
    }

    /// Attach the opaque account hint forwarded to the queue.
    pub fn with_application_username(mut self, username: impl Into<String>) -> Self {
        self.application_username = Some(username.into());
        self
    }

    /// Consume the request and deliver `outcomes` to its callback.
    pub fn complete(self, outcomes: Vec<RestoreOutcome>) {
        (self.on_complete)(outcomes)
    }
}

impl fmt::Debug for RestoreRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestoreRequest")
            .field("finalize_automatically", &self.finalize_automatically)
            .field("application_username", &self.application_username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn complete_hands_outcomes_to_callback() {
        let seen: Rc<RefCell<Option<Vec<RestoreOutcome>>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let req = RestoreRequest::new(true, move |outcomes| {
            *sink.borrow_mut() = Some(outcomes);
        });

        req.complete(Vec::new());
        assert_eq!(*seen.borrow(), Some(Vec::new()));
    }

    #[test]
    fn debug_omits_callback_and_shows_policy() {
        let req = RestoreRequest::new(false, |_| {}).with_application_username("acct-7");
        let s = format!("{req:?}");
        assert!(s.contains("finalize_automatically: false"));
        assert!(s.contains("acct-7"));
    }
}
