//! Toast notifications.
//!
//! # Architecture
//!
//! - [`ToastMachine`] - pure state machine, one toast in flight, generation-checked steps
//! - [`ToastDriver`] - runs the machine on tokio timers and publishes state over `watch`
//! - [`Notifier`] - the seam the cart store calls; the driver implements it
//!
//! # Example
//!
//! ```rust,ignore
//! let toasts = ToastDriver::new(ToastTimings::default(), Handle::current());
//! let mut updates = toasts.subscribe();
//!
//! toasts.trigger(NotificationKind::Success, Some("\"Lamp\" added to cart".into()));
//! while updates.changed().await.is_ok() {
//!     render(&updates.borrow());
//! }
//! ```

mod driver;
mod machine;

pub use driver::ToastDriver;
pub use machine::{NotificationState, Step, StepAction, ToastMachine, ToastTimings};

use std::sync::{Mutex, PoisonError};

use zapkart_core::NotificationKind;

/// Something that can show a notification to the shopper.
pub trait Notifier: Send + Sync {
    /// Show a notification. `None` means "use the kind's default message".
    fn notify(&self, kind: NotificationKind, message: Option<String>);
}

/// A notification as handed to a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: Option<String>,
}

/// Notifier that keeps every notification it receives.
///
/// Used by headless sessions and tests that need to assert on what the
/// shopper would have seen.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent notification.
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: Option<String>) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notification { kind, message });
    }
}
