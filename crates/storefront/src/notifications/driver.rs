//! Tokio driver for the toast state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};
use zapkart_core::NotificationKind;

use super::Notifier;
use super::machine::{NotificationState, Step, ToastMachine, ToastTimings};

/// Runs a [`ToastMachine`] on tokio timers and publishes its state.
///
/// At most one timer task is alive: every `trigger`/`dismiss` aborts the
/// previous task before spawning the next, and the machine's generation
/// check drops any step that was already due.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ToastDriver {
    inner: Arc<ToastDriverInner>,
}

struct ToastDriverInner {
    machine: Mutex<ToastMachine>,
    state_tx: watch::Sender<NotificationState>,
    task: Mutex<Option<JoinHandle<()>>>,
    runtime: Handle,
}

impl ToastDriver {
    /// Create a driver that spawns its timers on `runtime`.
    #[must_use]
    pub fn new(timings: ToastTimings, runtime: Handle) -> Self {
        let (state_tx, _) = watch::channel(NotificationState::default());

        Self {
            inner: Arc::new(ToastDriverInner {
                machine: Mutex::new(ToastMachine::new(timings)),
                state_tx,
                task: Mutex::new(None),
                runtime,
            }),
        }
    }

    /// Current toast state.
    #[must_use]
    pub fn state(&self) -> NotificationState {
        self.inner.state_tx.borrow().clone()
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NotificationState> {
        self.inner.state_tx.subscribe()
    }

    /// Show a toast, cancelling any sequence in flight.
    #[instrument(skip(self, message))]
    pub fn trigger(&self, kind: NotificationKind, message: Option<String>) {
        self.restart(|machine| machine.trigger(kind, message));
    }

    /// Collapse and hide the current toast early.
    #[instrument(skip(self))]
    pub fn dismiss(&self) {
        self.restart(ToastMachine::dismiss);
    }

    fn restart(&self, start: impl FnOnce(&mut ToastMachine) -> Step) {
        // Held across abort and spawn so concurrent callers cannot interleave
        // and leave an older generation's task in the slot.
        let mut task = lock(&self.inner.task);

        let step = {
            let mut machine = lock(&self.inner.machine);
            let step = start(&mut *machine);
            self.inner.publish(machine.state());
            step
        };

        if let Some(previous) = task.take() {
            previous.abort();
        }

        let inner = Arc::clone(&self.inner);
        *task = Some(self.inner.runtime.spawn(async move {
            let mut next = Some(step);
            while let Some(step) = next {
                tokio::time::sleep(step.delay).await;
                next = inner.advance(step);
            }
        }));
    }
}

impl ToastDriverInner {
    fn advance(&self, step: Step) -> Option<Step> {
        let mut machine = lock(&self.machine);
        let next = machine.apply(step);
        debug!(action = ?step.action, generation = step.generation, "Toast step");
        self.publish(machine.state());
        next
    }

    fn publish(&self, state: &NotificationState) {
        self.state_tx.send_if_modified(|current| {
            if current == state {
                false
            } else {
                current.clone_from(state);
                true
            }
        });
    }
}

impl Notifier for ToastDriver {
    fn notify(&self, kind: NotificationKind, message: Option<String>) {
        self.trigger(kind, message);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Guarded values are replaced whole on every update; a poisoned lock
    // still holds a consistent value.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
