//! Clock-free toast state machine.
//!
//! The machine never sleeps. [`ToastMachine::trigger`] and
//! [`ToastMachine::dismiss`] return the first [`Step`] to schedule and
//! [`ToastMachine::apply`] returns the one after it. Every step carries the
//! generation that scheduled it; starting a new sequence bumps the
//! generation, so steps left over from an older sequence are ignored.
//!
//! ```text
//! trigger ─100ms─▶ Show ─300ms─▶ Expand ─1000ms─▶ ShowTimer ─4000ms─▶ Collapse ─300ms─▶ Hide
//! dismiss ─(now)─▶ Collapse ─300ms─▶ Hide
//! ```

use std::time::Duration;

use serde::Serialize;
use zapkart_core::NotificationKind;

/// Delays between toast transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimings {
    /// Trigger to icon appearing.
    pub initial_delay: Duration,
    /// Icon to expanded message.
    pub expand_delay: Duration,
    /// Expanded message to progress bar start.
    pub timer_start_delay: Duration,
    /// Progress bar running time before collapsing.
    pub visible_duration: Duration,
    /// Collapse to fully hidden.
    pub collapse_delay: Duration,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            expand_delay: Duration::from_millis(300),
            timer_start_delay: Duration::from_millis(1000),
            visible_duration: Duration::from_millis(4000),
            collapse_delay: Duration::from_millis(300),
        }
    }
}

impl ToastTimings {
    /// Time from trigger until the toast is hidden again.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.initial_delay
            + self.expand_delay
            + self.timer_start_delay
            + self.visible_duration
            + self.collapse_delay
    }
}

/// What a view needs to render the toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: Option<String>,
    pub visible: bool,
    pub expanded: bool,
    pub timer_visible: bool,
}

impl NotificationState {
    /// Hidden, collapsed and without a running timer.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        !self.visible && !self.expanded && !self.timer_visible
    }
}

/// A transition of the toast sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Step 1: icon appears.
    Show,
    /// Step 2: message expands.
    Expand,
    /// Step 3: progress bar starts.
    ShowTimer,
    /// Step 4: progress bar ends and the message collapses.
    Collapse,
    /// Step 5: toast disappears.
    Hide,
}

/// A transition scheduled to run `delay` after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub generation: u64,
    pub action: StepAction,
    pub delay: Duration,
}

/// Single-slot toast state machine.
///
/// Holds one visible notification. Every `trigger` bumps the generation, so
/// timer steps scheduled for an earlier toast are ignored when they arrive.
#[derive(Debug, Clone, Default)]
pub struct ToastMachine {
    state: NotificationState,
    generation: u64,
    timings: ToastTimings,
}

impl ToastMachine {
    /// A hidden machine at generation 0.
    #[must_use]
    pub fn new(timings: ToastTimings) -> Self {
        Self {
            state: NotificationState::default(),
            generation: 0,
            timings,
        }
    }

    /// Current visible state.
    #[must_use]
    pub const fn state(&self) -> &NotificationState {
        &self.state
    }

    /// Generation of the live sequence. Steps from other generations are stale.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Delays between the steps of a sequence.
    #[must_use]
    pub const fn timings(&self) -> &ToastTimings {
        &self.timings
    }

    /// Start a new sequence, replacing whatever was in flight.
    ///
    /// The state is reset to hidden with the new kind and message; an absent
    /// or empty message is replaced by the kind's default.
    pub fn trigger(&mut self, kind: NotificationKind, message: Option<String>) -> Step {
        self.generation += 1;
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| kind.default_message().to_string());

        self.state = NotificationState {
            kind,
            message: Some(message),
            ..NotificationState::default()
        };

        self.step(StepAction::Show, self.timings.initial_delay)
    }

    /// Collapse immediately and schedule the final hide.
    pub fn dismiss(&mut self) -> Step {
        self.generation += 1;
        self.state.timer_visible = false;
        self.state.expanded = false;

        self.step(StepAction::Hide, self.timings.collapse_delay)
    }

    /// Apply a due step and return the next one to schedule.
    ///
    /// Returns `None` when the step is stale or ends the sequence; a stale
    /// step leaves the state untouched.
    pub fn apply(&mut self, step: Step) -> Option<Step> {
        if step.generation != self.generation {
            return None;
        }

        match step.action {
            StepAction::Show => {
                self.state.visible = true;
                Some(self.step(StepAction::Expand, self.timings.expand_delay))
            }
            StepAction::Expand => {
                self.state.expanded = true;
                Some(self.step(StepAction::ShowTimer, self.timings.timer_start_delay))
            }
            StepAction::ShowTimer => {
                self.state.timer_visible = true;
                Some(self.step(StepAction::Collapse, self.timings.visible_duration))
            }
            StepAction::Collapse => {
                self.state.timer_visible = false;
                self.state.expanded = false;
                Some(self.step(StepAction::Hide, self.timings.collapse_delay))
            }
            StepAction::Hide => {
                self.state.visible = false;
                None
            }
        }
    }

    const fn step(&self, action: StepAction, delay: Duration) -> Step {
        Step {
            generation: self.generation,
            action,
            delay,
        }
    }
}
