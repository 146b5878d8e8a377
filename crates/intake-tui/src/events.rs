//! UI event types.
//!
//! All inputs (terminal, async results, timers) are converted to `UiEvent`
//! before being processed by the reducer.
//!
//! Async results always arrive wrapped in `UiEvent::TaskCompleted`, so the
//! reducer can drop results of tasks that are no longer active.

use crossterm::event::Event as CrosstermEvent;
use intake_core::error::IntakeError;
use intake_core::oauth::OAuthSuccessPayload;

use crate::common::{TaskCompleted, TaskKind};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (spinner animation).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    /// Account store call finished.
    AccountSaved(Result<(), IntakeError>),

    /// Authorization URL request finished.
    AuthorizationUrl(Result<String, IntakeError>),

    /// Browser launch finished.
    BrowserOpened(Result<(), IntakeError>),

    /// The OAuth completion event arrived (or the listener failed).
    OAuthCompleted(Result<OAuthSuccessPayload, IntakeError>),

    /// A delay started with `UiEffect::StartTimer` elapsed.
    TimerElapsed,

    /// Task lifecycle: a spawned task finished (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
