//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! ## Task Lifecycle
//!
//! The reducer allocates the `TaskId` (and the `CancellationToken` for
//! cancelable work) and records it as active before returning the effect.
//! The runtime only spawns; results come back as `UiEvent::TaskCompleted`.
//!
//! ## Cancellation Effects
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`.
//! The runtime executes these by calling `token.cancel()` on the provided token.

use std::time::Duration;

use intake_core::accounts::{ApiAccountRequest, WebAccountRequest};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::common::{TaskId, TaskKind};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Store a web-session account.
    AddWebAccount {
        task: TaskId,
        request: WebAccountRequest,
    },

    /// Store an API-key account.
    AddApiAccount {
        task: TaskId,
        request: ApiAccountRequest,
    },

    /// Register the one-shot OAuth listener and wait for its payload.
    SubscribeOAuth {
        task: TaskId,
        event: String,
        cancel: CancellationToken,
    },

    /// Ask the authorization flow for a login URL.
    RequestAuthorizationUrl {
        task: TaskId,
        cancel: CancellationToken,
    },

    /// Open a URL in the system browser.
    OpenBrowser {
        task: TaskId,
        url: Url,
        cancel: CancellationToken,
    },

    /// Complete `kind` after `delay`.
    StartTimer {
        kind: TaskKind,
        task: TaskId,
        delay: Duration,
        cancel: CancellationToken,
    },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
