//! Application state for the dialog runtime.

use std::time::Duration;

use intake_core::config::{AccountTab, Config};
use intake_core::strings::Strings;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind, TaskSeq, Tasks};
use crate::dialog::DialogState;
use crate::effects::UiEffect;

/// Settings resolved from `Config` when the runtime starts.
#[derive(Debug, Clone)]
pub struct DialogSettings {
    pub auto_close: Duration,
    pub status_clear: Duration,
    pub success_event: String,
    pub default_tab: AccountTab,
}

impl DialogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auto_close: config.dialog.auto_close(),
            status_clear: config.dialog.status_clear(),
            success_event: config.oauth.success_event.clone(),
            default_tab: config.dialog.default_tab,
        }
    }
}

/// Everything the reducer owns.
#[derive(Debug)]
pub struct AppState {
    pub dialog: DialogState,
    pub settings: DialogSettings,
    pub strings: Strings,
    pub tasks: Tasks,
    pub task_seq: TaskSeq,
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let settings = DialogSettings::from_config(config);
        Self {
            dialog: DialogState::new(settings.default_tab),
            strings: Strings::new().with_overrides(&config.strings),
            settings,
            tasks: Tasks::default(),
            task_seq: TaskSeq::default(),
            spinner_frame: 0,
        }
    }

    /// Allocates a task id and marks it active for `kind`.
    ///
    /// Any previous task of the same kind becomes stale.
    pub fn begin_task(&mut self, kind: TaskKind) -> TaskId {
        let id = self.task_seq.next_id();
        self.tasks.state_mut(kind).on_started(id, None);
        id
    }

    /// Like [`AppState::begin_task`], with a token the reducer can cancel later.
    pub fn begin_cancelable_task(&mut self, kind: TaskKind) -> (TaskId, CancellationToken) {
        let id = self.task_seq.next_id();
        let cancel = CancellationToken::new();
        self.tasks
            .state_mut(kind)
            .on_started(id, Some(cancel.clone()));
        (id, cancel)
    }

    /// Deactivates `kind` and returns the effect that cancels it, if it was running.
    pub fn cancel_task(&mut self, kind: TaskKind) -> Option<UiEffect> {
        let state = self.tasks.state_mut(kind);
        if !state.is_running() {
            return None;
        }
        let token = state.take_cancel();
        Some(UiEffect::CancelTask { kind, token })
    }

    pub fn cancel_tasks(&mut self, kinds: &[TaskKind]) -> Vec<UiEffect> {
        kinds
            .iter()
            .filter_map(|kind| self.cancel_task(*kind))
            .collect()
    }
}
