use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Account store call.
    Submit,
    /// Wait for the OAuth completion event.
    OAuthListen,
    /// Authorization URL request.
    OAuthUrl,
    /// Browser launch.
    Browser,
    /// Delay before closing after a save.
    AutoClose,
    /// Delay before clearing the autofill confirmation.
    StatusClear,
}

impl TaskKind {
    /// Kinds that carry a cancellation token; all are torn down on close.
    pub const CANCELABLE: [TaskKind; 5] = [
        TaskKind::OAuthListen,
        TaskKind::OAuthUrl,
        TaskKind::Browser,
        TaskKind::AutoClose,
        TaskKind::StatusClear,
    ];
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, id: TaskId, cancel: Option<CancellationToken>) {
        self.active = Some(id);
        self.cancel = cancel;
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    /// Forgets the active task and hands back its token, if any.
    pub fn take_cancel(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub submit: TaskState,
    pub oauth_listen: TaskState,
    pub oauth_url: TaskState,
    pub browser: TaskState,
    pub auto_close: TaskState,
    pub status_clear: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Submit => &self.submit,
            TaskKind::OAuthListen => &self.oauth_listen,
            TaskKind::OAuthUrl => &self.oauth_url,
            TaskKind::Browser => &self.browser,
            TaskKind::AutoClose => &self.auto_close,
            TaskKind::StatusClear => &self.status_clear,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Submit => &mut self.submit,
            TaskKind::OAuthListen => &mut self.oauth_listen,
            TaskKind::OAuthUrl => &mut self.oauth_url,
            TaskKind::Browser => &mut self.browser,
            TaskKind::AutoClose => &mut self.auto_close,
            TaskKind::StatusClear => &mut self.status_clear,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.submit.is_running()
            || self.oauth_listen.is_running()
            || self.oauth_url.is_running()
            || self.browser.is_running()
            || self.auto_close.is_running()
            || self.status_clear.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_if_active_ignores_stale_ids() {
        let mut seq = TaskSeq::default();
        let first = seq.next_id();
        let second = seq.next_id();

        let mut state = TaskState::default();
        state.on_started(first, None);
        state.on_started(second, None);

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_take_cancel_clears_state() {
        let mut seq = TaskSeq::default();
        let token = CancellationToken::new();
        let mut tasks = Tasks::default();
        tasks
            .state_mut(TaskKind::StatusClear)
            .on_started(seq.next_id(), Some(token.clone()));
        assert!(tasks.is_any_running());

        let taken = tasks.state_mut(TaskKind::StatusClear).take_cancel();
        assert!(taken.is_some());
        assert!(!tasks.state(TaskKind::StatusClear).is_running());
        assert!(!tasks.is_any_running());
        assert!(!token.is_cancelled());
    }
}
