//! Dialog reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::common::TaskKind;
use crate::common::text::clean_paste;
use crate::dialog::{DialogOutcome, FormFields, oauth, submit};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::AccountSaved(result) => submit::handle_submit_result(app, result),
        UiEvent::AuthorizationUrl(result) => oauth::handle_authorization_url(app, result),
        UiEvent::BrowserOpened(result) => oauth::handle_browser_opened(app, result),
        UiEvent::OAuthCompleted(result) => oauth::handle_oauth_completed(app, result),
        // Timers only mean something through the task that started them.
        UiEvent::TimerElapsed => vec![],
        UiEvent::TaskCompleted { kind, completed } => {
            if !app.tasks.state_mut(kind).finish_if_active(completed.id) {
                tracing::trace!(?kind, "dropping stale task result");
                return vec![];
            }
            match (kind, *completed.result) {
                (TaskKind::AutoClose, UiEvent::TimerElapsed) => close(app, DialogOutcome::Saved),
                (TaskKind::StatusClear, UiEvent::TimerElapsed) => oauth::handle_status_clear(app),
                (_, result) => update(app, result),
            }
        }
    }
}

/// Shows the dialog with `initial` values.
///
/// Anything still pending from an earlier session is cancelled first.
pub fn open(app: &mut AppState, initial: FormFields) -> Vec<UiEffect> {
    let effects = app.cancel_tasks(&TaskKind::CANCELABLE);
    app.tasks.submit.clear();
    app.dialog.reset(initial, app.settings.default_tab);
    tracing::debug!(tab = ?app.dialog.tab, "dialog opened");
    effects
}

/// Hides the dialog and tears down every pending task.
///
/// An account store call in flight is not aborted; its result is ignored.
/// Once a save has succeeded the outcome is `Saved`, however the dialog is
/// dismissed.
pub fn close(app: &mut AppState, outcome: DialogOutcome) -> Vec<UiEffect> {
    if !app.dialog.is_open() {
        return vec![];
    }
    let outcome = if app.tasks.auto_close.is_running() {
        DialogOutcome::Saved
    } else {
        outcome
    };
    let effects = app.cancel_tasks(&TaskKind::CANCELABLE);
    app.tasks.submit.clear();
    app.dialog.hide(outcome);
    tracing::info!(?outcome, "dialog closed");
    effects
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    if !app.dialog.is_open() {
        return vec![];
    }
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Paste(text) => {
            app.dialog.insert_str(&clean_paste(&text));
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.kind == KeyEventKind::Release {
        return vec![];
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    // AltGr arrives as Ctrl+Alt on some terminals.
    let shortcut = ctrl && !alt;
    let text_input = ctrl == alt;

    match key.code {
        KeyCode::Char('c') if shortcut => close(app, DialogOutcome::Cancelled),
        KeyCode::Esc => {
            if app.dialog.can_cancel() {
                close(app, DialogOutcome::Cancelled)
            } else {
                vec![]
            }
        }
        KeyCode::Enter => submit::submit(app),
        KeyCode::Char('l') if shortcut => oauth::start_login(app),
        KeyCode::Char('t') if shortcut => {
            app.dialog.toggle_tab();
            vec![]
        }
        KeyCode::Char('u') if shortcut => {
            app.dialog.clear_focused();
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            app.dialog.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.dialog.focus_prev();
            vec![]
        }
        KeyCode::Backspace => {
            app.dialog.backspace();
            vec![]
        }
        KeyCode::Char(c) if text_input => {
            app.dialog.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}
