//! Submission handler.
//!
//! Validates the form for the active tab and hands it to the account store.
//! A successful save closes the dialog after `DialogSettings::auto_close`.

use intake_core::config::AccountTab;
use intake_core::error::IntakeError;

use super::state::Status;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::AppState;

/// Validates and submits the form.
///
/// Ignored while a submission or login is in flight, or after a save.
pub fn submit(app: &mut AppState) -> Vec<UiEffect> {
    if !app.dialog.is_open() || !app.dialog.can_submit() {
        return vec![];
    }

    if let Err(err) = app.dialog.validate() {
        tracing::debug!(%err, "submission rejected");
        let message = app.strings.t(err.message_key());
        app.dialog.set_status(Status::Error, message);
        return vec![];
    }

    app.dialog
        .set_status(Status::Loading, app.strings.t("common.loading"));
    let task = app.begin_task(TaskKind::Submit);

    let effect = match app.dialog.tab {
        AccountTab::Web => {
            let request = app.dialog.web_request();
            tracing::info!(
                email = %request.email,
                session_token_source = ?request.session_token_source,
                "adding web account"
            );
            UiEffect::AddWebAccount { task, request }
        }
        AccountTab::Api => {
            let request = app.dialog.api_request();
            tracing::info!(label = %request.email, "adding API account");
            UiEffect::AddApiAccount { task, request }
        }
    };
    vec![effect]
}

/// Applies the account store's answer.
pub fn handle_submit_result(app: &mut AppState, result: Result<(), IntakeError>) -> Vec<UiEffect> {
    match result {
        Ok(()) => {
            tracing::info!("account stored");
            app.dialog
                .set_status(Status::Success, app.strings.t("common.create_success"));
            let (task, cancel) = app.begin_cancelable_task(TaskKind::AutoClose);
            vec![UiEffect::StartTimer {
                kind: TaskKind::AutoClose,
                task,
                delay: app.settings.auto_close,
                cancel,
            }]
        }
        Err(err) => {
            tracing::warn!("account store rejected submission: {err}");
            app.dialog.set_status(Status::Error, err.to_string());
            vec![]
        }
    }
}
