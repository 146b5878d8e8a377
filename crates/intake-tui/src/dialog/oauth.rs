//! OAuth bridge.
//!
//! Subscribes to the completion event first, then asks the flow for a login
//! URL and opens it. The event payload autofills the web form; the
//! confirmation clears after `DialogSettings::status_clear`.

use intake_core::error::IntakeError;
use intake_core::oauth::{OAuthSuccessPayload, parse_authorization_url};

use super::state::Status;
use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::AppState;

/// Tasks belonging to one login attempt, including its confirmation timer.
const LOGIN_TASKS: [TaskKind; 4] = [
    TaskKind::OAuthListen,
    TaskKind::OAuthUrl,
    TaskKind::Browser,
    TaskKind::StatusClear,
];

/// Starts a browser login. Web tab only; ignored while loading or closing.
pub fn start_login(app: &mut AppState) -> Vec<UiEffect> {
    if !app.dialog.is_open() || !app.dialog.can_start_login() || app.tasks.auto_close.is_running()
    {
        return vec![];
    }

    let mut effects = app.cancel_tasks(&LOGIN_TASKS);
    app.dialog.set_status(
        Status::Loading,
        app.strings.t("accounts.add.openai.oauth.generating_url"),
    );

    // Listener goes first so a fast flow cannot complete unobserved.
    let (task, cancel) = app.begin_cancelable_task(TaskKind::OAuthListen);
    effects.push(UiEffect::SubscribeOAuth {
        task,
        event: app.settings.success_event.clone(),
        cancel,
    });

    let (task, cancel) = app.begin_cancelable_task(TaskKind::OAuthUrl);
    effects.push(UiEffect::RequestAuthorizationUrl { task, cancel });

    tracing::info!(event = %app.settings.success_event, "starting OAuth login");
    effects
}

pub fn handle_authorization_url(
    app: &mut AppState,
    result: Result<String, IntakeError>,
) -> Vec<UiEffect> {
    let raw = match result {
        Ok(raw) => raw,
        Err(err) => return fail(app, &err),
    };

    match parse_authorization_url(&raw) {
        Ok(url) => {
            tracing::debug!(host = url.host_str().unwrap_or_default(), "opening browser");
            app.dialog.message = app.strings.t("accounts.add.openai.oauth.opening_browser");
            let (task, cancel) = app.begin_cancelable_task(TaskKind::Browser);
            vec![UiEffect::OpenBrowser { task, url, cancel }]
        }
        Err(err) => fail(app, &IntakeError::external(&err)),
    }
}

pub fn handle_browser_opened(
    app: &mut AppState,
    result: Result<(), IntakeError>,
) -> Vec<UiEffect> {
    match result {
        Ok(()) => {
            tracing::debug!("browser opened, waiting for OAuth completion");
            vec![]
        }
        Err(err) => fail(app, &err),
    }
}

pub fn handle_oauth_completed(
    app: &mut AppState,
    result: Result<OAuthSuccessPayload, IntakeError>,
) -> Vec<UiEffect> {
    let payload = match result {
        Ok(payload) => payload,
        Err(err) => return fail(app, &err),
    };

    tracing::info!(email = %payload.email, "OAuth credentials received");
    let mut effects = app.cancel_tasks(&[
        TaskKind::OAuthUrl,
        TaskKind::Browser,
        TaskKind::StatusClear,
    ]);
    app.dialog.autofill(payload);
    app.dialog.set_status(
        Status::Success,
        app.strings.t("accounts.add.openai.oauth.success"),
    );

    let (task, cancel) = app.begin_cancelable_task(TaskKind::StatusClear);
    effects.push(UiEffect::StartTimer {
        kind: TaskKind::StatusClear,
        task,
        delay: app.settings.status_clear,
        cancel,
    });
    effects
}

/// Drops the autofill confirmation, keeping the filled fields.
pub fn handle_status_clear(app: &mut AppState) -> Vec<UiEffect> {
    if app.dialog.status == Status::Success {
        app.dialog.clear_status();
    }
    vec![]
}

fn fail(app: &mut AppState, err: &IntakeError) -> Vec<UiEffect> {
    tracing::warn!("OAuth login failed: {err}");
    let effects = app.cancel_tasks(&[
        TaskKind::OAuthListen,
        TaskKind::OAuthUrl,
        TaskKind::Browser,
    ]);
    let detail = err.to_string();
    let message = app
        .strings
        .t_with("accounts.add.openai.oauth.error", &[("error", detail.as_str())]);
    app.dialog.set_status(Status::Error, message);
    effects
}

#[cfg(test)]
mod tests {
    use intake_core::accounts::SessionTokenSource;
    use intake_core::config::{AccountTab, Config};

    use super::*;
    use crate::dialog::FormFields;

    fn open_app(tab: AccountTab) -> AppState {
        let mut app = AppState::new(&Config::default());
        app.dialog.reset(FormFields::default(), tab);
        app
    }

    fn payload() -> OAuthSuccessPayload {
        OAuthSuccessPayload {
            email: "x@y.com".to_string(),
            access_token: "tok".to_string(),
            refresh_token: "ref".to_string(),
        }
    }

    #[test]
    fn test_start_login_subscribes_before_requesting_url() {
        let mut app = open_app(AccountTab::Web);
        let effects = start_login(&mut app);

        assert!(matches!(
            effects.as_slice(),
            [
                UiEffect::SubscribeOAuth { event, .. },
                UiEffect::RequestAuthorizationUrl { .. },
            ] if event == "openai-oauth-success"
        ));
        assert_eq!(app.dialog.status, Status::Loading);
        assert_eq!(app.dialog.message, "Generating Auth URL...");
        assert!(app.tasks.oauth_listen.is_running());
        assert!(app.tasks.oauth_url.is_running());
    }

    #[test]
    fn test_start_login_only_in_web_tab_and_not_while_loading() {
        let mut app = open_app(AccountTab::Api);
        assert!(start_login(&mut app).is_empty());
        assert_eq!(app.dialog.status, Status::Idle);

        let mut app = open_app(AccountTab::Web);
        assert_eq!(start_login(&mut app).len(), 2);
        assert!(start_login(&mut app).is_empty());
    }

    #[test]
    fn test_url_ready_opens_browser() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);

        let effects = handle_authorization_url(
            &mut app,
            Ok("https://auth.openai.com/oauth/authorize?state=abc".to_string()),
        );
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::OpenBrowser { url, .. }] if url.host_str() == Some("auth.openai.com")
        ));
        assert_eq!(app.dialog.status, Status::Loading);
        assert_eq!(app.dialog.message, "Opening browser for login...");
    }

    #[test]
    fn test_url_failure_cancels_subscription() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);
        app.tasks.oauth_url.clear();

        let effects = handle_authorization_url(
            &mut app,
            Err(IntakeError::External("port 1455 in use".to_string())),
        );
        assert!(effects.iter().any(|e| matches!(
            e,
            UiEffect::CancelTask {
                kind: TaskKind::OAuthListen,
                token: Some(_)
            }
        )));
        assert_eq!(app.dialog.status, Status::Error);
        assert_eq!(app.dialog.message, "OAuth Error: port 1455 in use");
        assert!(!app.tasks.oauth_listen.is_running());
    }

    #[test]
    fn test_invalid_url_is_an_oauth_error() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);

        handle_authorization_url(&mut app, Ok("javascript:alert(1)".to_string()));
        assert_eq!(app.dialog.status, Status::Error);
        assert!(app.dialog.message.starts_with("OAuth Error: "));
    }

    #[test]
    fn test_browser_failure_is_an_oauth_error() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);

        handle_browser_opened(
            &mut app,
            Err(IntakeError::External("no browser found".to_string())),
        );
        assert_eq!(app.dialog.message, "OAuth Error: no browser found");
        assert!(!app.tasks.oauth_listen.is_running());
    }

    #[test]
    fn test_payload_autofills_and_schedules_clear() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);
        app.tasks.oauth_listen.clear();

        let effects = handle_oauth_completed(&mut app, Ok(payload()));

        assert_eq!(app.dialog.fields.email, "x@y.com");
        assert_eq!(app.dialog.fields.access_token, "tok");
        assert_eq!(app.dialog.fields.session_token, "ref");
        assert_eq!(
            app.dialog.session_token_source,
            SessionTokenSource::OAuthRefresh
        );
        assert_eq!(app.dialog.status, Status::Success);
        assert_eq!(
            app.dialog.message,
            "Login successful! Credentials auto-filled."
        );
        // The pending URL request is discarded.
        assert!(effects.iter().any(|e| matches!(
            e,
            UiEffect::CancelTask {
                kind: TaskKind::OAuthUrl,
                ..
            }
        )));
        assert!(effects.iter().any(|e| matches!(
            e,
            UiEffect::StartTimer {
                kind: TaskKind::StatusClear,
                ..
            }
        )));

        handle_status_clear(&mut app);
        assert_eq!(app.dialog.status, Status::Idle);
        assert!(app.dialog.message.is_empty());
        assert_eq!(app.dialog.fields.email, "x@y.com");
    }

    #[test]
    fn test_malformed_payload_is_an_oauth_error() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);

        handle_oauth_completed(
            &mut app,
            Err(IntakeError::Subscription(
                "OAuth payload has no access token".to_string(),
            )),
        );
        assert_eq!(app.dialog.status, Status::Error);
        assert_eq!(
            app.dialog.message,
            "OAuth Error: OAuth payload has no access token"
        );
        assert!(app.dialog.fields.email.is_empty());
    }

    #[test]
    fn test_restart_after_success_cancels_pending_clear() {
        let mut app = open_app(AccountTab::Web);
        start_login(&mut app);
        app.tasks.oauth_listen.clear();
        handle_oauth_completed(&mut app, Ok(payload()));
        assert!(app.tasks.status_clear.is_running());

        let effects = start_login(&mut app);
        assert!(effects.iter().any(|e| matches!(
            e,
            UiEffect::CancelTask {
                kind: TaskKind::StatusClear,
                ..
            }
        )));
        assert_eq!(app.dialog.status, Status::Loading);
    }
}
