//! Effect handlers.
//!
//! Pure async functions that talk to a collaborator and return the `UiEvent`
//! describing the outcome. They never touch state; the runner spawns them.

use std::sync::Arc;
use std::time::Duration;

use intake_core::accounts::{AccountStore, ApiAccountRequest, WebAccountRequest};
use intake_core::browser::Browser;
use intake_core::error::IntakeError;
use intake_core::events::OnceSubscription;
use intake_core::oauth::{AuthorizationFlow, OAuthSuccessPayload};
use url::Url;

use crate::events::UiEvent;

pub async fn add_web_account(store: Arc<dyn AccountStore>, request: WebAccountRequest) -> UiEvent {
    let result = store
        .add_web_account(request)
        .await
        .map_err(|e| IntakeError::external(&e));
    UiEvent::AccountSaved(result)
}

pub async fn add_api_account(store: Arc<dyn AccountStore>, request: ApiAccountRequest) -> UiEvent {
    let result = store
        .add_api_account(request)
        .await
        .map_err(|e| IntakeError::external(&e));
    UiEvent::AccountSaved(result)
}

pub async fn authorization_url(flow: Arc<dyn AuthorizationFlow>) -> UiEvent {
    let result = flow
        .authorization_url()
        .await
        .map_err(|e| IntakeError::external(&e));
    UiEvent::AuthorizationUrl(result)
}

pub async fn open_browser(browser: Arc<dyn Browser>, url: Url) -> UiEvent {
    let result = browser
        .open(&url)
        .await
        .map_err(|e| IntakeError::external(&e));
    UiEvent::BrowserOpened(result)
}

/// Waits for the OAuth completion payload and decodes it.
pub async fn await_oauth(subscription: OnceSubscription) -> UiEvent {
    let result = match subscription.recv().await {
        Ok(value) => OAuthSuccessPayload::from_value(value),
        Err(closed) => Err(IntakeError::Subscription(closed.to_string())),
    };
    UiEvent::OAuthCompleted(result)
}

pub async fn timer(delay: Duration) -> UiEvent {
    tokio::time::sleep(delay).await;
    UiEvent::TimerElapsed
}

#[cfg(test)]
mod tests {
    use intake_core::events::{EventBus, LocalEventBus};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_await_oauth_decodes_payload() {
        let bus = LocalEventBus::new();
        let sub = bus.subscribe_once("login");
        bus.emit(
            "login",
            json!({"email": "x@y.com", "access_token": "tok", "refresh_token": "ref"}),
        );

        match await_oauth(sub).await {
            UiEvent::OAuthCompleted(Ok(payload)) => {
                assert_eq!(payload.email, "x@y.com");
                assert_eq!(payload.refresh_token, "ref");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_await_oauth_rejects_malformed_payload() {
        let bus = LocalEventBus::new();
        let sub = bus.subscribe_once("login");
        bus.emit("login", json!("not an object"));

        assert!(matches!(
            await_oauth(sub).await,
            UiEvent::OAuthCompleted(Err(IntakeError::Subscription(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_waits_for_delay() {
        let start = tokio::time::Instant::now();
        assert!(matches!(
            timer(Duration::from_millis(1500)).await,
            UiEvent::TimerElapsed
        ));
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
