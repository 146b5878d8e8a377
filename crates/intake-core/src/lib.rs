//! Core types for the account intake dialog.
//!
//! The dialog itself owns no persistence: account storage, the OAuth flow,
//! the browser and event delivery are collaborators behind the traits in
//! this crate. `Services` bundles them for the runtime.

pub mod accounts;
pub mod browser;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod oauth;
pub mod strings;

use std::sync::Arc;

use crate::accounts::AccountStore;
use crate::browser::Browser;
use crate::events::EventBus;
use crate::oauth::AuthorizationFlow;

/// Collaborators the dialog talks to.
#[derive(Clone)]
pub struct Services {
    pub accounts: Arc<dyn AccountStore>,
    pub oauth: Arc<dyn AuthorizationFlow>,
    pub browser: Arc<dyn Browser>,
    pub events: Arc<dyn EventBus>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
