//! Add-account command handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use intake_core::Services;
use intake_core::browser::SystemBrowser;
use intake_core::config::{Config, paths};
use intake_core::events::LocalEventBus;
use intake_core::logging;
use intake_tui::{DialogOutcome, FormFields};

use crate::cli::AddArgs;
use crate::services::{ACCOUNTS_FILE, JsonlAccountStore, StaticUrlFlow};

pub fn run(config: &Config, args: &AddArgs) -> Result<()> {
    let _log_guard = logging::init_logging(&config.logging).context("init logging")?;

    let mut config = config.clone();
    if let Some(tab) = args.tab {
        config.dialog.default_tab = tab.into();
    }

    // one tokio runtime for the collaborator tasks; the dialog loop blocks this thread
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    let _enter = rt.enter();

    let accounts_path = paths::intake_home().join(ACCOUNTS_FILE);
    let services = Services {
        accounts: Arc::new(JsonlAccountStore::new(accounts_path.clone())),
        oauth: Arc::new(StaticUrlFlow::new(args.auth_url.clone())),
        browser: Arc::new(SystemBrowser),
        events: Arc::new(LocalEventBus::new()),
    };
    let initial = FormFields {
        email: args.email.clone().unwrap_or_default(),
        ..FormFields::default()
    };

    match intake_tui::run_add_account_dialog(&config, services, initial)? {
        DialogOutcome::Saved => eprintln!("Account saved to {}", accounts_path.display()),
        DialogOutcome::Cancelled => eprintln!("No account added."),
    }
    Ok(())
}
