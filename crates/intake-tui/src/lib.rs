//! Terminal add-account dialog.
//!
//! The dialog collects web-session or API-key credentials, can autofill them
//! from a browser OAuth login, and hands them to the `AccountStore` from
//! `intake_core::Services`.

pub mod common;
pub mod dialog;
pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::Result;
pub use dialog::{DialogOutcome, FormFields};
use intake_core::Services;
use intake_core::config::Config;
pub use runtime::{DialogRuntime, EffectRunner};

/// Shows the dialog until the user saves an account or cancels.
///
/// Blocks the calling thread; call it from a multi-threaded tokio runtime so
/// spawned collaborator calls keep running.
///
/// # Errors
/// Returns an error if stderr is not a terminal or terminal I/O fails.
pub fn run_add_account_dialog(
    config: &Config,
    services: Services,
    initial: FormFields,
) -> Result<DialogOutcome> {
    if !stderr().is_terminal() {
        anyhow::bail!("The account dialog requires a terminal.");
    }

    let mut runtime = DialogRuntime::new(config, services)?;
    runtime.open(initial);
    let outcome = runtime.run()?;
    tracing::info!(?outcome, "account dialog finished");
    Ok(outcome)
}
