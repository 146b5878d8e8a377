//! External browser launching.

use anyhow::{Context, Result};
use async_trait::async_trait;
use url::Url;

/// Opens URLs outside the application.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Opens `url` in the user's browser.
    ///
    /// # Errors
    /// Returns an error if no browser could be launched.
    async fn open(&self, url: &Url) -> Result<()>;
}

/// Launches the platform's default browser via the `open` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

#[async_trait]
impl Browser for SystemBrowser {
    async fn open(&self, url: &Url) -> Result<()> {
        let target = url.to_string();
        tokio::task::spawn_blocking(move || open::that(&target))
            .await
            .context("Browser launch task failed")?
            .with_context(|| format!("Failed to open {url}"))
    }
}
