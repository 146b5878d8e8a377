//! Collaborators used by the `intake` binary.
//!
//! Accounts are appended to a JSON Lines file under `$INTAKE_HOME`. The
//! OAuth flow only hands out a preconfigured authorization URL; whatever
//! serves that URL delivers credentials through the event bus.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use intake_core::accounts::{AccountStore, ApiAccountRequest, WebAccountRequest};
use intake_core::oauth::AuthorizationFlow;
use serde::Serialize;

/// File name of the account log under `$INTAKE_HOME`.
pub const ACCOUNTS_FILE: &str = "accounts.jsonl";

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AccountRecord<'a> {
    Web(&'a WebAccountRequest),
    Api(&'a ApiAccountRequest),
}

/// Appends each new account as one JSON line.
#[derive(Debug, Clone)]
pub struct JsonlAccountStore {
    path: PathBuf,
}

impl JsonlAccountStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn append(&self, record: &AccountRecord<'_>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut line = serde_json::to_string(record).context("serialize account")?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

#[async_trait]
impl AccountStore for JsonlAccountStore {
    async fn add_web_account(&self, request: WebAccountRequest) -> Result<()> {
        self.append(&AccountRecord::Web(&request))?;
        tracing::info!(email = %request.email, "web account stored");
        Ok(())
    }

    async fn add_api_account(&self, request: ApiAccountRequest) -> Result<()> {
        self.append(&AccountRecord::Api(&request))?;
        tracing::info!(email = %request.email, "API account stored");
        Ok(())
    }
}

/// Returns a fixed authorization URL, if one was configured.
#[derive(Debug, Clone, Default)]
pub struct StaticUrlFlow {
    url: Option<String>,
}

impl StaticUrlFlow {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }
}

#[async_trait]
impl AuthorizationFlow for StaticUrlFlow {
    async fn authorization_url(&self) -> Result<String> {
        self.url
            .clone()
            .context("No authorization URL configured; pass --auth-url or set INTAKE_AUTH_URL")
    }
}
