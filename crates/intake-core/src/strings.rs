//! Localized dialog strings.
//!
//! The English catalog is embedded at build time. Lookups use dotted keys
//! such as `accounts.add.openai.title` and fall back to the key itself.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

const EN_CATALOG: &str = include_str!("../strings/en.toml");

/// String catalog with optional per-key overrides.
#[derive(Debug, Clone)]
pub struct Strings {
    entries: BTreeMap<String, String>,
}

impl Default for Strings {
    fn default() -> Self {
        Self::new()
    }
}

impl Strings {
    /// Loads the embedded English catalog.
    pub fn new() -> Self {
        let entries = parse_catalog(EN_CATALOG).unwrap_or_else(|err| {
            tracing::error!("Embedded string catalog is invalid: {err:#}");
            BTreeMap::new()
        });
        Self { entries }
    }

    /// Parses a catalog from TOML source.
    ///
    /// # Errors
    /// Returns an error if the source is not valid TOML.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(Self {
            entries: parse_catalog(source)?,
        })
    }

    /// Replaces individual entries, typically from the `[strings]` config section.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }

    /// Returns the string for `key`, or the key itself when missing.
    pub fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Like [`Strings::t`], replacing `{name}` placeholders with `args`.
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

fn parse_catalog(source: &str) -> Result<BTreeMap<String, String>> {
    let table: toml::Table = toml::from_str(source).context("Failed to parse string catalog")?;
    let mut entries = BTreeMap::new();
    flatten("", &table, &mut entries);
    Ok(entries)
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
