//! Resolver configuration
//!
//! Two product-owner policies the storefront has never pinned down are made
//! explicit switches here instead of being hardcoded in the resolver. Defaults
//! reproduce the storefront's long-standing behavior.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter, EnumString};

/// Environment variable consulted when no `--config` path is given
pub const CONFIG_ENV_VAR: &str = "COMBO_RESOLVER_CONFIG";

/// What availability means for a product with no registered combos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmptyComboPolicy {
    /// Any option is selectable once earlier types are chosen
    #[default]
    Open,
    /// Nothing is selectable until the admin registers combos
    Closed,
}

/// How pricing treats several combos registered for one option set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DuplicateComboPolicy {
    /// First combo in list order wins
    #[default]
    FirstMatch,
    /// Ambiguous lookups fail with `DuplicateCombo`
    Reject,
}

/// Resolver configuration that can be saved/loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub empty_combos: EmptyComboPolicy,
    pub duplicate_combos: DuplicateComboPolicy,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read resolver config from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse resolver config JSON")?;

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize resolver config to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write resolver config to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Resolve the config for a run: explicit path first, then
    /// `COMBO_RESOLVER_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => {
                tracing::debug!("loading resolver config from {:?}", path);
                Self::load_from_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}
