pub mod labels;
pub mod roster;

use std::path::Path;

use anyhow::{bail, Context, Result};

use orgsync_core::{config, Config};

pub const GITHUB_TOKEN_ENV: &str = "ADMIN_GITHUB_TOKEN";
pub const ASANA_TOKEN_ENV: &str = "ADMIN_ASANA_TOKEN";

/// Load `path`, or `~/.orgsync/config.yaml` when no path was given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    tracing::debug!(path = ?path, "loading config");
    let loaded = match path {
        Some(path) => config::load_from(path),
        None => config::load(),
    };
    loaded.context("failed to load config")
}

/// Read a credential from the environment. Unset and empty are both errors.
pub fn token(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("environment variable {var} is not set"),
    }
}
