//! Settings assembly.
//!
//! Builds the [`Settings`] passed into the pipeline from three layers,
//! weakest first: the JSON config file (`~/.reposnap.json` unless
//! overridden), then the environment, then command-line flags.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use reposnap_core::Settings;

use crate::Cli;

/// Config file name searched in the home directory.
const CONFIG_FILE_NAME: &str = ".reposnap.json";

/// Loads the effective settings for this invocation.
pub fn load(cli: &Cli) -> Result<Settings> {
    let mut settings = load_file(cli.config.as_deref())?;
    apply_env(&mut settings, |name| std::env::var(name).ok());
    apply_flags(&mut settings, cli);
    Ok(settings)
}

/// Reads the config file, tolerating its absence.
fn load_file(explicit: Option<&str>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => PathBuf::from(path),
        None => match dirs::home_dir() {
            Some(home) => home.join(CONFIG_FILE_NAME),
            None => return Ok(Settings::default()),
        },
    };

    if !path.exists() {
        // Only an explicitly requested file is allowed to be missing loudly.
        if explicit.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(Settings::default());
    }

    debug!(path = %path.display(), "Using config file");
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Overlays environment variables onto the settings.
///
/// The lookup is injected so tests can run without touching the real
/// process environment.
fn apply_env<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup("GITHUB_TOKEN") {
        settings.token = Some(token);
    }
    if let Some(domain) = lookup("GITHUB_BASE_DOMAIN") {
        settings.github_domain = domain;
    }
    if let Some(domain) = lookup("GITHUB_API_DOMAIN") {
        settings.api_domain = domain;
    }
    if let Some(editor) = lookup("EDITOR") {
        settings.editor.get_or_insert(editor);
    }
}

/// Overlays command-line flags onto the settings. Strongest layer.
fn apply_flags(settings: &mut Settings, cli: &Cli) {
    if let Some(token) = &cli.token {
        settings.token = Some(token.clone());
    }
    if cli.branch != "auto" {
        settings.default_ref = Some(cli.branch.clone());
    }
    if cli.editor != "auto" {
        settings.editor = Some(cli.editor.clone());
    }
    if cli.wait {
        settings.wait = true;
    }
}
