//! Configuration surface.
//!
//! [`Settings`] is built once by the binary (config file, environment,
//! flags) and passed by reference into the resolver, locator, and
//! fetcher. Nothing in the core reads ambient process state.

use serde::{Deserialize, Serialize};

/// Default hosting domain.
pub const DEFAULT_GITHUB_DOMAIN: &str = "github.com";

/// Default hosting API domain.
pub const DEFAULT_API_DOMAIN: &str = "api.github.com";

/// Resolved configuration consumed by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Hosting domain stripped from locators (e.g. `github.com`).
    pub github_domain: String,
    /// Hosting API domain used for archive-link lookups.
    pub api_domain: String,
    /// Access token. Sent as a bearer token on API lookups and as a
    /// raw `Authorization` value on archive downloads.
    pub token: Option<String>,
    /// Ref override applied when the locator carries no explicit ref.
    pub default_ref: Option<String>,
    /// Wait for the full download before opening the editor.
    pub wait: bool,
    /// Editor command preference. Consumed by the CLI, not the core.
    pub editor: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_domain: DEFAULT_GITHUB_DOMAIN.to_string(),
            api_domain: DEFAULT_API_DOMAIN.to_string(),
            token: None,
            default_ref: None,
            wait: false,
            editor: None,
        }
    }
}

impl Settings {
    /// Returns the token, treating the empty string as unset.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Returns the ref override, treating `""` and `"auto"` as unset.
    pub fn ref_override(&self) -> Option<&str> {
        self.default_ref
            .as_deref()
            .filter(|r| !r.is_empty() && *r != "auto")
    }
}
