// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # reposnap Core
//!
//! Core types and pure logic for reposnap: the locator grammar, the
//! query resolver, and the configuration surface shared by the other
//! crates.
//!
//! ## Key Types
//!
//! - [`Query`] - A resolved locator: what the user asked for
//! - [`QueryKind`] - The classified intent (clone, repository, file,
//!   pull request, search)
//! - [`QueryParams`] - Owner/repo/ref/path fields extracted from the
//!   locator
//! - [`Settings`] - Configuration consumed by the resolver and pipeline
//!
//! ## Resolution
//!
//! [`resolve`] normalizes an input string and matches it against the
//! ordered [`patterns::PATTERN_TABLE`]; the first matching pattern
//! decides the intent. Resolution never fails - unmatched input becomes
//! a raw clone-URL candidate.
//!
//! ```
//! use reposnap_core::{resolve, QueryKind, Settings};
//!
//! let settings = Settings::default();
//! let query = resolve("https://github.com/octocat/Hello-World", &settings);
//! assert_eq!(query.kind, QueryKind::Root);
//! assert_eq!(query.params.owner, "octocat");
//! ```

pub mod patterns;
pub mod query;
pub mod resolver;
pub mod settings;

pub use query::{DEFAULT_REF, Query, QueryKind, QueryParams};
pub use resolver::{URI_SCHEME, resolve};
pub use settings::{DEFAULT_API_DOMAIN, DEFAULT_GITHUB_DOMAIN, Settings};
