//! Locator path patterns.
//!
//! A pattern describes the shape of a normalized locator path, e.g.
//! `/:owner/:repo/tree/:ref/*`. Segments starting with `:` capture a
//! single path component into a named parameter; a trailing `*` captures
//! the (possibly empty) remainder of the path.
//!
//! The [`PATTERN_TABLE`] pairs each pattern with the [`QueryKind`] it
//! resolves to. Order is load-bearing: the resolver tests patterns top
//! to bottom and the first match wins, which is what disambiguates a
//! pull-request files view from the generic repository catch-all.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::query::QueryKind;

// ============================================================================
// Path Pattern
// ============================================================================

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must equal this component exactly.
    Literal(&'static str),
    /// Captures one component under this name.
    Param(&'static str),
}

/// A compiled path-shape pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    segments: Vec<Segment>,
    /// Whether the pattern ends in `*`, capturing the remainder.
    trailing: bool,
}

/// The captures produced by a successful pattern match.
#[derive(Debug, Clone, Default)]
pub struct PathMatch {
    params: HashMap<&'static str, String>,
    trailing: String,
}

impl PathMatch {
    /// Returns the named parameter, or `""` if it was not captured.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map_or("", String::as_str)
    }

    /// Returns the remainder captured by a trailing `*`, or `""`.
    pub fn trailing(&self) -> &str {
        &self.trailing
    }
}

impl PathPattern {
    /// Compiles a pattern string like `/:owner/:repo/tree/:ref/*`.
    ///
    /// Only used with the static pattern strings below; a malformed
    /// pattern is a programmer error.
    fn compile(pattern: &'static str) -> Self {
        let mut segments = Vec::new();
        let mut trailing = false;

        for part in pattern.split('/').filter(|p| !p.is_empty()) {
            if part == "*" {
                trailing = true;
                break;
            }
            if let Some(name) = part.strip_prefix(':') {
                segments.push(Segment::Param(name));
            } else {
                segments.push(Segment::Literal(part));
            }
        }

        Self { segments, trailing }
    }

    /// Tests the pattern against a normalized path (leading `/`).
    ///
    /// Returns the captures on a match, `None` otherwise. A trailing `*`
    /// accepts an empty remainder.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        let mut components = path.trim_start_matches('/').split('/');
        let mut params = HashMap::new();

        for segment in &self.segments {
            let component = components.next()?;
            if component.is_empty() {
                return None;
            }
            match segment {
                Segment::Literal(lit) => {
                    if component != *lit {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(*name, component.to_string());
                }
            }
        }

        let rest: Vec<&str> = components.collect();
        if self.trailing {
            Some(PathMatch {
                params,
                trailing: rest.join("/"),
            })
        } else if rest.is_empty() || rest == [""] {
            // A lone trailing slash is tolerated on exact patterns.
            Some(PathMatch {
                params,
                trailing: String::new(),
            })
        } else {
            None
        }
    }
}

// ============================================================================
// Pattern Table
// ============================================================================

/// The ordered locator grammar. First match wins.
pub static PATTERN_TABLE: LazyLock<Vec<(PathPattern, QueryKind)>> = LazyLock::new(|| {
    vec![
        (PathPattern::compile("/:owner/:repo"), QueryKind::Root),
        (PathPattern::compile("/:query"), QueryKind::Search),
        (PathPattern::compile("/:owner/:repo/tree/:ref"), QueryKind::Root),
        (PathPattern::compile("/:owner/:repo/tree/:ref/*"), QueryKind::File),
        (PathPattern::compile("/:owner/:repo/blob/:ref/*"), QueryKind::File),
        (
            PathPattern::compile("/:owner/:repo/pull/:pull_request_id/files"),
            QueryKind::PullRequest,
        ),
        (
            PathPattern::compile("/:owner/:repo/pull/:pull_request_id/*"),
            QueryKind::PullRequest,
        ),
        (PathPattern::compile("/:owner/:repo/*"), QueryKind::Root),
    ]
});

/// Tests `path` against the table in order and returns the first match.
pub fn find_match(path: &str) -> Option<(PathMatch, QueryKind)> {
    PATTERN_TABLE
        .iter()
        .find_map(|(pattern, kind)| pattern.matches(path).map(|m| (m, *kind)))
}
