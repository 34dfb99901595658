//! Pull-based trace capture.
//!
//! A router built with a [`TraceCapture`] records one snapshot per
//! match-resolution pass and the URL of the last finished navigation. This is
//! what a non-interactive caller (server-side rendering, the CLI, tests)
//! inspects instead of a rendered tree.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::pattern::Params;
use crate::router::RouteMatch;

/// One active match as seen by a resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchTrace {
    /// Path as written in the route definition (after optional expansion)
    pub original_path: String,
    /// Joined pattern used for matching
    pub pattern: String,
    /// Consumed path prefix
    pub path: String,
    /// Captured parameters
    pub params: Params,
}

impl From<&RouteMatch> for MatchTrace {
    fn from(m: &RouteMatch) -> Self {
        Self {
            original_path: m.route.original_path().to_string(),
            pattern: m.route.pattern().to_string(),
            path: m.path.clone(),
            params: m.params.clone(),
        }
    }
}

/// Everything captured so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouterOutput {
    /// One entry per resolution pass, oldest first
    pub matches: Vec<Vec<MatchTrace>>,
    /// Rendered URL of the last finished navigation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Shared handle the router writes into and the caller reads from.
#[derive(Debug, Clone, Default)]
pub struct TraceCapture {
    inner: Rc<RefCell<RouterOutput>>,
}

impl TraceCapture {
    /// Empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the captured output.
    #[must_use]
    pub fn snapshot(&self) -> RouterOutput {
        self.inner.borrow().clone()
    }

    /// Most recent resolution pass.
    #[must_use]
    pub fn last_matches(&self) -> Option<Vec<MatchTrace>> {
        self.inner.borrow().matches.last().cloned()
    }

    /// Rendered URL of the last finished navigation.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.inner.borrow().url.clone()
    }

    pub(crate) fn record_matches(&self, matches: &[RouteMatch]) {
        self.inner
            .borrow_mut()
            .matches
            .push(matches.iter().map(MatchTrace::from).collect());
    }

    pub(crate) fn record_url(&self, url: String) {
        self.inner.borrow_mut().url = Some(url);
    }
}
