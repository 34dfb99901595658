use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::definition::{DataLoader, Outlet, Preload, RouteDefinition};
use crate::pattern::{Params, PathMatcher};

/// A compiled route: one concrete path alternative of a definition
///
/// Every alternative (and every optional-segment expansion) of one
/// definition becomes its own `Route`, sharing the outlet, preload and data
/// loader. Identity is the originating definition.
pub struct Route {
    pub(crate) definition: Rc<RouteDefinition>,
    pub(crate) original_path: String,
    pub(crate) pattern: String,
    pub(crate) matcher: PathMatcher,
    pub(crate) outlet: Outlet,
    pub(crate) preload: Option<Preload>,
    pub(crate) data: Option<DataLoader>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("original_path", &self.original_path)
            .field("pattern", &self.pattern)
            .field("partial", &self.matcher.is_partial())
            .field("name", &self.definition.name)
            .finish()
    }
}

impl Route {
    /// Template as written (after optional expansion), before joining.
    #[must_use]
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// Joined pattern; truncated at the first wildcard for ancestors.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    /// The originating definition.
    #[must_use]
    pub fn definition(&self) -> &Rc<RouteDefinition> {
        &self.definition
    }

    /// Definition name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.definition.name.as_deref()
    }

    /// Whether two routes come from the same definition.
    #[must_use]
    pub fn same_identity(&self, other: &Route) -> bool {
        Rc::ptr_eq(&self.definition, &other.definition)
    }
}

/// One route of a successful match chain
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (shared with the branch)
    pub route: Rc<Route>,
    /// Consumed path prefix
    pub path: String,
    /// Parameters captured by this route's pattern
    pub params: Params,
}

impl PartialEq for RouteMatch {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.route, &other.route)
            && self.path == other.path
            && self.params == other.params
    }
}

/// A root-to-leaf chain of routes for one concrete path alternative
#[derive(Debug, Clone)]
pub struct Branch {
    pub(crate) routes: Vec<Rc<Route>>,
    pub(crate) score: i64,
}

impl Branch {
    /// Routes, root first.
    #[must_use]
    pub fn routes(&self) -> &[Rc<Route>] {
        &self.routes
    }

    /// Specificity rank; higher matches first.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Match every route of the chain, leaf first, stopping at the first miss.
    ///
    /// The result is ordered root to leaf.
    #[must_use]
    pub fn matches(&self, pathname: &str) -> Option<Vec<RouteMatch>> {
        let mut matches = Vec::with_capacity(self.routes.len());
        for route in self.routes.iter().rev() {
            let m = route.matcher.matches(pathname)?;
            matches.push(RouteMatch {
                route: Rc::clone(route),
                path: m.path,
                params: m.params,
            });
        }
        matches.reverse();
        Some(matches)
    }
}

/// First match chain among `branches` (already sorted), or an empty list.
#[must_use]
pub fn get_route_matches(branches: &[Branch], pathname: &str) -> Vec<RouteMatch> {
    for branch in branches {
        if let Some(matches) = branch.matches(pathname) {
            debug!(
                pathname = %pathname,
                pattern = %branch.routes.last().map_or("", |r| r.pattern.as_str()),
                score = branch.score,
                depth = matches.len(),
                "Route matched"
            );
            return matches;
        }
    }
    debug!(pathname = %pathname, branches = branches.len(), "No route matched");
    Vec::new()
}
