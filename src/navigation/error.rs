use std::fmt;

use crate::pattern::ConfigurationError;

/// Navigation error
///
/// Returned synchronously by `RouterContext::navigate` and by data loaders
/// that navigate while a commit is in progress. An empty match is never an
/// error; only unroutable targets and runaway redirect chains are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The target resolves outside the addressable path grammar
    ///
    /// Absolute URLs with a scheme or authority, and `..` segments climbing
    /// above the root, cannot be navigated to.
    NotRoutable {
        /// The target as requested
        path: String,
    },
    /// Too many navigations were chained from inside one commit
    ///
    /// Mutually redirecting routes end here instead of recursing forever.
    RedirectLoop {
        /// Maximum chain length that was exceeded
        limit: usize,
    },
    /// The route tree failed to compile while dependents recomputed
    Configuration(ConfigurationError),
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::NotRoutable { path } => {
                write!(f, "Path '{}' is not a routable path", path)
            }
            NavigationError::RedirectLoop { limit } => {
                write!(f, "Too many redirects (more than {} chained navigations)", limit)
            }
            NavigationError::Configuration(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::Configuration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigurationError> for NavigationError {
    fn from(err: ConfigurationError) -> Self {
        NavigationError::Configuration(err)
    }
}
