use std::fmt;

/// Route configuration error
///
/// Raised synchronously while compiling a route tree or constructing a
/// router. These are programming errors in the route definitions and are not
/// recoverable at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A wildcard segment (`*`, `*rest`, `:rest*`) appears before the last segment
    MisplacedWildcard {
        /// The offending path template
        pattern: String,
        /// The wildcard token that is not last
        segment: String,
    },
    /// A dynamic segment has no name (a bare `:`)
    EmptyParamName {
        /// The offending path template
        pattern: String,
    },
    /// Too many optional segments to expand
    ///
    /// Every optional segment doubles the number of concrete templates.
    TooManyOptionals {
        /// The offending path template
        pattern: String,
        /// Number of optional segments found
        count: usize,
        /// Maximum accepted
        limit: usize,
    },
    /// The router base path cannot be resolved to a routable path
    InvalidBasePath {
        /// The base path as supplied
        base: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::MisplacedWildcard { pattern, segment } => {
                write!(
                    f,
                    "Route configuration error: wildcard segment '{}' in '{}' must be the last segment",
                    segment, pattern
                )
            }
            ConfigurationError::EmptyParamName { pattern } => {
                write!(
                    f,
                    "Route configuration error: dynamic segment without a name in '{}'",
                    pattern
                )
            }
            ConfigurationError::TooManyOptionals {
                pattern,
                count,
                limit,
            } => {
                write!(
                    f,
                    "Route configuration error: '{}' has {} optional segments (at most {} are supported)",
                    pattern, count, limit
                )
            }
            ConfigurationError::InvalidBasePath { base } => {
                write!(f, "'{}' is not a valid base path", base)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
