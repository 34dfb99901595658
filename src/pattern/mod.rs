//! # Pattern Module
//!
//! The pattern module compiles path templates into matchers and ranks them by
//! specificity. It is pure and stateless: nothing here knows about routes,
//! contexts or navigation.
//!
//! ## Template Syntax
//!
//! | Token | Meaning |
//! |---|---|
//! | `users` | static segment, case-sensitive |
//! | `:id` | dynamic segment, captures one non-empty segment |
//! | `:id?` | optional dynamic segment (expanded at compile time) |
//! | `*`, `*rest`, `:rest*` | wildcard, captures all remaining segments; last only |
//!
//! Optional segments never reach a matcher: [`expand_optionals`] turns
//! `/posts/:id?` into `/posts/:id` and `/posts`, and each expansion is compiled
//! on its own.
//!
//! ## Example
//!
//! ```rust
//! use routeway::pattern::PathMatcher;
//!
//! let matcher = PathMatcher::new("/users/:id", false).unwrap();
//! let m = matcher.matches("/users/42").unwrap();
//! assert_eq!(m.path, "/users/42");
//! assert_eq!(m.params.get("id"), Some("42"));
//! assert!(matcher.matches("/users/42/edit").is_none());
//!
//! let ancestor = PathMatcher::new("/users/:id", true).unwrap();
//! assert_eq!(ancestor.matches("/users/42/edit").unwrap().path, "/users/42");
//! ```
//!
//! ## Scoring
//!
//! [`score_pattern`] ranks static > dynamic > wildcard segments and prefers
//! patterns that do not end in a wildcard. Branch ordering multiplies the
//! leaf score by 10000 and subtracts the declaration index.

mod compile;
mod error;
mod matcher;
#[cfg(test)]
mod tests;

pub use compile::{
    compile_pattern, expand_optionals, join_paths, score_pattern, truncate_at_wildcard, Pattern,
    Segment, MAX_OPTIONAL_SEGMENTS,
};
pub use error::ConfigurationError;
pub use matcher::{ParamVec, Params, PathMatch, PathMatcher, MAX_INLINE_PARAMS};
