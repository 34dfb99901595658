//! # Navigation Module
//!
//! The navigation engine: the router's canonical location, path resolution,
//! redirect-chain handling and the adapters connecting it to a host.
//!
//! ## Overview
//!
//! - [`RouterContext`] owns one canonical `(path, state)` pair for its whole
//!   lifetime and exposes it as a live [`Location`]
//! - [`RouterContext::navigate`] resolves a target, commits it synchronously
//!   (registered route boundaries recompute before it returns) and persists
//!   the outcome through the [`Adapter`]
//! - [`resolve_path`] turns relative and absolute targets into routable paths
//!   without ever failing loudly
//!
//! ## Redirect Chains
//!
//! A data loader may navigate while a commit is recomputing routes. Such a
//! nested navigation pushes a referrer frame and commits in turn; only the
//! innermost commit of the chain reaches the adapter, as one history entry
//! carrying the flags of the navigation that started the chain. A chain
//! longer than the configured bound (100 by default) fails with
//! [`NavigationError::RedirectLoop`] and the location is rolled back to where
//! the chain started.
//!
//! ## Example
//!
//! ```rust
//! use routeway::navigation::{MemoryAdapter, NavigateOptions, RouterContext};
//!
//! let history = MemoryAdapter::new("/");
//! let router = RouterContext::new(history.clone()).unwrap();
//!
//! router.navigate_root("/users/42", NavigateOptions::default()).unwrap();
//! assert_eq!(router.location().pathname(), "/users/42");
//! assert_eq!(history.entries(), vec!["/", "/users/42"]);
//! ```

mod adapter;
mod engine;
mod error;
mod location;
pub(crate) mod resolve;

pub use adapter::{Adapter, MemoryAdapter, StaticAdapter};
pub(crate) use engine::Boundary;
pub use engine::{NavigateOptions, Navigator, RouterBuilder, RouterContext, To};
pub use error::NavigationError;
pub use location::{Location, LocationChange};
pub use resolve::{merge_search_string, normalize_path, resolve_path};
