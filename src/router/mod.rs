//! # Router Module
//!
//! Route trees, branch ranking, match resolution and the live context tree.
//!
//! ## Overview
//!
//! The router turns an authored tree of [`RouteDefinition`]s into something a
//! rendering layer can consume:
//! - Compiling every path alternative (and optional-segment expansion) into a
//!   [`Route`] with its own matcher
//! - Flattening the tree into root-to-leaf [`Branch`]es, ranked once by
//!   specificity with declaration order breaking ties
//! - Resolving a pathname to the first matching branch ([`get_route_matches`])
//! - Keeping a list of live [`RouteContext`]s in step with the match chain,
//!   reusing contexts whose route did not change
//!
//! ## Architecture
//!
//! 1. **Compilation**: [`create_branches`] walks the definitions depth-first.
//!    Leaf routes keep their full joined pattern and match exactly; ancestors
//!    are cut at their first wildcard and match a prefix.
//!
//! 2. **Matching**: branches are tried in rank order; the first branch whose
//!    routes all match wins. There is no backtracking across branches and an
//!    empty result is not an error.
//!
//! 3. **Reconciliation**: [`reconcile`] keeps the longest prefix of contexts
//!    whose route identity is unchanged and rebuilds the rest. Identity is the
//!    originating definition, never the pattern text or the params.
//!
//! [`Routes`] ties the three together behind the router's location.
//!
//! ## Example
//!
//! ```rust
//! use routeway::navigation::{MemoryAdapter, NavigateOptions, RouterContext};
//! use routeway::router::{RouteDefinition, Routes};
//!
//! let router = RouterContext::new(MemoryAdapter::new("/users/42")).unwrap();
//! let routes = Routes::from_definitions(
//!     &router,
//!     vec![
//!         RouteDefinition::new("/").name("home"),
//!         RouteDefinition::new("/users/:id").name("user"),
//!         RouteDefinition::new("/users/*rest").name("user-pages"),
//!     ],
//! )
//! .unwrap();
//!
//! let matches = routes.matches();
//! assert_eq!(matches[0].route.name(), Some("user"));
//! assert_eq!(matches[0].params.get("id"), Some("42"));
//!
//! router.navigate_root("/users/42/edit", NavigateOptions::default()).unwrap();
//! assert_eq!(routes.matches()[0].params.get("rest"), Some("42/edit"));
//! ```

mod build;
mod context;
mod core;
mod definition;
mod reconcile;
mod routes;

pub use build::{create_branch, create_branches, create_routes};
pub use context::RouteContext;
pub use core::{get_route_matches, Branch, Route, RouteMatch};
pub use definition::{
    DataArgs, DataLoader, Element, Outlet, Preload, RouteData, RouteDefinition,
};
pub use reconcile::reconcile;
pub use routes::Routes;
