//! # routeway
//!
//! **routeway** resolves a tree of nested, declarative route definitions against a
//! live location, keeps a tree of long-lived per-route contexts in step with it and
//! drives navigation through a pluggable history adapter, with redirect chains
//! collapsed into a single history entry and bounded against loops.
//!
//! ## Overview
//!
//! It is the in-process routing core of a client-side application: no HTTP, no
//! network I/O, only path computation and state. A rendering layer consumes the
//! [`router::RouteContext`] tree; a host integration implements
//! [`navigation::Adapter`].
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`pattern`]** - Path template compilation, optional-segment expansion,
//!   specificity scoring and matching
//! - **[`router`]** - Route definitions, branch ranking, match resolution, context
//!   reconciliation and the [`router::Routes`] boundary
//! - **[`navigation`]** - The [`navigation::RouterContext`] engine, path resolution,
//!   the live [`navigation::Location`] and history adapters
//! - **[`reactive`]** - The pull-based signal/memo substrate everything recomputes on
//! - **[`trace`]** - Match and redirect capture for non-interactive callers
//! - **[`manifest`]** - Route trees loaded from YAML or JSON
//! - **[`logging`]** / **[`runtime_config`]** - Environment-driven setup
//! - **[`cli`]** - The `routeway` inspector binary
//!
//! ### Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Engine as RouterContext
//!     participant Routes
//!     participant Loader as Data loader
//!     participant Adapter
//!
//!     App->>Engine: navigate("/old/7")
//!     Engine->>Engine: resolve, push referrer, commit
//!     Engine->>Routes: refresh
//!     Routes->>Routes: match branches, reconcile contexts
//!     Routes->>Loader: load(/old/:id)
//!     Loader->>Engine: navigate("/users/7", replace)
//!     Engine->>Routes: refresh (nested)
//!     Engine->>Adapter: set("/users/7") once, first frame's flags
//!     Routes-->>Engine: outer pass discarded
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use routeway::navigation::{MemoryAdapter, NavigateOptions, RouterContext};
//! use routeway::router::{Element, RouteDefinition, Routes};
//!
//! let history = MemoryAdapter::new("/");
//! let router = RouterContext::new(history.clone()).unwrap();
//! let routes = Routes::from_definitions(
//!     &router,
//!     vec![
//!         RouteDefinition::new("/").element(Element::new("home")),
//!         RouteDefinition::new("/users/:id").outlet(|ctx| {
//!             Some(Element::new(format!("user {}", ctx.param("id").unwrap_or_default())))
//!         }),
//!         RouteDefinition::redirect("/people/:id", "/users/:id"),
//!     ],
//! )
//! .unwrap();
//!
//! router.navigate_root("/people/42", NavigateOptions::default()).unwrap();
//!
//! let page = routes.render().unwrap().unwrap();
//! assert_eq!(page.downcast_ref::<String>().map(String::as_str), Some("user 42"));
//! assert_eq!(history.entries(), vec!["/", "/users/42"]);
//! ```
//!
//! ## Error Handling
//!
//! - [`pattern::ConfigurationError`] - malformed templates or base paths, raised
//!   while compiling
//! - [`navigation::NavigationError`] - unroutable targets, redirect loops, and
//!   configuration errors surfacing during a commit
//! - An empty match is not an error; add a catch-all route (`/*`) to render
//!   a fallback

pub mod cli;
pub mod logging;
pub mod manifest;
pub mod navigation;
pub mod pattern;
pub mod reactive;
pub mod router;
pub mod runtime_config;
pub mod trace;

pub use navigation::{
    Adapter, Location, LocationChange, MemoryAdapter, NavigateOptions, NavigationError,
    Navigator, RouterContext, StaticAdapter,
};
pub use pattern::{ConfigurationError, Params};
pub use router::{RouteContext, RouteDefinition, Routes};
