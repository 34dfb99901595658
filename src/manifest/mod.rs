//! # Manifest Module
//!
//! Declarative route trees loaded from YAML or JSON files.
//!
//! A manifest is the file form of a [`RouteDefinition`] tree:
//!
//! ```yaml
//! base: /app
//! routes:
//!   - path: /
//!     name: home
//!   - path: [/users, /people]
//!     name: users
//!     children:
//!       - path: /
//!         name: user-list
//!       - path: /:id
//!         name: user
//!   - path: /old-users/*
//!     redirect: /users
//! ```
//!
//! Named routes render their name (and their child's rendering, joined with
//! ` > `); unnamed routes render their child. A `redirect` entry navigates to
//! its target, replacing the history entry, as soon as it matches.
//!
//! [`RouteDefinition`]: crate::router::RouteDefinition

mod load;

pub use load::{load_manifest, PathSpec, RouteEntry, RouteManifest};
