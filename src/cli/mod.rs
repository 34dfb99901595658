//! # CLI Module
//!
//! Command-line inspection of route manifests.
//!
//! ## Commands
//!
//! ### `branches`
//!
//! List the ranked branches a manifest compiles to:
//!
//! ```bash
//! routeway branches --routes routes.yaml
//! ```
//!
//! ### `match`
//!
//! Match a path and print the trace (one entry per matched route), the
//! rendered route names and, if a redirect fired, where it went:
//!
//! ```bash
//! routeway match --routes routes.yaml /users/42
//! ```
//!
//! ### `resolve`
//!
//! Resolve a navigation target the way a route at `--from` would:
//!
//! ```bash
//! routeway resolve --base /app --from /app/users/42 ..
//! ```
//!
//! ### `navigate`
//!
//! Replay navigations over an in-memory history and print where it ends:
//!
//! ```bash
//! routeway navigate --routes routes.yaml /users /users/42 /old-users/7
//! ```
//!
//! Output is JSON on stdout; logs go to stderr (see `ROUTEWAY_LOG_*`).

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
