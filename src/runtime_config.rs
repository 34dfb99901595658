//! # Runtime Configuration Module
//!
//! Environment-driven configuration for the router engine.
//!
//! ## Environment Variables
//!
//! ### `ROUTEWAY_BASE`
//!
//! Base path every route is mounted under (for example `/app`). Default: empty,
//! which resolves to `/`.
//!
//! ### `ROUTEWAY_MAX_REDIRECTS`
//!
//! Maximum number of navigations that may be chained from inside a single
//! commit before the engine fails with a redirect-loop error. Accepts:
//! - Decimal: `100`
//! - Hexadecimal: `0x64`
//!
//! Default: `100`. Zero and unparsable values fall back to the default.
//!
//! ### `ROUTEWAY_CAPTURE_TRACE`
//!
//! `1`/`true`/`yes`/`on` attaches a trace capture to routers built with
//! [`RouterBuilder::with_config`](crate::navigation::RouterBuilder::with_config).
//! Default: off.
//!
//! ## Usage
//!
//! ```rust
//! use routeway::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Redirect bound: {}", config.max_redirects);
//! ```
//!
//! ## Example Configuration
//!
//! ```bash
//! export ROUTEWAY_BASE=/app
//! export ROUTEWAY_MAX_REDIRECTS=0x20
//! routeway match --routes routes.yaml /app/users/42
//! ```

use std::env;

/// Default redirect chain bound.
pub const DEFAULT_MAX_REDIRECTS: usize = 100;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Router base path (default: empty)
    pub base_path: String,
    /// Redirect chain bound (default: 100)
    pub max_redirects: usize,
    /// Attach a trace capture (default: false)
    pub capture_trace: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            capture_trace: false,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_path = lookup("ROUTEWAY_BASE").unwrap_or_default();

        let max_redirects = match lookup("ROUTEWAY_MAX_REDIRECTS") {
            Some(val) => {
                let val = val.trim();
                let parsed = if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).ok()
                } else {
                    val.parse().ok()
                };
                parsed.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_REDIRECTS)
            }
            None => DEFAULT_MAX_REDIRECTS,
        };

        let capture_trace = lookup("ROUTEWAY_CAPTURE_TRACE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        RuntimeConfig {
            base_path,
            max_redirects,
            capture_trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), RuntimeConfig::default());
    }

    #[test]
    fn test_max_redirects_decimal_and_hex() {
        assert_eq!(config(&[("ROUTEWAY_MAX_REDIRECTS", "25")]).max_redirects, 25);
        assert_eq!(config(&[("ROUTEWAY_MAX_REDIRECTS", "0x20")]).max_redirects, 32);
    }

    #[test]
    fn test_max_redirects_falls_back() {
        assert_eq!(config(&[("ROUTEWAY_MAX_REDIRECTS", "0")]).max_redirects, 100);
        assert_eq!(config(&[("ROUTEWAY_MAX_REDIRECTS", "lots")]).max_redirects, 100);
    }

    #[test]
    fn test_base_and_trace() {
        let cfg = config(&[("ROUTEWAY_BASE", "/app"), ("ROUTEWAY_CAPTURE_TRACE", "TRUE")]);
        assert_eq!(cfg.base_path, "/app");
        assert!(cfg.capture_trace);
    }
}
