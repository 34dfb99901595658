//! Path normalisation and relative resolution.
//!
//! Resolution never fails loudly: it returns `None` for targets that cannot
//! be routed (absolute URLs with a scheme or authority, or `..` escaping the
//! root) so callers choose between failing ([`navigate`]) and degrading
//! quietly (href computation).
//!
//! [`navigate`]: super::RouterContext::navigate

use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;

#[allow(clippy::expect_used)]
static HAS_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:[a-z0-9]+:)?//").expect("Failed to compile scheme regex"));

/// Normalise slashes on a path fragment.
///
/// Leading slashes are stripped and a run of trailing slashes collapses to
/// one. A non-empty result gets a single leading `/` unless `omit_slash` is
/// set or it starts with `?` or `#`.
#[must_use]
pub fn normalize_path(path: &str, omit_slash: bool) -> String {
    let trimmed = path.trim_start_matches('/');
    let body = trimmed.trim_end_matches('/');
    let s = if body.len() + 1 < trimmed.len() {
        &trimmed[..body.len() + 1]
    } else {
        trimmed
    };

    if s.is_empty() {
        String::new()
    } else if omit_slash || s.starts_with('?') || s.starts_with('#') {
        s.to_string()
    } else {
        format!("/{s}")
    }
}

/// Resolve `to` against `base` (the router base) and `from` (the nearest
/// matched path prefix).
///
/// - absolute targets (`/x`) resolve under `base`
/// - relative targets (`x`, `..`, `?q=1`, ``) resolve under `from`, or under
///   `base` when there is no `from`
/// - `.` and `..` segments and repeated slashes are collapsed
///
/// Returns `None` when the result is not routable.
///
/// ```rust
/// use routeway::navigation::resolve_path;
///
/// assert_eq!(resolve_path("/app", "..", Some("/app/users/42")).as_deref(), Some("/app/users"));
/// assert_eq!(resolve_path("/app", "/other", Some("/app/users/42")).as_deref(), Some("/app/other"));
/// assert_eq!(resolve_path("", "/other", None).as_deref(), Some("/other"));
/// assert_eq!(resolve_path("", "https://example.com", None), None);
/// ```
#[must_use]
pub fn resolve_path(base: &str, to: &str, from: Option<&str>) -> Option<String> {
    if HAS_SCHEME.is_match(to) {
        return None;
    }

    let base_path = normalize_path(base, false);
    let from_path = from
        .map(|f| normalize_path(f, false))
        .filter(|f| !f.is_empty());

    let result = match from_path {
        None => base_path,
        Some(_) if to.starts_with('/') => base_path,
        Some(f) if !f.to_lowercase().starts_with(&base_path.to_lowercase()) => base_path + &f,
        Some(f) => f,
    };

    let joined = if result.is_empty() {
        format!("/{}", normalize_path(to, true))
    } else {
        format!("{result}{}", normalize_path(to, false))
    };
    collapse_dot_segments(&joined)
}

/// Collapse `.`, `..` and empty segments in the path part, keeping any
/// `?query` or `#hash` suffix untouched.
fn collapse_dot_segments(path: &str) -> Option<String> {
    let split = path.find(['?', '#']).unwrap_or(path.len());
    let (pathname, suffix) = path.split_at(split);

    let mut stack: Vec<&str> = Vec::new();
    for segment in pathname.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }

    Some(format!("/{}{}", stack.join("/"), suffix))
}

/// Merge query parameters into a search string (`?a=1&b=2`).
///
/// A `None` or empty value deletes the key; anything else replaces the first
/// occurrence (dropping duplicates) or is appended. Returns an empty string
/// when no parameters remain.
#[must_use]
pub fn merge_search_string(search: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut merged: Vec<(String, String)> =
        form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();

    for (key, value) in params {
        match value.filter(|v| !v.is_empty()) {
            None => merged.retain(|(k, _)| k != key),
            Some(value) => match merged.iter().position(|(k, _)| k == key) {
                Some(first) => {
                    merged[first].1 = value.to_string();
                    let mut seen = 0usize;
                    merged.retain(|(k, _)| {
                        if k != key {
                            return true;
                        }
                        seen += 1;
                        seen == 1
                    });
                }
                None => merged.push(((*key).to_string(), value.to_string())),
            },
        }
    }

    let s = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(merged.iter())
        .finish();
    if s.is_empty() {
        s
    } else {
        format!("?{s}")
    }
}
