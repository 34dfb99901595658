//! Compiled path matchers and captured parameters.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

use super::compile::{compile_pattern, Pattern, Segment};
use super::ConfigurationError;

/// Maximum number of path parameters before heap allocation.
/// Nested route chains rarely capture more than a handful of segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the match path.
///
/// Param names use `Arc<str>` because they come from the compiled pattern and
/// are shared by every match; values are per-path data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Parameters captured by a match, in capture order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a captured value.
    pub fn insert(&mut self, name: Arc<str>, value: String) {
        self.0.push((name, value));
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics when the same name is captured twice.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ordered map view (last write wins).
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Convert to a `HashMap` for callers that want one
    /// Note: This allocates - use [`Params::get`] for single lookups.
    #[must_use]
    pub fn to_hash_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (Arc::from(k), v.to_string()))
                .collect(),
        )
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let map = self.to_map();
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (k, v) in &map {
            out.serialize_entry(k, v)?;
        }
        out.end()
    }
}

/// Result of matching a pathname against a single pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
    /// The consumed prefix of the pathname (`/` when nothing was consumed)
    pub path: String,
    /// Captured parameters
    pub params: Params,
}

/// Matcher compiled from one path template
///
/// Exact matchers require the segment counts to agree; partial matchers
/// (ancestor routes) accept trailing segments that belong to descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatcher {
    pattern: Pattern,
    partial: bool,
}

impl PathMatcher {
    /// Compile `template` into a matcher.
    ///
    /// A partial matcher uses the ancestor form of the pattern (truncated at
    /// its first wildcard).
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`] reported by [`compile_pattern`].
    pub fn new(template: &str, partial: bool) -> Result<Self, ConfigurationError> {
        let pattern = compile_pattern(template)?;
        Ok(Self::from_pattern(pattern, partial))
    }

    /// Build a matcher from an already compiled pattern.
    #[must_use]
    pub fn from_pattern(pattern: Pattern, partial: bool) -> Self {
        let pattern = if partial { pattern.truncated() } else { pattern };
        Self { pattern, partial }
    }

    /// The compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Whether trailing segments are accepted.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// Match `pathname`, returning the consumed prefix and captured params.
    ///
    /// Static segments compare case-sensitively; dynamic segments capture one
    /// non-empty segment; a wildcard needs at least one remaining segment and
    /// captures all of them joined by `/`.
    #[must_use]
    pub fn matches(&self, pathname: &str) -> Option<PathMatch> {
        let (fixed, wildcard) = self.pattern.split_wildcard();
        let location: SmallVec<[&str; 16]> =
            pathname.split('/').filter(|s| !s.is_empty()).collect();

        if location.len() < fixed.len() {
            return None;
        }
        let extra = location.len() - fixed.len();
        match wildcard {
            None if extra > 0 && !self.partial => return None,
            Some(_) if extra == 0 => return None,
            _ => {}
        }

        let mut path = String::with_capacity(pathname.len());
        let mut params = Params::new();
        for (segment, value) in fixed.iter().zip(&location) {
            match segment {
                Segment::Static(text) if text == value => {}
                Segment::Dynamic(name) => params.insert(Arc::clone(name), (*value).to_string()),
                _ => return None,
            }
            path.push('/');
            path.push_str(value);
        }
        if path.is_empty() {
            path.push('/');
        }

        if let Some(Some(name)) = wildcard {
            params.insert(Arc::clone(name), location[fixed.len()..].join("/"));
        }

        Some(PathMatch { path, params })
    }
}
