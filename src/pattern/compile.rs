//! Path template compilation, optional-segment expansion and specificity scoring.

use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::ConfigurationError;
use crate::navigation::resolve::normalize_path;

/// Maximum number of optional segments a single template may carry.
///
/// Expansion produces `2^n` concrete templates.
pub const MAX_OPTIONAL_SEGMENTS: usize = 8;

/// One compiled path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched case-sensitively
    Static(String),
    /// `:name` - matches any single non-empty segment and captures it
    Dynamic(Arc<str>),
    /// `*`, `*name` or `:name*` - captures all remaining segments; only valid last
    Wildcard(Option<Arc<str>>),
}

impl Segment {
    /// Weight used by [`score_pattern`]: static outranks dynamic.
    fn weight(&self) -> i64 {
        match self {
            Segment::Static(_) => 3,
            Segment::Dynamic(_) => 2,
            Segment::Wildcard(_) => 0,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(text) => f.write_str(text),
            Segment::Dynamic(name) => write!(f, ":{name}"),
            Segment::Wildcard(Some(name)) => write!(f, "*{name}"),
            Segment::Wildcard(None) => f.write_str("*"),
        }
    }
}

/// Classified token plus whether it carried a trailing `?`.
struct Token<'a> {
    raw: &'a str,
    segment: Segment,
    optional: bool,
}

fn classify<'a>(pattern: &str, raw: &'a str) -> Result<Token<'a>, ConfigurationError> {
    let (body, optional) = match raw.strip_suffix('?') {
        Some(body) if raw.starts_with(':') || raw.starts_with('*') => (body, true),
        _ => (raw, false),
    };

    let segment = if let Some(name) = body.strip_prefix('*') {
        Segment::Wildcard((!name.is_empty()).then(|| Arc::from(name)))
    } else if let Some(name) = body.strip_prefix(':') {
        if let Some(name) = name.strip_suffix('*') {
            Segment::Wildcard((!name.is_empty()).then(|| Arc::from(name)))
        } else if name.is_empty() {
            return Err(ConfigurationError::EmptyParamName {
                pattern: pattern.to_string(),
            });
        } else {
            Segment::Dynamic(Arc::from(name))
        }
    } else {
        Segment::Static(body.to_string())
    };

    Ok(Token {
        raw,
        segment,
        optional,
    })
}

/// Whether a raw token is a wildcard (`*`, `*rest`, `:rest*`, optionally with `?`).
pub(crate) fn is_wildcard_token(raw: &str) -> bool {
    let body = raw.strip_suffix('?').unwrap_or(raw);
    body.starts_with('*') || (body.starts_with(':') && body.ends_with('*'))
}

/// A compiled path template
///
/// `terminal` patterns belong to leaf routes and keep their wildcard; ancestor
/// patterns are truncated at the first wildcard so descendants own the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    template: String,
    segments: Vec<Segment>,
    terminal: bool,
}

impl Pattern {
    /// The template this pattern was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Ordered segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Leaf (`true`) or ancestor (`false`) pattern.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Ancestor form of this pattern: everything from the first wildcard on is dropped.
    #[must_use]
    pub fn truncated(mut self) -> Self {
        if let Some(idx) = self
            .segments
            .iter()
            .position(|s| matches!(s, Segment::Wildcard(_)))
        {
            self.segments.truncate(idx);
        }
        self.terminal = false;
        self
    }

    /// Split into the fixed-length prefix and the trailing wildcard, if any.
    pub(crate) fn split_wildcard(&self) -> (&[Segment], Option<&Option<Arc<str>>>) {
        match self.segments.split_last() {
            Some((Segment::Wildcard(name), fixed)) => (fixed, Some(name)),
            _ => (self.segments.as_slice(), None),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// Compile a path template into a terminal [`Pattern`].
///
/// Tokens are split on `/`. `:name` is dynamic, `*`, `*name` and `:name*` are
/// wildcards, anything else is static. A trailing `?` on a dynamic or wildcard
/// token is dropped here; use [`expand_optionals`] first to honour it.
///
/// # Errors
///
/// [`ConfigurationError::MisplacedWildcard`] when a wildcard is not the last
/// segment, [`ConfigurationError::EmptyParamName`] for a bare `:`.
pub fn compile_pattern(template: &str) -> Result<Pattern, ConfigurationError> {
    let tokens = template
        .split('/')
        .filter(|t| !t.is_empty())
        .map(|raw| classify(template, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let last = tokens.len().saturating_sub(1);
    if let Some((_, token)) = tokens
        .iter()
        .enumerate()
        .find(|(i, t)| *i != last && matches!(t.segment, Segment::Wildcard(_)))
    {
        return Err(ConfigurationError::MisplacedWildcard {
            pattern: template.to_string(),
            segment: token.raw.to_string(),
        });
    }

    Ok(Pattern {
        template: template.to_string(),
        segments: tokens.into_iter().map(|t| t.segment).collect(),
        terminal: true,
    })
}

/// Expand optional segments into every concrete template.
///
/// Each optional token (`:name?`, `*name?`, `:name*?`) is either kept (without
/// the `?`) or dropped. Results are ordered most-segments-first; ties keep the
/// order in which earlier optional segments are preferred.
///
/// ```rust
/// use routeway::pattern::expand_optionals;
///
/// let expanded = expand_optionals("/a/:b?").unwrap();
/// assert_eq!(expanded, vec!["/a/:b".to_string(), "/a".to_string()]);
/// ```
///
/// # Errors
///
/// [`ConfigurationError::TooManyOptionals`] above [`MAX_OPTIONAL_SEGMENTS`],
/// and any error [`compile_pattern`] would report for the tokens.
pub fn expand_optionals(template: &str) -> Result<Vec<String>, ConfigurationError> {
    let tokens = template
        .split('/')
        .filter(|t| !t.is_empty())
        .map(|raw| classify(template, raw))
        .collect::<Result<Vec<_>, _>>()?;

    let optional: SmallVec<[usize; MAX_OPTIONAL_SEGMENTS]> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.optional)
        .map(|(i, _)| i)
        .collect();

    if optional.is_empty() {
        return Ok(vec![template.to_string()]);
    }
    if optional.len() > MAX_OPTIONAL_SEGMENTS {
        return Err(ConfigurationError::TooManyOptionals {
            pattern: template.to_string(),
            count: optional.len(),
            limit: MAX_OPTIONAL_SEGMENTS,
        });
    }

    let leading = if template.starts_with('/') { "/" } else { "" };
    let k = optional.len();
    let mut expansions: Vec<(usize, String)> = (0..1u32 << k)
        .rev()
        .map(|mask| {
            let included: Vec<&str> = tokens
                .iter()
                .enumerate()
                .filter_map(|(i, t)| match optional.iter().position(|&o| o == i) {
                    Some(j) if mask & (1 << (k - 1 - j)) == 0 => None,
                    Some(_) => Some(t.raw.strip_suffix('?').unwrap_or(t.raw)),
                    None => Some(t.raw),
                })
                .collect();
            let joined = included.join("/");
            let path = if joined.is_empty() {
                leading.to_string()
            } else {
                format!("{leading}{joined}")
            };
            (included.len(), path)
        })
        .collect();

    expansions.sort_by_key(|(len, _)| Reverse(*len));
    Ok(expansions.into_iter().map(|(_, path)| path).collect())
}

/// Join a parent pattern and a child path.
///
/// The parent's trailing slashes and trailing wildcard are dropped first, so
/// `join_paths("/docs/*rest", "/intro")` is `/docs/intro`. An empty join is `/`.
#[must_use]
pub fn join_paths(from: &str, to: &str) -> String {
    let from = normalize_path(from, false);
    let mut head = from.trim_end_matches('/');
    if let Some(idx) = head.rfind('/') {
        if is_wildcard_token(&head[idx + 1..]) {
            head = head[..idx].trim_end_matches('/');
        }
    }
    let joined = format!("{head}{}", normalize_path(to, false));
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Cut a joined path before its first wildcard segment (ancestor patterns).
#[must_use]
pub fn truncate_at_wildcard(path: &str) -> &str {
    let mut offset = 0;
    for token in path.split('/') {
        if is_wildcard_token(token) && !token.is_empty() {
            return path[..offset].trim_end_matches('/');
        }
        offset += token.len() + 1;
    }
    path
}

/// Specificity score of a route pattern.
///
/// Each static segment weighs 3 and each dynamic segment 2, plus one per
/// non-wildcard segment; a trailing wildcard subtracts one. This keeps
/// `/a/b` > `/a/:b` > `/a/*` and `/a` > `/a/*`.
#[must_use]
pub fn score_pattern(pattern: &str) -> i64 {
    let segments: Vec<Segment> = pattern
        .split('/')
        .filter(|t| !t.is_empty())
        .filter_map(|raw| classify(pattern, raw).ok().map(|t| t.segment))
        .collect();
    let wildcard = matches!(segments.last(), Some(Segment::Wildcard(_)));
    let fixed = &segments[..segments.len() - usize::from(wildcard)];

    let base = fixed.len() as i64 - i64::from(wildcard);
    fixed.iter().fold(base, |score, s| score + s.weight())
}
