//! Reactive location derived from the router's canonical `(path, state)` pair.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::reactive::{Memo, Signal};

/// Origin used only to parse router paths; never visible to callers.
#[allow(clippy::expect_used)]
static PARSE_ORIGIN: Lazy<Url> =
    Lazy::new(|| Url::parse("http://routeway.local/").expect("Failed to parse router origin"));

/// A navigation record as exchanged with the adapter and kept in the
/// referrer stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationChange {
    /// Raw path (`/users/42?tab=posts#top`)
    pub value: String,
    /// Navigation state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// Replace the current history entry instead of pushing
    #[serde(default)]
    pub replace: bool,
    /// Ask the host to scroll to top (or to the hash)
    #[serde(default)]
    pub scroll: bool,
}

impl LocationChange {
    /// A push with scrolling, no state.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            state: None,
            replace: false,
            scroll: true,
        }
    }
}

/// Decode a URL component; `+` means space in queries. Invalid escapes are
/// returned untouched.
pub(crate) fn url_decode(s: &str, is_query: bool) -> String {
    let s = if is_query {
        s.replace('+', " ")
    } else {
        s.to_string()
    };
    match urlencoding::decode(&s) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => s,
    }
}

/// Live view of the current location
///
/// Every accessor reads through memos, so values are always current and
/// `pathname` only changes version when the decoded pathname actually changes.
#[derive(Clone)]
pub struct Location {
    url: Memo<Url>,
    pathname: Memo<String>,
    search: Memo<String>,
    hash: Memo<String>,
    query: Memo<Rc<BTreeMap<String, String>>>,
    state: Signal<Option<Value>>,
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("pathname", &self.pathname())
            .field("search", &self.search())
            .field("hash", &self.hash())
            .field("state", &self.state())
            .finish()
    }
}

impl Location {
    /// Derive a location from a raw path signal and a state signal.
    ///
    /// An unparsable path keeps the last good URL.
    pub fn new(path: Signal<String>, state: Signal<Option<Value>>) -> Self {
        let previous = Rc::new(RefCell::new(PARSE_ORIGIN.clone()));
        let url = {
            let path = path.clone();
            Memo::new(vec![path.dependency()], move || {
                let raw = path.get();
                match PARSE_ORIGIN.join(&raw) {
                    Ok(url) => {
                        *previous.borrow_mut() = url.clone();
                        url
                    }
                    Err(err) => {
                        warn!(path = %raw, error = %err, "Invalid path");
                        previous.borrow().clone()
                    }
                }
            })
        };

        let pathname = {
            let url = url.clone();
            Memo::new(vec![url.dependency()], move || {
                url.with(|u| url_decode(u.path(), false))
            })
        };
        let search = {
            let url = url.clone();
            Memo::new(vec![url.dependency()], move || {
                url.with(|u| {
                    u.query()
                        .filter(|q| !q.is_empty())
                        .map(|q| format!("?{}", url_decode(q, true)))
                        .unwrap_or_default()
                })
            })
        };
        let hash = {
            let url = url.clone();
            Memo::new(vec![url.dependency()], move || {
                url.with(|u| {
                    u.fragment()
                        .filter(|h| !h.is_empty())
                        .map(|h| format!("#{}", url_decode(h, false)))
                        .unwrap_or_default()
                })
            })
        };
        let query = {
            let url = url.clone();
            Memo::new(vec![search.dependency()], move || {
                Rc::new(url.with(|u| u.query_pairs().into_owned().collect()))
            })
        };

        Self {
            url,
            pathname,
            search,
            hash,
            query,
            state,
        }
    }

    /// Decoded pathname (`/users/42`).
    #[must_use]
    pub fn pathname(&self) -> String {
        self.pathname.get()
    }

    /// Decoded search string including `?`, or empty.
    #[must_use]
    pub fn search(&self) -> String {
        self.search.get()
    }

    /// Decoded hash including `#`, or empty.
    #[must_use]
    pub fn hash(&self) -> String {
        self.hash.get()
    }

    /// Navigation state.
    #[must_use]
    pub fn state(&self) -> Option<Value> {
        self.state.get()
    }

    /// History entry key. In-process adapters do not track keys.
    #[must_use]
    pub fn key(&self) -> String {
        String::new()
    }

    /// Query parameters (last occurrence wins).
    #[must_use]
    pub fn query(&self) -> Rc<BTreeMap<String, String>> {
        self.query.get()
    }

    /// Single query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query.with(|q| q.get(name).cloned())
    }

    /// Pathname + search + hash, as the router would render it.
    #[must_use]
    pub fn href(&self) -> String {
        self.url.with(|u| {
            let mut href = u.path().to_string();
            if let Some(q) = u.query() {
                href.push('?');
                href.push_str(q);
            }
            if let Some(h) = u.fragment() {
                href.push('#');
                href.push_str(h);
            }
            href
        })
    }

    /// Undecoded search string including `?`, or empty.
    pub(crate) fn raw_search(&self) -> String {
        self.url.with(|u| u.query().map(|q| format!("?{q}")).unwrap_or_default())
    }

    /// Pathname memo handle.
    pub(crate) fn pathname_memo(&self) -> Memo<String> {
        self.pathname.clone()
    }
}
