//! Pluggable location sources.
//!
//! The engine only needs a reactive `(value, state)` source and a setter.
//! Everything else (path parsing and rendering, history deltas) has a default
//! so minimal adapters stay minimal.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use super::location::LocationChange;
use crate::reactive::Signal;

/// Host integration used by a router
pub trait Adapter {
    /// Reactive source of the host's current location.
    fn source(&self) -> Signal<LocationChange>;

    /// Persist a finished navigation (push or replace).
    fn set(&self, change: LocationChange);

    /// Turn a host-rendered href back into a router path.
    fn parse_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// Turn a router path into a host href.
    fn render_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// Move `delta` entries through history.
    ///
    /// Returns `false` when the host has no history to move through.
    fn go(&self, _delta: i32) -> bool {
        false
    }
}

#[derive(Debug)]
struct MemoryHistory {
    source: Signal<LocationChange>,
    entries: RefCell<Vec<LocationChange>>,
    index: Cell<usize>,
    hash: bool,
}

/// In-memory history stack
///
/// Push truncates forward entries, replace overwrites the current one and
/// `go` clamps to the available range. Useful for tests and for driving a
/// router outside any host.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    inner: Rc<MemoryHistory>,
}

impl MemoryAdapter {
    /// Start with a single entry at `initial` (may be empty).
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self::build(initial, false)
    }

    /// Like [`MemoryAdapter::new`] but renders hrefs as `#/path`.
    #[must_use]
    pub fn hash(initial: &str) -> Self {
        Self::build(initial, true)
    }

    fn build(initial: &str, hash: bool) -> Self {
        let first = LocationChange {
            value: initial.to_string(),
            ..LocationChange::default()
        };
        Self {
            inner: Rc::new(MemoryHistory {
                source: Signal::new(first.clone()),
                entries: RefCell::new(vec![first]),
                index: Cell::new(0),
                hash,
            }),
        }
    }

    /// All history entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|e| e.value.clone())
            .collect()
    }

    /// Index of the current entry.
    #[must_use]
    pub fn index(&self) -> usize {
        self.inner.index.get()
    }

    /// Current entry.
    #[must_use]
    pub fn current(&self) -> LocationChange {
        self.inner.source.get()
    }

    /// Simulate a host-originated change (address bar edit).
    ///
    /// The router adopts it on its next `sync`.
    pub fn push_external(&self, value: &str) {
        self.set(LocationChange::new(value));
    }
}

impl Adapter for MemoryAdapter {
    fn source(&self) -> Signal<LocationChange> {
        self.inner.source.clone()
    }

    fn set(&self, change: LocationChange) {
        {
            let mut entries = self.inner.entries.borrow_mut();
            let index = self.inner.index.get();
            if change.replace {
                if let Some(entry) = entries.get_mut(index) {
                    *entry = change.clone();
                }
            } else {
                entries.truncate(index + 1);
                entries.push(change.clone());
                self.inner.index.set(entries.len() - 1);
            }
        }
        debug!(
            value = %change.value,
            replace = change.replace,
            depth = self.inner.entries.borrow().len(),
            "Memory history updated"
        );
        self.inner.source.set(change);
    }

    fn parse_path(&self, path: &str) -> String {
        if !self.inner.hash {
            return path.to_string();
        }
        let to = path.split_once('#').map_or(path, |(_, rest)| rest);
        if to.starts_with('/') {
            return to.to_string();
        }
        // Bare `?q` or `#frag` hrefs stay on the current path.
        let current = self.inner.source.with(|c| c.value.clone());
        let end = current.find(['?', '#']).unwrap_or(current.len());
        format!("{}{}", &current[..end], to)
    }

    fn render_path(&self, path: &str) -> String {
        if self.inner.hash {
            format!("#{path}")
        } else {
            path.to_string()
        }
    }

    fn go(&self, delta: i32) -> bool {
        let len = self.inner.entries.borrow().len();
        let current = self.inner.index.get() as i64;
        let target = (current + i64::from(delta)).clamp(0, len as i64 - 1) as usize;
        if target as i64 != current {
            self.inner.index.set(target);
            let entry = self.inner.entries.borrow()[target].clone();
            debug!(delta, index = target, value = %entry.value, "Memory history moved");
            self.inner.source.set(LocationChange {
                replace: false,
                scroll: false,
                ..entry
            });
        }
        true
    }
}

#[derive(Debug)]
struct StaticState {
    source: Signal<LocationChange>,
    redirects: RefCell<Vec<LocationChange>>,
}

/// Fixed location for non-interactive resolution
///
/// Every `set` is recorded as a redirect so a caller rendering once can tell
/// that the requested URL moved. There is no history.
#[derive(Debug, Clone)]
pub struct StaticAdapter {
    inner: Rc<StaticState>,
}

impl StaticAdapter {
    /// Serve `url` (path plus optional query and hash).
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            inner: Rc::new(StaticState {
                source: Signal::new(LocationChange {
                    value: url.to_string(),
                    ..LocationChange::default()
                }),
                redirects: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Every location persisted since creation.
    #[must_use]
    pub fn redirects(&self) -> Vec<LocationChange> {
        self.inner.redirects.borrow().clone()
    }
}

impl Adapter for StaticAdapter {
    fn source(&self) -> Signal<LocationChange> {
        self.inner.source.clone()
    }

    fn set(&self, change: LocationChange) {
        self.inner.redirects.borrow_mut().push(change.clone());
        self.inner.source.set(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_push_replace_and_go() {
        let history = MemoryAdapter::new("/");
        history.set(LocationChange::new("/a"));
        history.set(LocationChange::new("/b"));
        history.set(LocationChange {
            replace: true,
            ..LocationChange::new("/c")
        });
        assert_eq!(history.entries(), vec!["/", "/a", "/c"]);
        assert_eq!(history.index(), 2);

        assert!(history.go(-1));
        assert_eq!(history.current().value, "/a");
        assert!(history.go(-10));
        assert_eq!(history.index(), 0);

        history.set(LocationChange::new("/d"));
        assert_eq!(history.entries(), vec!["/", "/d"]);
    }

    #[test]
    fn test_hash_rendering() {
        let history = MemoryAdapter::hash("/docs?x=1");
        assert_eq!(history.render_path("/users"), "#/users");
        assert_eq!(history.parse_path("http://host/#/users"), "/users");
        assert_eq!(history.parse_path("#?y=2"), "/docs?y=2");
    }

    #[test]
    fn test_static_records_redirects() {
        let adapter = StaticAdapter::new("/old");
        assert!(!adapter.go(1));
        adapter.set(LocationChange::new("/new"));
        assert_eq!(adapter.redirects().len(), 1);
        assert_eq!(adapter.source().get().value, "/new");
    }
}
