use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::adapter::Adapter;
use super::error::NavigationError;
use super::location::{Location, LocationChange};
use super::resolve::{merge_search_string, resolve_path};
use crate::pattern::{ConfigurationError, Params, PathMatch, PathMatcher};
use crate::reactive::Signal;
use crate::router::{DataArgs, DataLoader, RouteContext, RouteData};
use crate::runtime_config::{RuntimeConfig, DEFAULT_MAX_REDIRECTS};
use crate::trace::TraceCapture;

/// Something recomputed synchronously when the canonical location changes.
pub(crate) trait Boundary {
    fn refresh(&self) -> Result<(), NavigationError>;
}

/// Navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum To {
    /// A path, resolved against the navigating route
    Path(String),
    /// A history delta (`-1` is back)
    Delta(i32),
}

impl From<&str> for To {
    fn from(path: &str) -> Self {
        To::Path(path.to_string())
    }
}

impl From<String> for To {
    fn from(path: String) -> Self {
        To::Path(path)
    }
}

impl From<&String> for To {
    fn from(path: &String) -> Self {
        To::Path(path.clone())
    }
}

impl From<i32> for To {
    fn from(delta: i32) -> Self {
        To::Delta(delta)
    }
}

/// Options for a single navigation
#[derive(Debug, Clone, PartialEq)]
pub struct NavigateOptions {
    /// Resolve relative to the navigating route (`false`: against `/` only)
    pub resolve: bool,
    /// Replace the current history entry
    pub replace: bool,
    /// Ask the host to scroll
    pub scroll: bool,
    /// Navigation state
    pub state: Option<Value>,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            resolve: true,
            replace: false,
            scroll: true,
            state: None,
        }
    }
}

struct RouterInner {
    adapter: Rc<dyn Adapter>,
    base_path: String,
    base: Rc<RouteContext>,
    location: Location,
    reference: Signal<String>,
    state: Signal<Option<Value>>,
    referrers: RefCell<Vec<LocationChange>>,
    depth: Cell<usize>,
    max_redirects: usize,
    trace: Option<TraceCapture>,
    boundaries: RefCell<Vec<Weak<dyn Boundary>>>,
}

/// The router: owner of the canonical `(path, state)` pair
///
/// Every write to the location goes through [`RouterContext::navigate`] or
/// [`RouterContext::sync`]. A navigation commits synchronously: registered
/// `Routes` boundaries recompute before `navigate` returns, and a data loader
/// navigating during that recomputation extends the same redirect chain. Only
/// the end of the chain reaches the adapter, as a single entry carrying the
/// first navigation's `replace`/`scroll` flags.
///
/// Handles are cheap to clone.
#[derive(Clone)]
pub struct RouterContext {
    inner: Rc<RouterInner>,
}

impl fmt::Debug for RouterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterContext")
            .field("base", &self.inner.base_path)
            .field("path", &self.inner.reference.get())
            .field("referrers", &self.inner.referrers.borrow().len())
            .finish()
    }
}

/// Builder for [`RouterContext`]
pub struct RouterBuilder {
    adapter: Rc<dyn Adapter>,
    base: String,
    data: Option<DataLoader>,
    trace: Option<TraceCapture>,
    max_redirects: usize,
}

impl RouterBuilder {
    /// Mount every route under `base`.
    #[must_use]
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    /// Root data loader, run once against the base context.
    #[must_use]
    pub fn data(
        mut self,
        loader: impl Fn(DataArgs) -> Result<Option<RouteData>, NavigationError> + 'static,
    ) -> Self {
        self.data = Some(Rc::new(loader));
        self
    }

    /// Record match passes and finished navigations into `trace`.
    #[must_use]
    pub fn output(mut self, trace: TraceCapture) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Bound on navigations chained from inside one commit.
    #[must_use]
    pub fn max_redirects(mut self, limit: usize) -> Self {
        self.max_redirects = limit;
        self
    }

    /// Apply environment configuration.
    #[must_use]
    pub fn with_config(mut self, config: &RuntimeConfig) -> Self {
        if !config.base_path.is_empty() {
            self.base = config.base_path.clone();
        }
        self.max_redirects = config.max_redirects;
        if config.capture_trace && self.trace.is_none() {
            self.trace = Some(TraceCapture::new());
        }
        self
    }

    /// Create the router.
    ///
    /// An adapter with an empty location is seeded with the base path
    /// (replacing, without scrolling).
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidBasePath`] when the base cannot be
    /// resolved, or whatever the root data loader returns.
    pub fn build(self) -> Result<RouterContext, NavigationError> {
        let base_path = resolve_path("", &self.base, None).ok_or_else(|| {
            ConfigurationError::InvalidBasePath {
                base: self.base.clone(),
            }
        })?;

        let source = self.adapter.source();
        if source.with(|c| c.value.is_empty()) {
            debug!(base = %base_path, "Seeding empty location with base path");
            self.adapter.set(LocationChange {
                value: base_path.clone(),
                state: None,
                replace: true,
                scroll: false,
            });
        }

        let initial = source.get();
        let reference = Signal::new(initial.value);
        let state = Signal::new(initial.state);
        let location = Location::new(reference.clone(), state.clone());
        let base = RouteContext::base(&base_path);

        let router = RouterContext {
            inner: Rc::new(RouterInner {
                adapter: self.adapter,
                base_path,
                base: Rc::clone(&base),
                location,
                reference,
                state,
                referrers: RefCell::new(Vec::new()),
                depth: Cell::new(0),
                max_redirects: self.max_redirects,
                trace: self.trace,
                boundaries: RefCell::new(Vec::new()),
            }),
        };

        if let Some(loader) = self.data {
            let data = loader(DataArgs {
                data: None,
                params: Params::new(),
                location: router.inner.location.clone(),
                navigate: router.navigator(&base),
            })?;
            base.set_data(data);
        }

        info!(
            base = %router.inner.base_path,
            path = %router.inner.reference.get(),
            max_redirects = router.inner.max_redirects,
            "Router created"
        );
        Ok(router)
    }
}

impl RouterContext {
    /// Start building a router over `adapter`.
    pub fn builder(adapter: impl Adapter + 'static) -> RouterBuilder {
        RouterBuilder {
            adapter: Rc::new(adapter),
            base: String::new(),
            data: None,
            trace: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Router over `adapter` with default settings.
    ///
    /// # Errors
    ///
    /// See [`RouterBuilder::build`].
    pub fn new(adapter: impl Adapter + 'static) -> Result<Self, NavigationError> {
        Self::builder(adapter).build()
    }

    /// Resolved base path.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.inner.base_path
    }

    /// The base context every boundary hangs off by default.
    #[must_use]
    pub fn base_context(&self) -> Rc<RouteContext> {
        Rc::clone(&self.inner.base)
    }

    /// Live location.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.inner.location
    }

    /// Trace capture, if one was attached.
    #[must_use]
    pub fn trace(&self) -> Option<TraceCapture> {
        self.inner.trace.clone()
    }

    /// Configured redirect chain bound.
    #[must_use]
    pub fn max_redirects(&self) -> usize {
        self.inner.max_redirects
    }

    /// Canonical `(path, state)` pair.
    #[must_use]
    pub fn current(&self) -> (String, Option<Value>) {
        (self.inner.reference.get(), self.inner.state.get())
    }

    /// Navigation handle bound to `route`.
    #[must_use]
    pub fn navigator(&self, route: &Rc<RouteContext>) -> Navigator {
        Navigator {
            router: Rc::downgrade(&self.inner),
            route: Rc::clone(route),
        }
    }

    /// Host href to router path.
    #[must_use]
    pub fn parse_path(&self, href: &str) -> String {
        self.inner.adapter.parse_path(href)
    }

    /// Router path to host href.
    #[must_use]
    pub fn render_path(&self, path: &str) -> String {
        self.inner.adapter.render_path(path)
    }

    /// Resolve `to` relative to `route`.
    #[must_use]
    pub fn resolved_path(&self, route: &RouteContext, to: &str) -> Option<String> {
        route.resolve_path(to)
    }

    /// Host href for `to` relative to `route`; `None` when not routable.
    #[must_use]
    pub fn href(&self, route: &RouteContext, to: &str) -> Option<String> {
        route.resolve_path(to).map(|path| self.render_path(&path))
    }

    /// Whether a link to `href` from `route` points at the current location.
    ///
    /// Comparison ignores case and any query or hash; `end` requires the
    /// whole pathname to match instead of a prefix.
    #[must_use]
    pub fn is_active(&self, route: &RouteContext, href: &str, end: bool) -> bool {
        let Some(to) = route.resolve_path(href) else {
            return false;
        };
        let path = to.split(['?', '#']).next().unwrap_or("").to_lowercase();
        let current = self.inner.location.pathname().to_lowercase();
        if end {
            path == current
        } else {
            current.starts_with(&path)
        }
    }

    /// Match an ad-hoc template against the current pathname.
    ///
    /// # Errors
    ///
    /// The template's [`ConfigurationError`].
    pub fn match_path(&self, pattern: &str) -> Result<Option<PathMatch>, ConfigurationError> {
        let matcher = PathMatcher::new(pattern, false)?;
        Ok(matcher.matches(&self.inner.location.pathname()))
    }

    pub(crate) fn register(&self, boundary: &Rc<dyn Boundary>) {
        self.inner
            .boundaries
            .borrow_mut()
            .push(Rc::downgrade(boundary));
    }

    fn flush(&self) -> Result<(), NavigationError> {
        let live: Vec<Rc<dyn Boundary>> = {
            let mut boundaries = self.inner.boundaries.borrow_mut();
            boundaries.retain(|b| b.strong_count() > 0);
            boundaries.iter().filter_map(Weak::upgrade).collect()
        };
        for boundary in live {
            boundary.refresh()?;
        }
        Ok(())
    }

    /// Navigate from `from` to `to`.
    ///
    /// A zero delta is ignored; other deltas go to the adapter, and are
    /// reported and ignored when it has no history. Paths resolve against
    /// `from` (or against `/` with `resolve: false`). Navigating to the
    /// current `(path, state)` pair does nothing.
    ///
    /// # Errors
    ///
    /// - [`NavigationError::NotRoutable`] when `to` does not resolve
    /// - [`NavigationError::RedirectLoop`] when the chain is too long
    /// - anything a boundary or data loader returns while recomputing; the
    ///   location is then rolled back to where this navigation started
    pub fn navigate(
        &self,
        from: &RouteContext,
        to: impl Into<To>,
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        match to.into() {
            To::Delta(0) => {
                debug!("Ignoring zero history delta");
                Ok(())
            }
            To::Delta(delta) => {
                if self.inner.adapter.go(delta) {
                    self.sync()
                } else {
                    warn!(delta, "Adapter does not support relative history navigation");
                    Ok(())
                }
            }
            To::Path(to) => self.navigate_path(from, &to, options),
        }
    }

    /// Navigate from the base context.
    ///
    /// # Errors
    ///
    /// See [`RouterContext::navigate`].
    pub fn navigate_root(
        &self,
        to: impl Into<To>,
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        let base = self.base_context();
        self.navigate(&base, to, options)
    }

    fn navigate_path(
        &self,
        from: &RouteContext,
        to: &str,
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        let inner = &self.inner;
        let resolved = if options.resolve {
            from.resolve_path(to)
        } else {
            resolve_path("", to, None)
        }
        .ok_or_else(|| NavigationError::NotRoutable {
            path: to.to_string(),
        })?;

        let chained = inner.referrers.borrow().len();
        if chained >= inner.max_redirects {
            warn!(
                to = %resolved,
                limit = inner.max_redirects,
                "Redirect limit reached"
            );
            return Err(NavigationError::RedirectLoop {
                limit: inner.max_redirects,
            });
        }

        let current = inner.reference.get();
        let current_state = inner.state.get();
        if resolved == current && options.state == current_state {
            debug!(path = %resolved, "Navigation to current location ignored");
            return Ok(());
        }

        let previous = LocationChange {
            value: current,
            state: current_state,
            replace: options.replace,
            scroll: options.scroll,
        };
        let len = {
            let mut referrers = inner.referrers.borrow_mut();
            referrers.push(previous.clone());
            referrers.len()
        };
        debug!(from = %previous.value, to = %resolved, chained = len, "Navigating");

        inner.depth.set(inner.depth.get() + 1);
        inner.reference.set(resolved);
        inner.state.set(options.state);
        let result = self.flush();
        inner.depth.set(inner.depth.get() - 1);

        if let Err(err) = result {
            inner.referrers.borrow_mut().truncate(len - 1);
            inner.reference.set(previous.value);
            inner.state.set(previous.state);
            if inner.depth.get() == 0 {
                warn!(
                    error = %err,
                    restored = %inner.reference.get(),
                    "Navigation chain aborted"
                );
            }
            return Err(err);
        }

        if inner.referrers.borrow().len() == len || inner.depth.get() == 0 {
            self.navigate_end();
        }
        Ok(())
    }

    /// Persist the end of a chain as one adapter entry and clear the chain.
    fn navigate_end(&self) {
        let inner = &self.inner;
        let (first, redirects) = {
            let referrers = inner.referrers.borrow();
            match referrers.first() {
                Some(first) => (first.clone(), referrers.len() - 1),
                None => return,
            }
        };
        inner.referrers.borrow_mut().clear();

        let value = inner.reference.get();
        let state = inner.state.get();
        if value == first.value && state == first.state {
            debug!(path = %value, "Redirect chain returned to its origin");
            return;
        }

        if let Some(trace) = &inner.trace {
            trace.record_url(inner.adapter.render_path(&value));
        }
        info!(
            from = %first.value,
            to = %value,
            replace = first.replace,
            redirects,
            "Navigation committed"
        );
        inner.adapter.set(LocationChange {
            value,
            state,
            replace: first.replace,
            scroll: first.scroll,
        });
    }

    /// Adopt a location change that originated in the adapter (back/forward,
    /// address bar).
    ///
    /// Values equal to the canonical path are ignored, so the router's own
    /// writes never echo back.
    ///
    /// # Errors
    ///
    /// Whatever recomputing the boundaries returns.
    pub fn sync(&self) -> Result<(), NavigationError> {
        let change = self.inner.adapter.source().get();
        if change.value == self.inner.reference.get() {
            return Ok(());
        }
        debug!(path = %change.value, "Adopting external location change");
        self.inner.reference.set(change.value);
        self.inner.state.set(change.state);
        self.flush()
    }
}

/// Navigation handle bound to one route context
///
/// Holds the router weakly; once the router is gone navigation is a reported
/// no-op.
#[derive(Clone)]
pub struct Navigator {
    router: Weak<RouterInner>,
    route: Rc<RouteContext>,
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("route", &self.route.pattern())
            .field("attached", &(self.router.strong_count() > 0))
            .finish()
    }
}

impl Navigator {
    fn router(&self) -> Option<RouterContext> {
        self.router.upgrade().map(|inner| RouterContext { inner })
    }

    /// The route relative targets resolve against.
    #[must_use]
    pub fn route(&self) -> &Rc<RouteContext> {
        &self.route
    }

    /// Navigate relative to the bound route.
    ///
    /// # Errors
    ///
    /// See [`RouterContext::navigate`].
    pub fn navigate(
        &self,
        to: impl Into<To>,
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        match self.router() {
            Some(router) => router.navigate(&self.route, to, options),
            None => {
                warn!(route = %self.route.pattern(), "Navigator used after its router was dropped");
                Ok(())
            }
        }
    }

    /// Merge query parameters into the current search string and navigate
    /// without scrolling. A `None` or empty value removes the key.
    ///
    /// # Errors
    ///
    /// See [`RouterContext::navigate`].
    pub fn set_search_params(&self, params: &[(&str, Option<&str>)]) -> Result<(), NavigationError> {
        self.set_search_params_with(
            params,
            NavigateOptions {
                scroll: false,
                ..NavigateOptions::default()
            },
        )
    }

    /// [`Navigator::set_search_params`] with explicit options; the target
    /// always resolves relative to the bound route.
    ///
    /// # Errors
    ///
    /// See [`RouterContext::navigate`].
    pub fn set_search_params_with(
        &self,
        params: &[(&str, Option<&str>)],
        options: NavigateOptions,
    ) -> Result<(), NavigationError> {
        let Some(router) = self.router() else {
            warn!(route = %self.route.pattern(), "Navigator used after its router was dropped");
            return Ok(());
        };
        let search = merge_search_string(&router.location().raw_search(), params);
        router.navigate(
            &self.route,
            search,
            NavigateOptions {
                resolve: true,
                ..options
            },
        )
    }
}
