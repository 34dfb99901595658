//! Live per-route contexts consumed by the rendering layer.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use super::core::{Route, RouteMatch};
use super::definition::{DataArgs, Element, Outlet, RouteData};
use crate::navigation::{resolve_path, NavigationError, RouterContext};
use crate::pattern::Params;
use crate::reactive::Memo;

/// Where a context reads its path and params from.
enum MatchSource {
    /// The router's base context: fixed path, no params.
    Base { path: String },
    /// A matched route: live view into the boundary's match list at `index`.
    ///
    /// `initial` answers once the live list no longer holds this route at
    /// `index` (the context has been superseded).
    Live {
        matches: Memo<Rc<[RouteMatch]>>,
        index: usize,
        initial: RouteMatch,
    },
}

impl MatchSource {
    fn with_match<R>(&self, f: impl FnOnce(Option<&RouteMatch>) -> R) -> R {
        match self {
            MatchSource::Base { .. } => f(None),
            MatchSource::Live {
                matches,
                index,
                initial,
            } => matches.with(|list| {
                let live = list
                    .get(*index)
                    .filter(|m| m.route.same_identity(&initial.route));
                f(Some(live.unwrap_or(initial)))
            }),
        }
    }
}

/// A node of the live route tree
///
/// Contexts are created by a `Routes` boundary when a route first matches
/// and are reused for as long as the route keeps matching at the same
/// position. `path()` and `params()` always reflect the current match.
pub struct RouteContext {
    parent: Option<Rc<RouteContext>>,
    pattern: String,
    route: Option<Rc<Route>>,
    child: RefCell<Weak<RouteContext>>,
    source: MatchSource,
    base_path: String,
    data: RefCell<Option<RouteData>>,
    outlet: Outlet,
    cleanups: RefCell<Vec<Box<dyn FnOnce()>>>,
    disposed: Cell<bool>,
}

impl fmt::Debug for RouteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("pattern", &self.pattern)
            .field("path", &self.path())
            .field("params", &self.params())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl RouteContext {
    /// The router's base context.
    pub(crate) fn base(base_path: &str) -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            pattern: base_path.to_string(),
            route: None,
            child: RefCell::new(Weak::new()),
            source: MatchSource::Base {
                path: base_path.to_string(),
            },
            base_path: base_path.to_string(),
            data: RefCell::new(None),
            outlet: Rc::new(|_| None),
            cleanups: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        })
    }

    /// Create a context for match `index` of a boundary's live match list.
    ///
    /// Data is inherited from `parent` unless the route has a loader; the
    /// loader runs here, with a navigator bound to the new context, and may
    /// redirect.
    pub(crate) fn for_match(
        router: &RouterContext,
        parent: &Rc<RouteContext>,
        matches: &Memo<Rc<[RouteMatch]>>,
        index: usize,
        initial: RouteMatch,
    ) -> Result<Rc<Self>, NavigationError> {
        let route = Rc::clone(&initial.route);
        let context = Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            pattern: route.pattern.clone(),
            route: Some(Rc::clone(&route)),
            child: RefCell::new(Weak::new()),
            source: MatchSource::Live {
                matches: matches.clone(),
                index,
                initial,
            },
            base_path: router.base_path().to_string(),
            data: RefCell::new(parent.data()),
            outlet: Rc::clone(&route.outlet),
            cleanups: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        });
        debug!(pattern = %context.pattern, index, "Route context created");

        if let Some(preload) = &route.preload {
            preload();
        }

        if let Some(loader) = &route.data {
            let data = loader(DataArgs {
                data: parent.data(),
                params: context.params(),
                location: router.location().clone(),
                navigate: router.navigator(&context),
            })?;
            *context.data.borrow_mut() = data;
        }

        Ok(context)
    }

    /// Parent context; `None` only for the router's base context.
    #[must_use]
    pub fn parent(&self) -> Option<&Rc<RouteContext>> {
        self.parent.as_ref()
    }

    /// The route's joined pattern (the base path for the base context).
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The matched route; `None` for the base context.
    #[must_use]
    pub fn route(&self) -> Option<&Rc<Route>> {
        self.route.as_ref()
    }

    /// Next context down the active chain.
    #[must_use]
    pub fn child(&self) -> Option<Rc<RouteContext>> {
        self.child.borrow().upgrade()
    }

    pub(crate) fn set_child(&self, child: Option<&Rc<RouteContext>>) {
        *self.child.borrow_mut() = child.map_or_else(Weak::new, Rc::downgrade);
    }

    /// Currently matched path prefix.
    #[must_use]
    pub fn path(&self) -> String {
        match &self.source {
            MatchSource::Base { path } => path.clone(),
            source => source.with_match(|m| m.map(|m| m.path.clone()).unwrap_or_default()),
        }
    }

    /// Currently captured parameters.
    #[must_use]
    pub fn params(&self) -> Params {
        self.source
            .with_match(|m| m.map(|m| m.params.clone()).unwrap_or_default())
    }

    /// Single parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.source
            .with_match(|m| m.and_then(|m| m.params.get(name).map(str::to_string)))
    }

    /// Own data if the route loaded any, otherwise the parent's.
    #[must_use]
    pub fn data(&self) -> Option<RouteData> {
        self.data.borrow().clone()
    }

    pub(crate) fn set_data(&self, data: Option<RouteData>) {
        *self.data.borrow_mut() = data;
    }

    /// Resolve `to` relative to this context's matched path.
    ///
    /// The base context resolves against the base path only.
    #[must_use]
    pub fn resolve_path(&self, to: &str) -> Option<String> {
        match &self.source {
            MatchSource::Base { .. } => resolve_path(&self.base_path, to, None),
            MatchSource::Live { .. } => resolve_path(&self.base_path, to, Some(&self.path())),
        }
    }

    /// Run this context's outlet.
    #[must_use]
    pub fn render(self: &Rc<Self>) -> Option<Element> {
        (self.outlet)(self)
    }

    /// Register a hook run when this context is superseded.
    pub fn on_cleanup(&self, cleanup: impl FnOnce() + 'static) {
        if self.disposed.get() {
            cleanup();
        } else {
            self.cleanups.borrow_mut().push(Box::new(cleanup));
        }
    }

    /// Whether this context has been superseded.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Run cleanup hooks, most recent first. Idempotent.
    pub(crate) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let hooks: Vec<_> = self.cleanups.borrow_mut().drain(..).collect();
        for hook in hooks.into_iter().rev() {
            hook();
        }
        debug!(pattern = %self.pattern, "Route context disposed");
    }
}
