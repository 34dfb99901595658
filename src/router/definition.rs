//! Declarative route definitions and the opaque values flowing through them.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::context::RouteContext;
use crate::navigation::{Location, NavigateOptions, NavigationError, Navigator};
use crate::pattern::Params;

/// Rendered output of a route. The rendering layer decides what it holds.
#[derive(Clone)]
pub struct Element(Rc<dyn Any>);

impl Element {
    /// Wrap any value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the value as `T`, if that is what it holds.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Element(..)")
    }
}

/// Value produced by a data loader and inherited by descendant contexts.
#[derive(Clone)]
pub struct RouteData(Rc<dyn Any>);

impl RouteData {
    /// Wrap any value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the value as `T`, if that is what it holds.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Whether two handles share the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &RouteData) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RouteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RouteData(..)")
    }
}

/// Arguments handed to a data loader
///
/// The loader receives its route explicitly: `navigate` is bound to the
/// context being created, so relative targets resolve against it.
pub struct DataArgs {
    /// Data inherited from the parent context
    pub data: Option<RouteData>,
    /// Parameters captured when the loader runs. This is a snapshot; read
    /// `navigate.route().params()` for values that follow later navigations.
    pub params: Params,
    /// The router's live location
    pub location: Location,
    /// Navigation handle bound to the route being loaded
    pub navigate: Navigator,
}

/// Produces a route's output from its live context.
pub type Outlet = Rc<dyn Fn(&Rc<RouteContext>) -> Option<Element>>;
/// Runs once when a context for the route is created.
pub type Preload = Rc<dyn Fn()>;
/// Loads route data; may navigate (redirect) and propagate the result.
pub type DataLoader = Rc<dyn Fn(DataArgs) -> Result<Option<RouteData>, NavigationError>>;

/// Fill `:name`/`*name` segments of a path with captured params.
fn interpolate(target: &str, params: &Params) -> String {
    let split = target.find(['?', '#']).unwrap_or(target.len());
    let (path, suffix) = target.split_at(split);
    let path = path
        .split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .or_else(|| segment.strip_prefix('*'))
                .map(|name| name.trim_end_matches(['?', '*']))
                .and_then(|name| params.get(name))
                .unwrap_or(segment)
        })
        .collect::<Vec<_>>()
        .join("/");
    format!("{path}{suffix}")
}

/// One node of an authored route tree
///
/// `path` holds one or more alternative templates; each may carry optional
/// segments. A definition without children is a leaf. Identity matters: the
/// `Rc<RouteDefinition>` is the key contexts are reused by.
#[derive(Clone, Default)]
pub struct RouteDefinition {
    /// Alternative path templates
    pub path: Vec<String>,
    /// Output producer; `None` renders the child context
    pub outlet: Option<Outlet>,
    /// Eager-load hook
    pub preload: Option<Preload>,
    /// Data loader
    pub data: Option<DataLoader>,
    /// Nested routes
    pub children: Vec<Rc<RouteDefinition>>,
    /// Display name, used by traces and the CLI
    pub name: Option<String>,
}

impl fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("outlet", &self.outlet.is_some())
            .field("data", &self.data.is_some())
            .field("children", &self.children)
            .finish()
    }
}

impl RouteDefinition {
    /// Definition matching a single template.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: vec![path.into()],
            ..Self::default()
        }
    }

    /// Definition matching any of several templates.
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Definition whose loader redirects to `target`, replacing the entry.
    pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(path).redirect_to(target, None)
    }

    /// Replace the data loader with one that redirects to `target`.
    ///
    /// `target` resolves relative to the matched route, so `..` and relative
    /// names work as they do for links. `:name` and `*name` segments of the
    /// target are filled from the captured params. The redirect replaces the
    /// history entry and carries `state`.
    #[must_use]
    pub fn redirect_to(self, target: impl Into<String>, state: Option<Value>) -> Self {
        let target: String = target.into();
        self.data(move |args: DataArgs| {
            args.navigate.navigate(
                interpolate(&target, &args.params),
                NavigateOptions {
                    replace: true,
                    state: state.clone(),
                    ..NavigateOptions::default()
                },
            )?;
            Ok(None)
        })
    }

    /// Set the outlet.
    #[must_use]
    pub fn outlet(mut self, outlet: impl Fn(&Rc<RouteContext>) -> Option<Element> + 'static) -> Self {
        self.outlet = Some(Rc::new(outlet));
        self
    }

    /// Render a fixed element.
    #[must_use]
    pub fn element(self, element: Element) -> Self {
        self.outlet(move |_| Some(element.clone()))
    }

    /// Set the preload hook.
    #[must_use]
    pub fn preload(mut self, preload: impl Fn() + 'static) -> Self {
        self.preload = Some(Rc::new(preload));
        self
    }

    /// Set the data loader.
    #[must_use]
    pub fn data(
        mut self,
        loader: impl Fn(DataArgs) -> Result<Option<RouteData>, NavigationError> + 'static,
    ) -> Self {
        self.data = Some(Rc::new(loader));
        self
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: RouteDefinition) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.children.extend(children.into_iter().map(Rc::new));
        self
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this definition has no nested routes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
