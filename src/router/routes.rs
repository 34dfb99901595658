use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use super::build::create_branches;
use super::context::RouteContext;
use super::core::{get_route_matches, Branch, RouteMatch};
use super::definition::{Element, Outlet, RouteDefinition};
use super::reconcile::reconcile;
use crate::navigation::{Boundary, NavigationError, RouterContext};
use crate::pattern::{join_paths, ConfigurationError};
use crate::reactive::{Memo, Signal};

type BranchList = Result<Rc<[Branch]>, ConfigurationError>;
type ContextList = Rc<[Rc<RouteContext>]>;

struct Committed {
    matches: Rc<[RouteMatch]>,
    contexts: Option<ContextList>,
}

/// A refresh pass in flight: the chain it builds and the contexts placed so far.
struct Progress {
    matches: Rc<[RouteMatch]>,
    placed: RefCell<Vec<Rc<RouteContext>>>,
}

enum Interrupt {
    Overtaken,
    Failed(NavigationError),
}

struct RoutesInner {
    router: RouterContext,
    parent: Rc<RouteContext>,
    base: String,
    definitions: Signal<Vec<Rc<RouteDefinition>>>,
    branches: Memo<BranchList>,
    matches: Memo<Rc<[RouteMatch]>>,
    committed: RefCell<Committed>,
    pending: RefCell<Option<Rc<Progress>>>,
    commits: Cell<u64>,
}

/// A routing boundary: a definition tree resolved against the router's location
///
/// The boundary compiles its definitions into ranked branches, matches them
/// against the current pathname and keeps a reconciled list of live
/// [`RouteContext`]s. It registers with the router, so every committed
/// navigation refreshes it synchronously; reads refresh it too.
///
/// A refresh re-entered by a navigation issued from a data loader reconciles
/// against the contexts the outer pass has already placed and commits the
/// newer result. The overtaken outer pass stops creating contexts and disposes
/// the ones it created that the newer result did not keep.
#[derive(Clone)]
pub struct Routes {
    inner: Rc<RoutesInner>,
}

impl fmt::Debug for Routes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routes")
            .field("base", &self.inner.base)
            .field("commits", &self.inner.commits.get())
            .finish()
    }
}

fn fallback_outlet() -> Outlet {
    Rc::new(|context: &Rc<RouteContext>| context.child().and_then(|child| child.render()))
}

fn same_branches(a: &BranchList, b: &BranchList) -> bool {
    match (a, b) {
        (Ok(a), Ok(b)) => Rc::ptr_eq(a, b),
        (Err(a), Err(b)) => a == b,
        _ => false,
    }
}

impl Routes {
    /// Mount `definitions` under `parent` (the router's base context when
    /// `None`), with `base` joined onto the parent's pattern.
    ///
    /// # Errors
    ///
    /// [`NavigationError::Configuration`] when the tree does not compile, or
    /// whatever a data loader of the initial match returns.
    pub fn new(
        router: &RouterContext,
        parent: Option<Rc<RouteContext>>,
        definitions: Signal<Vec<Rc<RouteDefinition>>>,
        base: &str,
    ) -> Result<Self, NavigationError> {
        let parent = parent.unwrap_or_else(|| router.base_context());
        let base = join_paths(parent.pattern(), base);

        let branches = {
            let definitions = definitions.clone();
            let base = base.clone();
            let fallback = fallback_outlet();
            Memo::with_equals(
                vec![definitions.dependency()],
                move || {
                    definitions
                        .with(|defs| create_branches(defs, &base, &fallback))
                        .map(Rc::from)
                },
                same_branches,
            )
        };

        let matches = {
            let branches = branches.clone();
            let pathname = router.location().pathname_memo();
            let trace = router.trace();
            Memo::new(
                vec![branches.dependency(), pathname.dependency()],
                move || {
                    let path = pathname.get();
                    let matches: Rc<[RouteMatch]> = branches.with(|b| match b {
                        Ok(b) => get_route_matches(b, &path).into(),
                        Err(_) => Rc::from(Vec::new()),
                    });
                    if let Some(trace) = &trace {
                        trace.record_matches(&matches);
                    }
                    matches
                },
            )
        };

        if let Err(err) = branches.with(|b| b.as_ref().map(|_| ()).map_err(Clone::clone)) {
            return Err(err.into());
        }

        let inner = Rc::new(RoutesInner {
            router: router.clone(),
            parent,
            base,
            definitions,
            branches,
            matches,
            committed: RefCell::new(Committed {
                matches: Rc::from(Vec::new()),
                contexts: None,
            }),
            pending: RefCell::new(None),
            commits: Cell::new(0),
        });
        let boundary: Rc<dyn Boundary> = Rc::clone(&inner) as Rc<dyn Boundary>;
        router.register(&boundary);
        inner.refresh()?;
        Ok(Self { inner })
    }

    /// Mount a fixed list of definitions under the router's base context.
    ///
    /// # Errors
    ///
    /// See [`Routes::new`].
    pub fn from_definitions(
        router: &RouterContext,
        definitions: Vec<RouteDefinition>,
    ) -> Result<Self, NavigationError> {
        let definitions = Signal::new(definitions.into_iter().map(Rc::new).collect());
        Self::new(router, None, definitions, "")
    }

    /// The definitions signal; setting it recompiles on the next read.
    #[must_use]
    pub fn definitions(&self) -> Signal<Vec<Rc<RouteDefinition>>> {
        self.inner.definitions.clone()
    }

    /// Joined base of this boundary.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.inner.base
    }

    /// Ranked branches.
    ///
    /// # Errors
    ///
    /// The compilation error of the current definitions.
    pub fn branches(&self) -> Result<Rc<[Branch]>, ConfigurationError> {
        self.inner.branches.get()
    }

    /// Current match chain (empty when nothing matches).
    #[must_use]
    pub fn matches(&self) -> Rc<[RouteMatch]> {
        self.inner.matches.get()
    }

    /// Reconciled contexts for the current match chain, root first.
    ///
    /// # Errors
    ///
    /// Whatever a data loader of a newly matched route returns.
    pub fn contexts(&self) -> Result<ContextList, NavigationError> {
        self.inner.refresh()?;
        Ok(self
            .inner
            .committed
            .borrow()
            .contexts
            .clone()
            .unwrap_or_else(|| Rc::from(Vec::new())))
    }

    /// Root context of the current chain.
    ///
    /// # Errors
    ///
    /// See [`Routes::contexts`].
    pub fn root(&self) -> Result<Option<Rc<RouteContext>>, NavigationError> {
        Ok(self.contexts()?.first().cloned())
    }

    /// Render the root context.
    ///
    /// # Errors
    ///
    /// See [`Routes::contexts`].
    pub fn render(&self) -> Result<Option<Element>, NavigationError> {
        Ok(self.root()?.and_then(|root| root.render()))
    }
}

impl RoutesInner {
    fn committed_contexts(&self) -> Option<ContextList> {
        self.committed.borrow().contexts.clone()
    }

    /// Dispose contexts from an abandoned pass, sparing any a newer commit kept.
    fn discard(&self, fresh: &[Rc<RouteContext>]) {
        let kept = self.committed_contexts();
        for context in fresh {
            let in_use = kept
                .as_ref()
                .is_some_and(|list| list.iter().any(|c| Rc::ptr_eq(c, context)));
            if !in_use {
                context.dispose();
            }
        }
    }
}

impl Boundary for RoutesInner {
    fn refresh(&self) -> Result<(), NavigationError> {
        if let Err(err) = self
            .branches
            .with(|b| b.as_ref().map(|_| ()).map_err(Clone::clone))
        {
            return Err(err.into());
        }

        let matches = self.matches.get();
        let committed_contexts = {
            let committed = self.committed.borrow();
            if committed.contexts.is_some() && Rc::ptr_eq(&committed.matches, &matches) {
                return Ok(());
            }
            committed.contexts.clone()
        };
        let outer = self.pending.borrow().clone();
        // An outer pass is already building contexts for this exact chain.
        if outer.as_ref().is_some_and(|p| Rc::ptr_eq(&p.matches, &matches)) {
            return Ok(());
        }

        // Nested under a loader: start from what the outer pass already placed.
        let (prev_matches, prev_contexts): (Rc<[RouteMatch]>, Option<ContextList>) =
            match outer.as_ref().filter(|p| !p.placed.borrow().is_empty()) {
                Some(progress) => {
                    let placed = progress.placed.borrow();
                    (
                        Rc::from(&progress.matches[..placed.len()]),
                        Some(Rc::from(placed.as_slice())),
                    )
                }
                None => (
                    Rc::clone(&self.committed.borrow().matches),
                    committed_contexts.clone(),
                ),
            };

        let seen = self.commits.get();
        let progress = Rc::new(Progress {
            matches: Rc::clone(&matches),
            placed: RefCell::new(Vec::new()),
        });
        *self.pending.borrow_mut() = Some(Rc::clone(&progress));

        let mut fresh: Vec<Rc<RouteContext>> = Vec::new();
        let result = reconcile(&prev_matches, prev_contexts.as_ref(), &matches, |i, parent| {
            if self.commits.get() != seen {
                return Err(Interrupt::Overtaken);
            }
            {
                let mut placed = progress.placed.borrow_mut();
                while placed.len() < i {
                    match prev_contexts.as_ref().and_then(|prev| prev.get(placed.len())) {
                        Some(reused) => placed.push(Rc::clone(reused)),
                        None => break,
                    }
                }
            }
            let parent = parent.unwrap_or(&self.parent);
            let context =
                RouteContext::for_match(&self.router, parent, &self.matches, i, matches[i].clone())
                    .map_err(Interrupt::Failed)?;
            progress.placed.borrow_mut().push(Rc::clone(&context));
            fresh.push(Rc::clone(&context));
            Ok(context)
        });
        *self.pending.borrow_mut() = outer;

        let contexts = match result {
            Ok(contexts) if self.commits.get() == seen => contexts,
            Ok(_) | Err(Interrupt::Overtaken) => {
                debug!(
                    base = %self.base,
                    created = fresh.len(),
                    "Route recomputation overtaken by a nested navigation"
                );
                self.discard(&fresh);
                return Ok(());
            }
            Err(Interrupt::Failed(err)) => {
                self.discard(&fresh);
                return Err(err);
            }
        };

        for (i, context) in contexts.iter().enumerate() {
            context.set_child(contexts.get(i + 1));
        }
        let superseded = committed_contexts
            .iter()
            .chain(prev_contexts.iter())
            .flat_map(|list| list.iter());
        for old in superseded {
            if !contexts.iter().any(|c| Rc::ptr_eq(c, old)) {
                old.dispose();
            }
        }

        let reused = prev_contexts
            .as_ref()
            .is_some_and(|prev| Rc::ptr_eq(prev, &contexts));
        info!(
            base = %self.base,
            depth = contexts.len(),
            created = fresh.len(),
            reused,
            "Route contexts committed"
        );
        *self.committed.borrow_mut() = Committed {
            matches,
            contexts: Some(contexts),
        };
        self.commits.set(seen + 1);
        Ok(())
    }
}

impl Drop for RoutesInner {
    fn drop(&mut self) {
        if let Some(contexts) = self.committed_contexts() {
            contexts.iter().for_each(|c| c.dispose());
        }
    }
}
