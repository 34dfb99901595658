//! # Reactive Module
//!
//! A small pull-based recomputation substrate. Nothing here schedules work on
//! its own: a [`Memo`] recomputes only when it is read and one of its declared
//! dependencies has changed version since its last computation.
//!
//! ## Overview
//!
//! - [`Signal`] - a writable cell with a monotonically increasing version
//! - [`Memo`] - a derived value with declared dependencies, a cached last value
//!   and an equality check that keeps the previous value (and version) when the
//!   recomputed value is equal
//! - [`Dependency`] - a type-erased handle to anything versioned
//!
//! Equality decides reference stability: a memo of `Rc<[T]>` built with
//! [`Memo::with_equals`] and `Rc::ptr_eq` only bumps its version when a new
//! list object is produced.
//!
//! ## Example
//!
//! ```rust
//! use routeway::reactive::{Memo, Signal};
//!
//! let path = Signal::new("/users/42".to_string());
//! let depth = {
//!     let path = path.clone();
//!     Memo::new(vec![path.dependency()], move || path.with(|p| p.matches('/').count()))
//! };
//! assert_eq!(depth.get(), 2);
//!
//! path.set("/users/7".to_string());
//! let before = depth.version();
//! assert_eq!(depth.get(), 2);
//! assert_eq!(depth.version(), before);
//! ```
//!
//! Everything is single-threaded (`Rc`/`RefCell`); handles are cheap to clone
//! and clones observe the same cell.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Anything that exposes a change counter.
///
/// Reading the version of a derived node brings it up to date first, so a
/// chain of memos is refreshed leaf-first on demand.
pub trait Tracked {
    /// Current version; changes whenever the observable value changes.
    fn version(&self) -> u64;
}

/// Type-erased dependency handle used when declaring a [`Memo`]'s inputs.
#[derive(Clone)]
pub struct Dependency(Rc<dyn Tracked>);

impl Dependency {
    /// Wrap any shared versioned node.
    pub fn new(node: Rc<dyn Tracked>) -> Self {
        Self(node)
    }

    /// Current version of the underlying node.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.0.version()
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dependency").field(&self.0.version()).finish()
    }
}

struct SignalCell<T> {
    value: RefCell<T>,
    version: Cell<u64>,
}

impl<T> Tracked for SignalCell<T> {
    fn version(&self) -> u64 {
        self.version.get()
    }
}

/// Writable reactive cell.
pub struct Signal<T> {
    cell: Rc<SignalCell<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &*self.cell.value.borrow())
            .field("version", &self.cell.version.get())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Create a signal holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(SignalCell {
                value: RefCell::new(value),
                version: Cell::new(0),
            }),
        }
    }

    /// Borrow the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    /// Replace the value and bump the version unconditionally.
    pub fn set(&self, value: T) {
        *self.cell.value.borrow_mut() = value;
        self.cell.version.set(self.cell.version.get() + 1);
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version.get()
    }

    /// Handle for declaring this signal as a memo dependency.
    #[must_use]
    pub fn dependency(&self) -> Dependency {
        Dependency(Rc::clone(&self.cell) as Rc<dyn Tracked>)
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }
}

impl<T: PartialEq + 'static> Signal<T> {
    /// Replace the value only if it differs; returns whether it changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.cell.value.borrow() == value {
            return false;
        }
        self.set(value);
        true
    }
}

type Equals<T> = Box<dyn Fn(&T, &T) -> bool>;

struct MemoNode<T> {
    deps: Vec<Dependency>,
    seen: RefCell<SmallVec<[u64; 4]>>,
    value: RefCell<Option<T>>,
    version: Cell<u64>,
    compute: Rc<dyn Fn() -> T>,
    equals: Equals<T>,
}

impl<T> MemoNode<T> {
    fn refresh(&self) {
        let current: SmallVec<[u64; 4]> = self.deps.iter().map(Dependency::version).collect();
        if self.value.borrow().is_some() && *self.seen.borrow() == current {
            return;
        }

        // No borrow is held while computing, so the compute closure may read
        // other memos (or this one's dependencies) freely.
        let compute = Rc::clone(&self.compute);
        let next = compute();

        let mut value = self.value.borrow_mut();
        let changed = match value.as_ref() {
            Some(prev) => !(self.equals)(prev, &next),
            None => true,
        };
        if changed {
            *value = Some(next);
            self.version.set(self.version.get() + 1);
        }
        *self.seen.borrow_mut() = current;
    }
}

impl<T> Tracked for MemoNode<T> {
    fn version(&self) -> u64 {
        self.refresh();
        self.version.get()
    }
}

/// Derived value recomputed on read when a declared dependency changed.
pub struct Memo<T> {
    node: Rc<MemoNode<T>>,
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("deps", &self.node.deps.len())
            .field("version", &self.node.version.get())
            .finish()
    }
}

impl<T: PartialEq + 'static> Memo<T> {
    /// Create a memo that keeps its previous value when the new one compares equal.
    pub fn new(deps: Vec<Dependency>, compute: impl Fn() -> T + 'static) -> Self {
        Self::with_equals(deps, compute, |a, b| a == b)
    }
}

impl<T: 'static> Memo<T> {
    /// Create a memo with a custom equality check.
    pub fn with_equals(
        deps: Vec<Dependency>,
        compute: impl Fn() -> T + 'static,
        equals: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self {
            node: Rc::new(MemoNode {
                deps,
                seen: RefCell::new(SmallVec::new()),
                value: RefCell::new(None),
                version: Cell::new(0),
                compute: Rc::new(compute),
                equals: Box::new(equals),
            }),
        }
    }

    /// Borrow the up-to-date value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.node.refresh();
        let value = self.node.value.borrow();
        match value.as_ref() {
            Some(v) => f(v),
            // refresh always stores a value before returning
            None => f(&(self.node.compute)()),
        }
    }

    /// Version after bringing the memo up to date.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.node.version()
    }

    /// Handle for declaring this memo as a dependency of another memo.
    #[must_use]
    pub fn dependency(&self) -> Dependency {
        Dependency(Rc::clone(&self.node) as Rc<dyn Tracked>)
    }
}

impl<T: Clone + 'static> Memo<T> {
    /// Clone out the up-to-date value.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}
