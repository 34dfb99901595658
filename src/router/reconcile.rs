use std::rc::Rc;

use super::core::RouteMatch;

/// Diff a new match chain against the previous one, reusing contexts.
///
/// Position `i` reuses the previous context iff the previous match at `i`
/// came from the same route definition and every position before it was
/// reused too. From the first divergence on, `create(i, parent)` builds a
/// fresh context; `parent` is the context just placed at `i - 1` (`None` at
/// the root, where the caller supplies its own parent).
///
/// When every position was reused and the lengths agree, the previous list
/// itself is returned so consumers can compare by pointer.
///
/// # Errors
///
/// The first error returned by `create`. Contexts created before it are the
/// caller's to dispose.
pub fn reconcile<C, E>(
    prev_matches: &[RouteMatch],
    prev: Option<&Rc<[Rc<C>]>>,
    next_matches: &[RouteMatch],
    mut create: impl FnMut(usize, Option<&Rc<C>>) -> Result<Rc<C>, E>,
) -> Result<Rc<[Rc<C>]>, E> {
    let mut equal = prev.is_some() && prev_matches.len() == next_matches.len();
    let mut diverged = prev.is_none();
    let mut next: Vec<Rc<C>> = Vec::with_capacity(next_matches.len());

    for (i, m) in next_matches.iter().enumerate() {
        let reused = if diverged {
            None
        } else {
            match (prev_matches.get(i), prev.and_then(|p| p.get(i))) {
                (Some(pm), Some(pc)) if pm.route.same_identity(&m.route) => Some(Rc::clone(pc)),
                _ => None,
            }
        };

        let context = match reused {
            Some(context) => context,
            None => {
                diverged = true;
                equal = false;
                let parent = i.checked_sub(1).and_then(|j| next.get(j));
                create(i, parent)?
            }
        };
        next.push(context);
    }

    match prev {
        Some(prev) if equal => Ok(Rc::clone(prev)),
        _ => Ok(next.into()),
    }
}
