use std::rc::Rc;

use tracing::{debug, info};

use super::core::{Branch, Route};
use super::definition::{Outlet, RouteDefinition};
use crate::pattern::{
    compile_pattern, expand_optionals, join_paths, score_pattern, truncate_at_wildcard,
    ConfigurationError, PathMatcher,
};

/// Branch scores leave this much room per pattern score for declaration order.
const ORDER_SLOTS: i64 = 10_000;

/// Compile one definition into a route per path alternative and optional expansion.
///
/// Leaf routes keep the full joined pattern and match exactly; ancestors are
/// truncated at their first wildcard and match partially. A definition
/// without an outlet renders through `fallback`.
///
/// # Errors
///
/// Any [`ConfigurationError`] from expanding or compiling a template.
pub fn create_routes(
    definition: &Rc<RouteDefinition>,
    base: &str,
    fallback: &Outlet,
) -> Result<Vec<Rc<Route>>, ConfigurationError> {
    let is_leaf = definition.is_leaf();
    let outlet = definition
        .outlet
        .as_ref()
        .map_or_else(|| Rc::clone(fallback), Rc::clone);

    let mut routes = Vec::new();
    for path in &definition.path {
        for original_path in expand_optionals(path)? {
            let joined = join_paths(base, &original_path);
            // Validates wildcard placement on the full path, not just the prefix.
            let compiled = compile_pattern(&joined)?;
            let pattern = if is_leaf {
                joined.clone()
            } else {
                truncate_at_wildcard(&joined).to_string()
            };
            let matcher = PathMatcher::from_pattern(compiled, !is_leaf);
            routes.push(Rc::new(Route {
                definition: Rc::clone(definition),
                original_path,
                pattern,
                matcher,
                outlet: Rc::clone(&outlet),
                preload: definition.preload.clone(),
                data: definition.data.clone(),
            }));
        }
    }
    Ok(routes)
}

/// Build a branch from a route stack; `index` breaks score ties in
/// declaration order.
#[must_use]
pub fn create_branch(routes: Vec<Rc<Route>>, index: usize) -> Branch {
    let leaf_score = routes.last().map_or(0, |r| score_pattern(&r.pattern));
    Branch {
        routes,
        score: leaf_score * ORDER_SLOTS - index as i64,
    }
}

/// Walk a definition tree depth-first and return every branch, best first.
///
/// Branches are sorted once, after the whole tree has been walked.
///
/// # Errors
///
/// The first [`ConfigurationError`] found anywhere in the tree.
pub fn create_branches(
    definitions: &[Rc<RouteDefinition>],
    base: &str,
    fallback: &Outlet,
) -> Result<Vec<Branch>, ConfigurationError> {
    let mut stack = Vec::new();
    let mut branches = Vec::new();
    collect_branches(definitions, base, fallback, &mut stack, &mut branches)?;
    branches.sort_by(|a, b| b.score.cmp(&a.score));
    info!(
        base = %base,
        definitions = definitions.len(),
        branches = branches.len(),
        "Route branches compiled"
    );
    Ok(branches)
}

fn collect_branches(
    definitions: &[Rc<RouteDefinition>],
    base: &str,
    fallback: &Outlet,
    stack: &mut Vec<Rc<Route>>,
    branches: &mut Vec<Branch>,
) -> Result<(), ConfigurationError> {
    for definition in definitions {
        for route in create_routes(definition, base, fallback)? {
            stack.push(Rc::clone(&route));
            if definition.is_leaf() {
                let branch = create_branch(stack.clone(), branches.len());
                debug!(
                    pattern = %route.pattern,
                    score = branch.score,
                    depth = stack.len(),
                    "Branch created"
                );
                branches.push(branch);
            } else {
                collect_branches(&definition.children, &route.pattern, fallback, stack, branches)?;
            }
            stack.pop();
        }
    }
    Ok(())
}
