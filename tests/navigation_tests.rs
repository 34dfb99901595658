mod common;

use common::fixtures::{named, rendered, Counter};
use routeway::navigation::{
    Adapter, MemoryAdapter, NavigateOptions, NavigationError, RouterContext, StaticAdapter,
};
use routeway::pattern::ConfigurationError;
use routeway::router::{RouteDefinition, Routes};
use routeway::trace::TraceCapture;
use serde_json::json;

fn default_routes() -> Vec<RouteDefinition> {
    vec![
        named("/", "home"),
        named("/users", "users"),
        named("/users/:id", "user"),
        RouteDefinition::redirect("/old/:id", "/users/:id"),
    ]
}

fn setup(path: &str) -> (MemoryAdapter, RouterContext, Routes) {
    let history = MemoryAdapter::new(path);
    let router = RouterContext::new(history.clone()).unwrap();
    let routes = Routes::from_definitions(&router, default_routes()).unwrap();
    (history, router, routes)
}

fn replace() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..NavigateOptions::default()
    }
}

#[test]
fn test_navigate_pushes_one_entry() {
    let (history, router, routes) = setup("/");
    router
        .navigate_root("/users/42", NavigateOptions::default())
        .unwrap();
    assert_eq!(history.entries(), vec!["/", "/users/42"]);
    assert_eq!(router.location().pathname(), "/users/42");
    assert_eq!(rendered(routes.render().unwrap()).as_deref(), Some("user"));

    let current = history.current();
    assert!(!current.replace);
    assert!(current.scroll);
}

#[test]
fn test_navigate_to_current_location_is_a_no_op() {
    let (history, router, _routes) = setup("/users");
    router
        .navigate_root("/users", NavigateOptions::default())
        .unwrap();
    assert_eq!(history.entries(), vec!["/users"]);
    assert_eq!(history.index(), 0);
}

#[test]
fn test_navigate_to_current_location_never_writes_the_adapter() {
    let adapter = StaticAdapter::new("/users");
    let trace = TraceCapture::new();
    let router = RouterContext::builder(adapter.clone())
        .output(trace.clone())
        .build()
        .unwrap();
    let _routes = Routes::from_definitions(&router, default_routes()).unwrap();

    router
        .navigate_root("/users", NavigateOptions::default())
        .unwrap();
    router.navigate_root("/users", replace()).unwrap();

    assert!(adapter.redirects().is_empty());
    assert_eq!(trace.url(), None);
    assert_eq!(router.location().pathname(), "/users");
}

#[test]
fn test_state_change_alone_commits() {
    let (history, router, _routes) = setup("/users");
    let with_state = NavigateOptions {
        state: Some(json!({"tab": 2})),
        ..NavigateOptions::default()
    };
    router.navigate_root("/users", with_state.clone()).unwrap();
    assert_eq!(history.entries(), vec!["/users", "/users"]);
    assert_eq!(router.location().state(), Some(json!({"tab": 2})));

    router.navigate_root("/users", with_state).unwrap();
    assert_eq!(history.entries().len(), 2);
}

#[test]
fn test_redirect_collapses_into_single_entry() {
    let (history, router, routes) = setup("/");
    router
        .navigate_root("/old/7", NavigateOptions::default())
        .unwrap();

    assert_eq!(history.entries(), vec!["/", "/users/7"]);
    assert_eq!(router.location().pathname(), "/users/7");
    assert_eq!(rendered(routes.render().unwrap()).as_deref(), Some("user"));
    let current = history.current();
    assert!(!current.replace, "first navigation's flags win");
    assert!(current.scroll);
}

#[test]
fn test_redirect_keeps_first_replace_flag() {
    let (history, router, _routes) = setup("/users");
    router.navigate_root("/old/9", replace()).unwrap();
    assert_eq!(history.entries(), vec!["/users/9"]);
    assert!(history.current().replace);
}

#[test]
fn test_redirect_chain_reports_final_url() {
    let trace = TraceCapture::new();
    let hops = Counter::default();
    let history = MemoryAdapter::new("/");
    let router = RouterContext::builder(history.clone())
        .output(trace.clone())
        .build()
        .unwrap();
    let counting_hop = {
        let hops = hops.clone();
        RouteDefinition::new("/a").data(move |args| {
            hops.bump();
            args.navigate.navigate("/b", replace())?;
            Ok(None)
        })
    };
    let _routes = Routes::from_definitions(
        &router,
        vec![
            named("/", "home"),
            counting_hop,
            RouteDefinition::redirect("/b", "/c"),
            named("/c", "c"),
        ],
    )
    .unwrap();

    router.navigate_root("/a", NavigateOptions::default()).unwrap();
    assert_eq!(history.entries(), vec!["/", "/c"]);
    assert_eq!(trace.url().as_deref(), Some("/c"));
    assert_eq!(hops.get(), 1);
}

#[test]
fn test_redirect_state_is_carried() {
    let history = MemoryAdapter::new("/");
    let router = RouterContext::new(history.clone()).unwrap();
    let _routes = Routes::from_definitions(
        &router,
        vec![
            named("/", "home"),
            RouteDefinition::new("/legacy").redirect_to("/modern", Some(json!({"from": "legacy"}))),
            named("/modern", "modern"),
        ],
    )
    .unwrap();

    router
        .navigate_root("/legacy", NavigateOptions::default())
        .unwrap();
    assert_eq!(router.location().pathname(), "/modern");
    assert_eq!(router.location().state(), Some(json!({"from": "legacy"})));
    assert_eq!(history.current().state, Some(json!({"from": "legacy"})));
}

#[test]
fn test_chain_returning_to_origin_leaves_history_alone() {
    let history = MemoryAdapter::new("/");
    let router = RouterContext::new(history.clone()).unwrap();
    let _routes = Routes::from_definitions(
        &router,
        vec![named("/", "home"), RouteDefinition::redirect("/bounce", "/")],
    )
    .unwrap();

    router
        .navigate_root("/bounce", NavigateOptions::default())
        .unwrap();
    assert_eq!(history.entries(), vec!["/"]);
    assert_eq!(router.location().pathname(), "/");
}

fn ping_pong(limit: Option<usize>) -> (Result<(), NavigationError>, usize, MemoryAdapter, String) {
    let calls = Counter::default();
    let history = MemoryAdapter::new("/");
    let mut builder = RouterContext::builder(history.clone());
    if let Some(limit) = limit {
        builder = builder.max_redirects(limit);
    }
    let router = builder.build().unwrap();

    let hop = |path: &str, target: &'static str| {
        let calls = calls.clone();
        RouteDefinition::new(path).data(move |args| {
            calls.bump();
            args.navigate.navigate(target, NavigateOptions::default())?;
            Ok(None)
        })
    };
    let _routes = Routes::from_definitions(
        &router,
        vec![named("/", "home"), hop("/a", "/b"), hop("/b", "/a")],
    )
    .unwrap();

    let result = router.navigate_root("/a", NavigateOptions::default());
    let pathname = router.location().pathname();
    (result, calls.get(), history, pathname)
}

#[test]
fn test_redirect_loop_is_bounded_and_rolled_back() {
    let (result, calls, history, pathname) = ping_pong(None);
    let err = result.unwrap_err();
    assert_eq!(err, NavigationError::RedirectLoop { limit: 100 });
    assert_eq!(calls, 100);
    assert_eq!(pathname, "/");
    assert_eq!(history.entries(), vec!["/"]);
}

#[test]
fn test_redirect_limit_is_configurable() {
    let (result, calls, history, pathname) = ping_pong(Some(5));
    assert!(matches!(result, Err(NavigationError::RedirectLoop { limit: 5 })));
    assert_eq!(calls, 5);
    assert_eq!(pathname, "/");
    assert_eq!(history.entries(), vec!["/"]);
}

#[test]
fn test_unroutable_targets_fail_without_side_effects() {
    let (history, router, _routes) = setup("/users/1");
    let err = router
        .navigate_root("https://example.com/x", NavigateOptions::default())
        .unwrap_err();
    assert!(matches!(err, NavigationError::NotRoutable { .. }));
    assert!(err.to_string().contains("is not a routable path"));

    let err = router
        .navigate_root("../../..", NavigateOptions::default())
        .unwrap_err();
    assert!(matches!(err, NavigationError::NotRoutable { .. }));
    assert_eq!(history.entries(), vec!["/users/1"]);
}

#[test]
fn test_relative_navigation_resolves_against_route() {
    let (history, router, routes) = setup("/users/42");
    let user = routes.root().unwrap().unwrap();

    router
        .navigate(&user, "..", NavigateOptions::default())
        .unwrap();
    assert_eq!(router.location().pathname(), "/users");

    let user_list = routes.root().unwrap().unwrap();
    router
        .navigate(&user_list, "7", NavigateOptions::default())
        .unwrap();
    assert_eq!(router.location().pathname(), "/users/7");
    assert_eq!(history.entries(), vec!["/users/42", "/users", "/users/7"]);
}

#[test]
fn test_resolve_false_ignores_route() {
    let (_, router, routes) = setup("/users/42");
    let user = routes.root().unwrap().unwrap();
    router
        .navigate(
            &user,
            "users",
            NavigateOptions {
                resolve: false,
                ..NavigateOptions::default()
            },
        )
        .unwrap();
    assert_eq!(router.location().pathname(), "/users");
}

#[test]
fn test_history_deltas() {
    let (history, router, routes) = setup("/");
    router.navigate_root("/users", NavigateOptions::default()).unwrap();
    router.navigate_root("/users/3", NavigateOptions::default()).unwrap();

    router.navigate_root(0, NavigateOptions::default()).unwrap();
    assert_eq!(history.index(), 2);

    router.navigate_root(-1, NavigateOptions::default()).unwrap();
    assert_eq!(history.index(), 1);
    assert_eq!(router.location().pathname(), "/users");
    assert_eq!(rendered(routes.render().unwrap()).as_deref(), Some("users"));
    assert_eq!(history.entries().len(), 3);
}

#[test]
fn test_delta_without_history_is_ignored() {
    let adapter = StaticAdapter::new("/users");
    let router = RouterContext::new(adapter.clone()).unwrap();
    router.navigate_root(-1, NavigateOptions::default()).unwrap();
    assert_eq!(router.location().pathname(), "/users");
    assert!(adapter.redirects().is_empty());
}

#[test]
fn test_sync_adopts_external_changes() {
    let (history, router, routes) = setup("/");
    history.push_external("/users/5");
    assert_eq!(router.location().pathname(), "/");

    router.sync().unwrap();
    assert_eq!(router.location().pathname(), "/users/5");
    assert_eq!(rendered(routes.render().unwrap()).as_deref(), Some("user"));

    // Router-originated writes never echo back through sync.
    router.navigate_root("/users", NavigateOptions::default()).unwrap();
    let entries = history.entries();
    router.sync().unwrap();
    assert_eq!(history.entries(), entries);
}

#[test]
fn test_empty_location_is_seeded_with_base() {
    let history = MemoryAdapter::new("");
    let router = RouterContext::builder(history.clone())
        .base("/app/")
        .build()
        .unwrap();
    assert_eq!(router.base_path(), "/app");
    assert_eq!(history.entries(), vec!["/app"]);
    let current = history.current();
    assert!(current.replace);
    assert!(!current.scroll);
    assert_eq!(router.location().pathname(), "/app");
}

#[test]
fn test_invalid_base_path_is_rejected() {
    let err = RouterContext::builder(MemoryAdapter::new("/"))
        .base("https://example.com")
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        NavigationError::Configuration(ConfigurationError::InvalidBasePath { .. })
    ));
}

#[test]
fn test_set_search_params_merges_and_keeps_scroll() {
    let history = MemoryAdapter::new("/search?q=rust&page=2");
    let router = RouterContext::new(history.clone()).unwrap();
    let routes = Routes::from_definitions(&router, vec![named("/search", "search")]).unwrap();
    let navigator = router.navigator(&routes.root().unwrap().unwrap());

    navigator
        .set_search_params(&[("page", None), ("sort", Some("asc"))])
        .unwrap();
    assert_eq!(router.location().pathname(), "/search");
    assert_eq!(router.location().query_param("q").as_deref(), Some("rust"));
    assert_eq!(router.location().query_param("sort").as_deref(), Some("asc"));
    assert_eq!(router.location().query_param("page"), None);
    assert!(!history.current().scroll);
}

#[test]
fn test_navigator_outliving_router_is_inert() {
    let history = MemoryAdapter::new("/");
    let router = RouterContext::new(history.clone()).unwrap();
    let navigator = router.navigator(&router.base_context());
    drop(router);
    navigator
        .navigate("/users", NavigateOptions::default())
        .unwrap();
    assert_eq!(history.entries(), vec!["/"]);
}

#[test]
fn test_is_active_and_href() {
    let history = MemoryAdapter::hash("/users/42");
    let router = RouterContext::new(history.clone()).unwrap();
    let base = router.base_context();

    assert!(router.is_active(&base, "/users", false));
    assert!(!router.is_active(&base, "/users", true));
    assert!(router.is_active(&base, "/USERS/42?tab=1", true));
    assert!(!router.is_active(&base, "https://example.com", false));

    assert_eq!(router.href(&base, "/docs").as_deref(), Some("#/docs"));
    assert_eq!(router.href(&base, "https://example.com"), None);
    assert_eq!(router.parse_path("#/docs"), "/docs");
    assert_eq!(history.render_path("/x"), "#/x");
}

#[test]
fn test_match_path_against_location() {
    let (_, router, _routes) = setup("/users/42");
    let m = router.match_path("/users/:id").unwrap().unwrap();
    assert_eq!(m.params.get("id"), Some("42"));
    assert!(router.match_path("/posts/:id").unwrap().is_none());
    assert!(router.match_path("/a/*/b").is_err());
}
