use super::*;

#[test]
fn test_compile_classifies_segments() {
    let pattern = compile_pattern("/users/:id/*rest").unwrap();
    assert_eq!(
        pattern.segments(),
        &[
            Segment::Static("users".into()),
            Segment::Dynamic("id".into()),
            Segment::Wildcard(Some("rest".into())),
        ]
    );
    assert!(pattern.is_terminal());
    assert_eq!(pattern.to_string(), "/users/:id/*rest");
}

#[test]
fn test_colon_star_is_wildcard() {
    let pattern = compile_pattern("/files/:path*").unwrap();
    assert_eq!(
        pattern.segments().last(),
        Some(&Segment::Wildcard(Some("path".into())))
    );
    let bare = compile_pattern("/files/*").unwrap();
    assert_eq!(bare.segments().last(), Some(&Segment::Wildcard(None)));
}

#[test]
fn test_wildcard_must_be_last() {
    let err = compile_pattern("/a/*rest/b").unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::MisplacedWildcard {
            pattern: "/a/*rest/b".into(),
            segment: "*rest".into(),
        }
    );
    assert!(PathMatcher::new("/:all*/x", false).is_err());
}

#[test]
fn test_empty_param_name_rejected() {
    assert!(matches!(
        compile_pattern("/users/:"),
        Err(ConfigurationError::EmptyParamName { .. })
    ));
}

#[test]
fn test_expand_optionals_more_segments_first() {
    assert_eq!(expand_optionals("/a/:b?").unwrap(), vec!["/a/:b", "/a"]);
    assert_eq!(
        expand_optionals("/:a?/:b?").unwrap(),
        vec!["/:a/:b", "/:a", "/:b", "/"]
    );
    assert_eq!(expand_optionals("/plain").unwrap(), vec!["/plain"]);
}

#[test]
fn test_expand_optional_wildcard() {
    assert_eq!(
        expand_optionals("/docs/*page?").unwrap(),
        vec!["/docs/*page", "/docs"]
    );
}

#[test]
fn test_expand_optionals_is_bounded() {
    let template: String = (0..=MAX_OPTIONAL_SEGMENTS).map(|i| format!("/:p{i}?")).collect();
    assert!(matches!(
        expand_optionals(&template),
        Err(ConfigurationError::TooManyOptionals { count, .. }) if count == MAX_OPTIONAL_SEGMENTS + 1
    ));
}

#[test]
fn test_score_ordering() {
    assert!(score_pattern("/a/b") > score_pattern("/a/:b"));
    assert!(score_pattern("/a/:b") > score_pattern("/a/*"));
    assert!(score_pattern("/a") > score_pattern("/a/*"));
    assert!(score_pattern("/users/:id") > score_pattern("/users/*rest"));
}

#[test]
fn test_exact_match_requires_equal_segment_count() {
    let m = PathMatcher::new("/users/:id", false).unwrap();
    assert!(m.matches("/users").is_none());
    assert!(m.matches("/users/1/2").is_none());
    let hit = m.matches("/users/1").unwrap();
    assert_eq!(hit.params.get("id"), Some("1"));
}

#[test]
fn test_static_match_is_case_sensitive() {
    let m = PathMatcher::new("/About", false).unwrap();
    assert!(m.matches("/About").is_some());
    assert!(m.matches("/about").is_none());
}

#[test]
fn test_partial_match_returns_consumed_prefix() {
    let m = PathMatcher::new("/users/:id", true).unwrap();
    let hit = m.matches("/users/42/posts/7").unwrap();
    assert_eq!(hit.path, "/users/42");
    assert_eq!(hit.params.len(), 1);
}

#[test]
fn test_root_pattern() {
    let exact = PathMatcher::new("/", false).unwrap();
    assert_eq!(exact.matches("/").unwrap().path, "/");
    assert!(exact.matches("/x").is_none());

    let partial = PathMatcher::new("/", true).unwrap();
    assert_eq!(partial.matches("/x/y").unwrap().path, "/");
}

#[test]
fn test_wildcard_captures_remaining_segments() {
    let m = PathMatcher::new("/users/*rest", false).unwrap();
    let hit = m.matches("/users/42/edit").unwrap();
    assert_eq!(hit.params.get("rest"), Some("42/edit"));
    assert_eq!(hit.path, "/users");
    assert!(m.matches("/users").is_none());
}

#[test]
fn test_partial_matcher_truncates_wildcard() {
    let m = PathMatcher::new("/docs/*rest", true).unwrap();
    assert!(!m.pattern().is_terminal());
    assert_eq!(m.pattern().segments().len(), 1);
    assert_eq!(m.matches("/docs/a/b").unwrap().path, "/docs");
}

#[test]
fn test_join_paths() {
    assert_eq!(join_paths("", "/users"), "/users");
    assert_eq!(join_paths("/app", "users"), "/app/users");
    assert_eq!(join_paths("/app/", "/users/"), "/app/users/");
    assert_eq!(join_paths("/docs/*rest", "/intro"), "/docs/intro");
    assert_eq!(join_paths("/files/:path*", "x"), "/files/x");
    assert_eq!(join_paths("/", "/"), "/");
}

#[test]
fn test_truncate_at_wildcard() {
    assert_eq!(truncate_at_wildcard("/docs/*rest"), "/docs");
    assert_eq!(truncate_at_wildcard("/files/:p*"), "/files");
    assert_eq!(truncate_at_wildcard("/users/:id"), "/users/:id");
}

#[test]
fn test_params_last_write_wins() {
    let params: Params = [("id", "1"), ("id", "2")].into_iter().collect();
    assert_eq!(params.get("id"), Some("2"));
    assert_eq!(params.to_map().get("id").map(String::as_str), Some("2"));
}
