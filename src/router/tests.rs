use super::{RouteError, Router};
use crate::runtime_config::RouterConfig;
use http::StatusCode;

use super::Resolution;

const GIN_ROUTES: &[&str] = &[
    "/",
    "/cmd/:tool/:sub",
    "/cmd/:tool/",
    "/src/*filepath",
    "/search/",
    "/search/:query",
    "/user_:name",
    "/user_:name/about",
    "/files/:dir/*filepath",
    "/doc/",
    "/doc/go_faq.html",
    "/doc/go1.html",
    "/info/:user/public",
    "/info/:user/project/:project",
];

/// (request path, expected pattern, expected params)
const GIN_REQUESTS: &[(&str, &str, &[(&str, &str)])] = &[
    ("/", "/", &[]),
    ("/cmd/test/", "/cmd/:tool/", &[("tool", "test")]),
    ("/cmd/test/3", "/cmd/:tool/:sub", &[("tool", "test"), ("sub", "3")]),
    ("/src/", "/src/*filepath", &[("filepath", "/")]),
    ("/src/some/file.png", "/src/*filepath", &[("filepath", "/some/file.png")]),
    ("/search/", "/search/", &[]),
    ("/search/someth!ng+in+ünìcodé", "/search/:query", &[("query", "someth!ng+in+ünìcodé")]),
    ("/user_gopher", "/user_:name", &[("name", "gopher")]),
    ("/user_gopher/about", "/user_:name/about", &[("name", "gopher")]),
    (
        "/files/js/inc/framework.js",
        "/files/:dir/*filepath",
        &[("dir", "js"), ("filepath", "/inc/framework.js")],
    ),
    ("/doc/", "/doc/", &[]),
    ("/doc/go_faq.html", "/doc/go_faq.html", &[]),
    ("/doc/go1.html", "/doc/go1.html", &[]),
    ("/info/gordon/public", "/info/:user/public", &[("user", "gordon")]),
    (
        "/info/gordon/project/go",
        "/info/:user/project/:project",
        &[("user", "gordon"), ("project", "go")],
    ),
];

fn router_with(routes: &[&'static str]) -> Router<&'static str> {
    let mut router = Router::new();
    for route in routes {
        router.add_route("GET", route, vec![*route]).unwrap();
    }
    router
}

fn assert_requests(router: &Router<&'static str>) {
    for (path, pattern, params) in GIN_REQUESTS {
        let lookup = router.lookup("GET", path);
        assert!(lookup.found(), "no match for {path}");
        assert_eq!(&lookup.handlers.unwrap()[..], [*pattern], "wrong route for {path}");
        assert_eq!(lookup.full_path, Some(*pattern));
        let captured: Vec<(&str, &str)> = lookup.params.iter().collect();
        assert_eq!(captured, *params, "wrong params for {path}");
    }
}

#[test]
fn test_every_pattern_matches_in_any_insertion_order() {
    assert_requests(&router_with(GIN_ROUTES));

    let reversed: Vec<&'static str> = GIN_ROUTES.iter().rev().copied().collect();
    assert_requests(&router_with(&reversed));

    let mut rotated = GIN_ROUTES.to_vec();
    rotated.rotate_left(5);
    assert_requests(&router_with(&rotated));
}

#[test]
fn test_unknown_paths_do_not_match() {
    let router = router_with(GIN_ROUTES);
    for path in ["/cmd/test", "/cmd", "/doc", "/info/gordon", "/nope", "/user_"] {
        assert!(!router.lookup("GET", path).found(), "{path} should not match");
    }
    assert!(!router.lookup("POST", "/").found());
}

#[test]
fn test_duplicate_route_fails() {
    let mut router = router_with(&["/user/:id", "/static"]);
    assert!(matches!(
        router.add_route("GET", "/static", vec!["again"]),
        Err(RouteError::DuplicateRoute { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "/user/:id", vec!["again"]),
        Err(RouteError::DuplicateRoute { .. })
    ));
    // Same pattern under another method is fine
    router.add_route("POST", "/static", vec!["post"]).unwrap();
}

#[test]
fn test_param_name_conflict_fails() {
    let mut router = router_with(&["/user/:id"]);
    let err = router.add_route("GET", "/user/:name", vec!["x"]).unwrap_err();
    assert!(matches!(err, RouteError::WildcardConflict { .. }));
    assert!(err.to_string().contains("param node cannot have wildcard siblings"));

    assert!(router.add_route("GET", "/user/:idx", vec!["x"]).is_err());
    router.add_route("GET", "/user/:id/profile", vec!["x"]).unwrap();
}

#[test]
fn test_static_then_catch_all_keeps_static_route() {
    let router = router_with(&["/static", "/static/*file"]);
    let lookup = router.lookup("GET", "/static");
    assert_eq!(&lookup.handlers.unwrap()[..], ["/static"]);

    let lookup = router.lookup("GET", "/static/css/a.css");
    assert_eq!(&lookup.handlers.unwrap()[..], ["/static/*file"]);
    assert_eq!(lookup.params.get("file"), Some("/css/a.css"));
}

#[test]
fn test_static_wins_over_param_in_both_orders() {
    for routes in [["/hello/:ppaa", "/hello/pp"], ["/hello/pp", "/hello/:ppaa"]] {
        let router = router_with(&routes);

        let lookup = router.lookup("GET", "/hello/pp");
        assert_eq!(&lookup.handlers.unwrap()[..], ["/hello/pp"], "order {routes:?}");
        assert!(lookup.params.is_empty());

        let lookup = router.lookup("GET", "/hello/ppx");
        assert_eq!(&lookup.handlers.unwrap()[..], ["/hello/:ppaa"], "order {routes:?}");
        assert_eq!(lookup.params.get("ppaa"), Some("ppx"));

        let lookup = router.lookup("GET", "/hello/p");
        assert_eq!(lookup.params.get("ppaa"), Some("p"));
    }
}

#[test]
fn test_backtracking_discards_params_from_abandoned_branch() {
    let router = router_with(&["/a/:x/c", "/a/b/:y/e"]);
    let lookup = router.lookup("GET", "/a/b/c");
    assert_eq!(&lookup.handlers.unwrap()[..], ["/a/:x/c"]);
    let captured: Vec<(&str, &str)> = lookup.params.iter().collect();
    assert_eq!(captured, [("x", "b")]);

    let lookup = router.lookup("GET", "/a/b/d/e");
    assert_eq!(lookup.params.get("y"), Some("d"));
}

#[test]
fn test_param_then_catch_all() {
    let router = router_with(&["/vendor/:x/*y"]);
    let lookup = router.lookup("GET", "/vendor/abc/def/ghi");
    let captured: Vec<(&str, &str)> = lookup.params.iter().collect();
    assert_eq!(captured, [("x", "abc"), ("y", "/def/ghi")]);
}

#[test]
fn test_trailing_slash_recommendation() {
    let router = router_with(&["/user", "/team/"]);

    let lookup = router.lookup("GET", "/user/");
    assert!(!lookup.found());
    assert!(lookup.trailing_slash_redirect);

    let lookup = router.lookup("GET", "/team");
    assert!(!lookup.found());
    assert!(lookup.trailing_slash_redirect);

    let lookup = router.lookup("GET", "/usr/");
    assert!(!lookup.trailing_slash_redirect);
}

#[test]
fn test_trailing_slash_recommended_only_when_sibling_exists() {
    let router = router_with(&["/:a/x", "/:a/y"]);
    let lookup = router.lookup("GET", "/5/");
    assert!(!lookup.found());
    assert!(!lookup.trailing_slash_redirect);
}

#[test]
fn test_catch_all_must_be_last() {
    let mut router: Router<&str> = Router::new();
    assert!(matches!(
        router.add_route("GET", "/html/*html/hello", vec!["x"]),
        Err(RouteError::CatchAllNotLast { .. })
    ));

    let mut router = router_with(&["/static/*file"]);
    assert!(router.add_route("GET", "/static/*other", vec!["x"]).is_err());
    assert!(router.add_route("GET", "/static/x", vec!["x"]).is_err());
}

#[test]
fn test_malformed_wildcards() {
    let mut router: Router<&str> = Router::new();
    assert!(matches!(
        router.add_route("GET", "/a/:b:c", vec!["x"]),
        Err(RouteError::MultipleWildcards { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "/a/:", vec!["x"]),
        Err(RouteError::MissingWildcardName { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "/b/*", vec!["x"]),
        Err(RouteError::MissingWildcardName { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "/c*rest", vec!["x"]),
        Err(RouteError::CatchAllMissingSlash { .. })
    ));
}

#[test]
fn test_registration_validation() {
    let mut router: Router<&str> = Router::new();
    assert!(matches!(
        router.add_route("", "/", vec!["x"]),
        Err(RouteError::InvalidMethod { .. })
    ));
    assert!(matches!(
        router.add_route("get", "/", vec!["x"]),
        Err(RouteError::InvalidMethod { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "users", vec!["x"]),
        Err(RouteError::MissingLeadingSlash { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "/", vec![]),
        Err(RouteError::EmptyHandlers { .. })
    ));
    assert!(matches!(
        router.add_route("GET", "/big", vec!["x"; super::MAX_HANDLERS + 1]),
        Err(RouteError::TooManyHandlers { .. })
    ));
    router
        .add_route("GET", "/big", vec!["x"; super::MAX_HANDLERS])
        .unwrap();
    router.add_route("PROPFIND", "/dav", vec!["x"]).unwrap();
}

#[test]
fn test_maxima_tracking() {
    let router = router_with(&["/", "/a/:b", "/a/:b/c/*d"]);
    assert_eq!(router.max_params(), 2);
    assert_eq!(router.max_sections(), 4);

    let lookup = router.lookup("GET", "/a/1/c/2");
    assert!(lookup.params.capacity() >= 2);
}

#[test]
fn test_repeated_lookups_are_identical() {
    let router = router_with(GIN_ROUTES);
    for path in ["/cmd/x/y", "/src/a/b", "/nope", "/doc"] {
        let first = router.lookup("GET", path);
        for _ in 0..3 {
            let again = router.lookup("GET", path);
            assert_eq!(again.found(), first.found());
            assert_eq!(again.full_path, first.full_path);
            assert_eq!(again.params, first.params);
            assert_eq!(again.trailing_slash_redirect, first.trailing_slash_redirect);
        }
    }
}

#[test]
fn test_case_insensitive_path() {
    let router = router_with(&["/hello/world", "/Users/:id", "/src/*filepath", "/docs/"]);

    let fix = |path: &str, slash: bool| router.find_case_insensitive_path("GET", path, slash);
    assert_eq!(fix("/HELLO/WORLD", false).as_deref(), Some("/hello/world"));
    assert_eq!(fix("/users/42", false).as_deref(), Some("/Users/42"));
    assert_eq!(fix("/SRC/css/App.css", false).as_deref(), Some("/src/css/App.css"));
    assert_eq!(fix("/HELLO/WORLD/", false), None);
    assert_eq!(fix("/HELLO/WORLD/", true).as_deref(), Some("/hello/world"));
    assert_eq!(fix("/DOCS", true).as_deref(), Some("/docs/"));
    assert_eq!(fix("/nothing", true), None);
    assert_eq!(router.find_case_insensitive_path("POST", "/hello/world", true), None);
}

#[test]
fn test_unescape_path_values() {
    let config = RouterConfig {
        unescape_path_values: true,
        ..RouterConfig::default()
    };
    let mut router = Router::with_config(config);
    router.add_route("GET", "/files/:name", vec!["file"]).unwrap();

    let lookup = router.lookup("GET", "/files/hello%20world");
    assert_eq!(lookup.params.get("name"), Some("hello world"));

    let router = router_with(&["/files/:name"]);
    let lookup = router.lookup("GET", "/files/hello%20world");
    assert_eq!(lookup.params.get("name"), Some("hello%20world"));
}

#[test]
fn test_resolve_trailing_slash_redirects() {
    let mut router = router_with(&["/user"]);
    router.add_route("POST", "/items", vec!["items"]).unwrap();
    router.add_route("CONNECT", "/tunnel", vec!["tunnel"]).unwrap();

    match router.resolve("GET", "/user/", None) {
        Resolution::Redirect { location, status } => {
            assert_eq!(location, "/user");
            assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        }
        other => panic!("expected redirect, got {other:?}"),
    }

    match router.resolve("POST", "/items/", None) {
        Resolution::Redirect { location, status } => {
            assert_eq!(location, "/items");
            assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        }
        other => panic!("expected redirect, got {other:?}"),
    }

    match router.resolve("GET", "/user/", Some("/api//v1/")) {
        Resolution::Redirect { location, .. } => assert_eq!(location, "/api/v1/user"),
        other => panic!("expected redirect, got {other:?}"),
    }

    assert!(matches!(
        router.resolve("CONNECT", "/tunnel/", None),
        Resolution::NotFound
    ));
    assert!(matches!(router.resolve("GET", "/", None), Resolution::NotFound));
    assert!(matches!(router.resolve("GET", "/user", None), Resolution::Matched(_)));
}

#[test]
fn test_resolve_respects_config() {
    let config = RouterConfig {
        redirect_trailing_slash: false,
        redirect_fixed_path: true,
        unescape_path_values: false,
    };
    let mut router = Router::with_config(config);
    router.add_route("GET", "/hello/world", vec!["hw"]).unwrap();

    match router.resolve("GET", "/HELLO/World", None) {
        Resolution::Redirect { location, status } => {
            assert_eq!(location, "/hello/world");
            assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
        }
        other => panic!("expected redirect, got {other:?}"),
    }

    // Trailing slash redirects are off, but the fixed-path search also fixes slashes
    match router.resolve("GET", "/hello/world/", None) {
        Resolution::Redirect { location, .. } => assert_eq!(location, "/hello/world"),
        other => panic!("expected redirect, got {other:?}"),
    }

    let router = router_with(&["/hello/world"]);
    assert!(matches!(
        router.resolve("GET", "/HELLO/World", None),
        Resolution::NotFound
    ));
}

#[test]
fn test_routes_listing() {
    let mut router = router_with(&["/", "/users/:id", "/src/*filepath"]);
    router.add_route("POST", "/users", vec!["a", "b"]).unwrap();

    let mut listed: Vec<(String, String, usize)> = router
        .routes()
        .into_iter()
        .map(|r| (r.method, r.path, r.handler_count))
        .collect();
    listed.sort();

    assert_eq!(
        listed,
        vec![
            ("GET".to_owned(), "/".to_owned(), 1),
            ("GET".to_owned(), "/src/*filepath".to_owned(), 1),
            ("GET".to_owned(), "/users/:id".to_owned(), 1),
            ("POST".to_owned(), "/users".to_owned(), 2),
        ]
    );
}
