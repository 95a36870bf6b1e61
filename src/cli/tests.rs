//! Unit tests for CLI commands

use crate::cli::{render_resolution, render_routes, Cli, Commands, OutputFormat, RouteFile};
use crate::runtime_config::RouterConfig;
use clap::Parser;

const ROUTES: &str = r#"
[router]
redirect_fixed_path = true

[[route]]
method = "GET"
path = "/users/:id"
handlers = ["auth", "show_user"]

[[route]]
method = "POST"
path = "/users"
handlers = ["create_user"]

[[route]]
method = "ANY"
path = "/static/*filepath"
handlers = ["files"]
"#;

#[test]
fn test_list_command_parses() {
    let cli = Cli::try_parse_from(["rough-routes", "list", "--routes", "routes.toml"]).unwrap();
    match cli.command {
        Commands::List { routes, format } => {
            assert_eq!(routes.to_string_lossy(), "routes.toml");
            assert_eq!(format, OutputFormat::Text);
        }
        other => panic!("Expected List command, got {other:?}"),
    }
}

#[test]
fn test_lookup_command_parses() {
    let cli = Cli::try_parse_from([
        "rough-routes",
        "lookup",
        "-r",
        "routes.toml",
        "GET",
        "/users/42",
        "--fix-path",
        "--forwarded-prefix",
        "/api",
    ])
    .unwrap();
    match cli.command {
        Commands::Lookup {
            method,
            path,
            fix_path,
            forwarded_prefix,
            ..
        } => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/users/42");
            assert!(fix_path);
            assert_eq!(forwarded_prefix.as_deref(), Some("/api"));
        }
        other => panic!("Expected Lookup command, got {other:?}"),
    }
}

#[test]
fn test_lookup_requires_path() {
    assert!(Cli::try_parse_from(["rough-routes", "lookup", "-r", "routes.toml", "GET"]).is_err());
}

#[test]
fn test_route_file_parse() {
    let file = RouteFile::parse(ROUTES).unwrap();
    assert!(file.router.redirect_fixed_path);
    assert!(file.router.redirect_trailing_slash);
    assert_eq!(file.routes.len(), 3);
    assert_eq!(file.routes[0].handlers, ["auth", "show_user"]);

    let empty = RouteFile::parse("").unwrap();
    assert!(empty.routes.is_empty());
    assert_eq!(empty.router, RouterConfig::default());

    assert!(RouteFile::parse("[[route]]\nmethod = \"GET\"\n").is_err());
    assert!(RouteFile::parse("[[route]]\nmethod = \"GET\"\npath = \"/\"\nhandlers = [\"a\"]\nextra = 1\n").is_err());
}

#[test]
fn test_build_router_expands_any() {
    let file = RouteFile::parse(ROUTES).unwrap();
    let router = file.build_router(file.router).unwrap();
    let routes = router.routes();
    assert_eq!(routes.len(), 2 + 9);
    assert!(routes
        .iter()
        .any(|r| r.method == "TRACE" && r.path == "/static/*filepath"));
}

#[test]
fn test_build_router_reports_conflicts() {
    let file = RouteFile::parse(
        r#"
[[route]]
method = "GET"
path = "/user/:id"
handlers = ["a"]

[[route]]
method = "GET"
path = "/user/:name"
handlers = ["b"]
"#,
    )
    .unwrap();
    let err = file.build_router(file.router).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Failed to register GET /user/:name"), "{message}");
    assert!(message.contains("wildcard"), "{message}");
}

#[test]
fn test_render_routes() {
    let file = RouteFile::parse(ROUTES).unwrap();
    let router = file.build_router(file.router).unwrap();
    let routes: Vec<_> = router
        .routes()
        .into_iter()
        .filter(|r| r.method == "GET" || r.method == "POST")
        .collect();

    let text = render_routes(&routes, OutputFormat::Text).unwrap();
    assert!(text.contains("GET      /users/:id (2 handlers)"), "{text}");
    assert!(text.contains("POST     /users (1 handler)"), "{text}");

    let json = render_routes(&routes, OutputFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(routes.len()));
    assert!(parsed[0]["handler_count"].is_u64());
}

#[test]
fn test_render_resolution() {
    let file = RouteFile::parse(ROUTES).unwrap();
    let router = file.build_router(file.router).unwrap();

    let out = render_resolution(&router.resolve("GET", "/users/42", None)).unwrap();
    assert_eq!(out, "matched /users/:id [auth -> show_user]\n  id = 42\n");

    let out = render_resolution(&router.resolve("GET", "/users/42/", None)).unwrap();
    assert_eq!(out, "redirect 301 /users/42\n");

    let out = render_resolution(&router.resolve("GET", "/USERS/42", None)).unwrap();
    assert_eq!(out, "redirect 301 /users/42\n");

    let out = render_resolution(&router.resolve("DELETE", "/users/42", None)).unwrap();
    assert_eq!(out, "not found\n");
}
