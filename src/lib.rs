//! # rough-router
//!
//! **rough-router** is an HTTP request router built on a compressed radix
//! tree, with one tree per HTTP method and an ordered handler chain per route.
//!
//! ## Overview
//!
//! Routes are registered once at startup and matched many times afterwards.
//! Matching walks the request path through the tree, so its cost follows the
//! path length rather than the number of routes. When a path does not match
//! exactly, the router can recommend a trailing-slash redirect or find the
//! case-insensitive correction.
//!
//! ## Architecture
//!
//! - **[`router`]** - radix tree, per-method route table, route groups and path helpers
//! - **[`dispatcher`]** - per-request cursor over a handler chain and the [`Engine`] that drives it
//! - **[`middleware`]** - built-in wrap middleware (logging, panic recovery, metrics)
//! - **[`runtime_config`]** - redirect and decoding switches from the environment or TOML
//! - **[`logging`]** - `tracing` subscriber setup for binaries
//! - **[`cli`]** - the `rough-routes` command for inspecting TOML route files
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Engine as dispatcher::Engine
//!     participant Router as router::Router
//!     participant Tree as router::Tree
//!     participant Chain as Handler chain
//!
//!     Client->>Engine: dispatch(method, path)
//!     Engine->>Router: resolve(method, path, prefix)
//!     Router->>Tree: get_value(path)
//!     Tree-->>Router: handlers, params, tsr
//!     alt matched
//!         Router-->>Engine: Matched
//!         Engine->>Chain: Context::next()
//!     else sibling or case-corrected path exists
//!         Router-->>Engine: Redirect 301/307
//!     else
//!         Router-->>Engine: NotFound
//!         Engine->>Chain: middleware + no-route handlers (404)
//!     end
//!     Engine-->>Client: Context
//! ```
//!
//! ## Pattern Syntax
//!
//! | Pattern | Matches | Params |
//! |---------|---------|--------|
//! | `/users` | `/users` only | none |
//! | `/users/:id` | `/users/42`, not `/users/42/x` | `id = 42` |
//! | `/files/:dir/*path` | `/files/js/a/b.js` | `dir = js`, `path = /a/b.js` |
//!
//! A static segment wins over a parameter at the same position. Conflicting
//! patterns (two parameter names at one position, anything beside a
//! catch-all, a catch-all that is not last) are rejected at registration.
//!
//! ## Quick Start
//!
//! ```rust
//! use rough_router::dispatcher::{handler_fn, Engine};
//! use rough_router::middleware::{logger, recovery};
//! use http::StatusCode;
//!
//! let mut engine = Engine::new();
//! engine.use_handlers([recovery(), logger()]);
//!
//! {
//!     let mut api = engine.group("/api/v1", []);
//!     api.get("/users/:id", [handler_fn(|ctx| {
//!         let id = ctx.param("id").unwrap_or_default().to_owned();
//!         ctx.set("id", id);
//!     })])
//!     .unwrap();
//! }
//!
//! let ctx = engine.dispatch("GET", "/api/v1/users/7", None);
//! assert_eq!(ctx.full_path(), Some("/api/v1/users/:id"));
//! assert_eq!(ctx.get("id").and_then(|v| v.as_str()), Some("7"));
//!
//! let ctx = engine.dispatch("GET", "/api/v1/nope", None);
//! assert_eq!(ctx.status(), StatusCode::NOT_FOUND);
//! ```
//!
//! ## Concurrency
//!
//! Registration takes `&mut self` and must finish before serving. Lookups and
//! dispatch take `&self`; share the engine behind an `Arc` across threads.
//! Per-request state (parameters, backtracking stack, cursor) is allocated
//! per call and never shared.

pub mod cli;
pub mod dispatcher;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;

pub use dispatcher::{handler_fn, Context, Engine, Handler};
pub use router::{Params, RouteError, Router, RouterGroup};
pub use runtime_config::RouterConfig;
