//! # Dispatcher Module
//!
//! Runs the handler chain chosen by the router for one request.
//!
//! ## Overview
//!
//! - [`Context`] is the per-request cursor over an ordered chain of
//!   [`Handler`]s, starting one position before the first handler
//! - [`Context::next`] advances through the chain; a handler that calls it
//!   wraps everything after it, so middleware runs in registration order on
//!   the way in and in reverse order on the way out
//! - [`Context::abort`] moves the cursor to [`ABORT_INDEX`], past any real
//!   chain, so no later handler starts (including ones inherited from outer
//!   groups)
//! - [`Engine`] ties a [`Router`](crate::router::Router) to global middleware
//!   and a no-route chain, and turns a method + path into a finished
//!   [`Context`]
//!
//! ## Example
//!
//! ```rust
//! use rough_router::dispatcher::{handler_fn, Engine};
//! use http::StatusCode;
//!
//! let mut engine = Engine::new();
//! engine
//!     .root_group()
//!     .get("/users/:id", [handler_fn(|ctx| {
//!         let id = ctx.param("id").unwrap_or_default().to_owned();
//!         ctx.set("user", id);
//!     })])
//!     .unwrap();
//!
//! let ctx = engine.dispatch("GET", "/users/42", None);
//! assert_eq!(ctx.status(), StatusCode::OK);
//! assert_eq!(ctx.get("user").and_then(|v| v.as_str()), Some("42"));
//!
//! let ctx = engine.dispatch("GET", "/users/42/", None);
//! assert_eq!(ctx.status(), StatusCode::MOVED_PERMANENTLY);
//! assert_eq!(ctx.location(), Some("/users/42"));
//! ```
//!
//! ## Concurrency
//!
//! The router is read-only once routes are registered, so an `Engine` can be
//! shared behind an `Arc` and dispatched from many threads. Each call creates
//! its own `Context`; a context is never shared between requests.

mod context;
mod core;

pub use context::{handler_fn, Context, Handler, ABORT_INDEX};
pub use core::Engine;
