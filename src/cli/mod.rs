//! # CLI Module
//!
//! Command-line access to route tables kept in TOML files.
//!
//! ## Commands
//!
//! ### `list`
//!
//! Print every registered route with its handler count:
//!
//! ```bash
//! rough-routes list --routes routes.toml
//! rough-routes list --routes routes.toml --format json
//! ```
//!
//! ### `lookup`
//!
//! Resolve one request the way a server would, printing the matched pattern
//! and parameters, the redirect target, or `not found`:
//!
//! ```bash
//! rough-routes lookup --routes routes.toml GET /users/42
//! rough-routes lookup --routes routes.toml GET /USERS/42 --fix-path
//! rough-routes lookup --routes routes.toml GET /users/42/ --forwarded-prefix /api
//! ```
//!
//! ## Route Files
//!
//! ```toml
//! [router]
//! redirect_trailing_slash = true
//!
//! [[route]]
//! method = "GET"
//! path = "/users/:id"
//! handlers = ["auth", "show_user"]
//!
//! [[route]]
//! method = "ANY"
//! path = "/static/*filepath"
//! handlers = ["files"]
//! ```
//!
//! Registration errors (duplicate routes, wildcard conflicts) are reported
//! with the offending route and a non-zero exit code.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    render_resolution, render_routes, run_cli, Cli, Commands, OutputFormat, RouteFile, RouteSpec,
};
