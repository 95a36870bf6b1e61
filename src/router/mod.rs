//! # Router Module
//!
//! Path matching for rough-router: one compressed radix tree per HTTP method,
//! each route storing an ordered handler chain.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Registering route patterns (static text, `:name` parameters, a trailing
//!   `*name` catch-all) and rejecting ambiguous or malformed tables
//! - Matching a request path in time proportional to the path length
//! - Extracting parameter values in pattern order
//! - Recommending trailing-slash and case-corrected redirects when an exact
//!   match fails
//!
//! ## Architecture
//!
//! 1. **Registration** ([`Router::add_route`], [`RouterGroup`]): each pattern
//!    is inserted into its method's [`Tree`]. Nodes are split lazily where a
//!    new pattern diverges, and every node on the insertion path gains
//!    priority so busy branches are probed first.
//!
//! 2. **Matching** ([`Router::lookup`]): the tree is walked from the root,
//!    preferring static children. When a static branch dead-ends, the walk
//!    resumes at the wildcard sibling it passed over.
//!
//! 3. **Resolution** ([`Router::resolve`]): a miss may become a 301/307
//!    redirect to the trailing-slash sibling or, when enabled, to the
//!    case-insensitive correction.
//!
//! ## Example
//!
//! ```rust
//! use rough_router::router::Router;
//!
//! let mut router: Router<&str> = Router::new();
//! router.add_route("GET", "/users/:id", vec!["get_user"]).unwrap();
//! router.add_route("GET", "/static/*filepath", vec!["files"]).unwrap();
//!
//! let lookup = router.lookup("GET", "/users/42");
//! assert!(lookup.found());
//! assert_eq!(lookup.params.get("id"), Some("42"));
//! assert_eq!(lookup.full_path, Some("/users/:id"));
//!
//! let lookup = router.lookup("GET", "/static/css/site.css");
//! assert_eq!(lookup.params.get("filepath"), Some("/css/site.css"));
//!
//! let lookup = router.lookup("GET", "/users/42/");
//! assert!(!lookup.found());
//! assert!(lookup.trailing_slash_redirect);
//! ```
//!
//! ## Precedence
//!
//! A static segment always wins over a parameter at the same position,
//! whichever was registered first: with `/hello/:name` and `/hello/pp`,
//! `/hello/pp` runs the static route and `/hello/ppx` the parameter route.
//!
//! ## Lifecycle
//!
//! Build the table completely at startup. Registration needs `&mut self`;
//! lookups take `&self` and are safe from any number of threads.

mod core;
mod error;
mod group;
mod params;
mod path;
mod radix;
#[cfg(test)]
mod tests;

pub use core::{HandlerChain, Resolution, RouteInfo, RouteLookup, Router, MAX_HANDLERS};
pub use error::RouteError;
pub use group::{RouterGroup, ANY_METHODS};
pub use params::{ParamVec, Params, MAX_INLINE_PARAMS};
pub use path::{clean_path, count_params, count_sections, join_paths, sanitize_prefix};
pub use radix::{RouteValue, SkippedNode, Tree};
