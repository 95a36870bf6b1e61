//! Router core module - hot path for request routing.
//!
//! [`Router`] maps each HTTP method to its own radix [`Tree`] and stores an
//! immutable handler chain per route. Registration happens once at startup;
//! afterwards every method takes `&self` and may run from any thread.

use http::{Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::error::RouteError;
use super::params::Params;
use super::path::{
    count_params, count_sections, is_valid_method, sanitize_prefix, trailing_slash_target,
};
use super::radix::Tree;
use crate::runtime_config::RouterConfig;

/// Ordered, shared handler chain stored at a route's terminal node.
pub type HandlerChain<H> = Arc<[H]>;

/// Longest handler chain a route may carry, group middleware included.
///
/// The dispatch cursor reserves the next index as its abort sentinel.
pub const MAX_HANDLERS: usize = 62;

/// Lookups slower than this are logged at warn level
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

#[derive(Debug)]
struct MethodTree<H> {
    method: Method,
    root: Tree<HandlerChain<H>>,
}

/// Result of matching one request against the router
#[derive(Debug)]
pub struct RouteLookup<'r, H> {
    /// The matched handler chain, `None` when nothing matched
    pub handlers: Option<&'r HandlerChain<H>>,
    /// Captured path parameters in pattern order (empty when unmatched)
    pub params: Params,
    /// The registered pattern, e.g. `/users/:id`
    pub full_path: Option<&'r str>,
    /// The same path with a trailing slash added or removed is registered
    pub trailing_slash_redirect: bool,
}

impl<H> RouteLookup<'_, H> {
    fn not_found() -> Self {
        Self {
            handlers: None,
            params: Params::new(),
            full_path: None,
            trailing_slash_redirect: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn found(&self) -> bool {
        self.handlers.is_some()
    }
}

/// What the caller should do with a request
#[derive(Debug)]
pub enum Resolution<'r, H> {
    /// Run the matched handler chain
    Matched(RouteLookup<'r, H>),
    /// Redirect the client to `location`
    Redirect { location: String, status: StatusCode },
    /// No route and no redirect applies
    NotFound,
}

/// One registered route, as listed by [`Router::routes`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
    pub handler_count: usize,
}

/// Method-keyed collection of radix trees
#[derive(Debug)]
pub struct Router<H> {
    trees: Vec<MethodTree<H>>,
    max_params: usize,
    max_sections: usize,
    config: RouterConfig,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::with_config(RouterConfig::default())
    }
}

fn redirect_status(method: &str) -> StatusCode {
    if method == Method::GET.as_str() {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::TEMPORARY_REDIRECT
    }
}

impl<H> Router<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            trees: Vec::with_capacity(9),
            max_params: 0,
            max_sections: 0,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Largest wildcard count of any registered route
    #[must_use]
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// Largest `/` count of any registered route
    #[must_use]
    pub fn max_sections(&self) -> usize {
        self.max_sections
    }

    fn tree(&self, method: &str) -> Option<&MethodTree<H>> {
        self.trees.iter().find(|t| t.method.as_str() == method)
    }

    /// Register a handler chain for `method` and `path`.
    ///
    /// # Errors
    ///
    /// Fails for an invalid method, a path without a leading `/`, an empty or
    /// oversized chain, and every tree conflict (duplicate route, wildcard
    /// siblings, misplaced catch-all, malformed wildcard).
    pub fn add_route(&mut self, method: &str, path: &str, handlers: Vec<H>) -> Result<(), RouteError> {
        if !is_valid_method(method) {
            return Err(RouteError::InvalidMethod {
                method: method.to_owned(),
            });
        }
        let parsed = Method::from_bytes(method.as_bytes()).map_err(|_| RouteError::InvalidMethod {
            method: method.to_owned(),
        })?;
        if !path.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash {
                path: path.to_owned(),
            });
        }
        if handlers.is_empty() {
            return Err(RouteError::EmptyHandlers {
                path: path.to_owned(),
            });
        }
        if handlers.len() > MAX_HANDLERS {
            return Err(RouteError::TooManyHandlers {
                path: path.to_owned(),
                count: handlers.len(),
                max: MAX_HANDLERS,
            });
        }

        let handler_count = handlers.len();
        let pos = match self.trees.iter().position(|t| t.method == parsed) {
            Some(pos) => pos,
            None => {
                self.trees.push(MethodTree {
                    method: parsed,
                    root: Tree::new(),
                });
                self.trees.len() - 1
            }
        };
        self.trees[pos].root.insert(path, Arc::from(handlers))?;

        self.max_params = self.max_params.max(count_params(path));
        self.max_sections = self.max_sections.max(count_sections(path));

        info!(
            method = %method,
            path = %path,
            handler_count,
            "Route registered"
        );
        Ok(())
    }

    /// Match `method` and `path` against the registered routes.
    ///
    /// Scratch buffers are sized from the tracked maxima. When nothing
    /// matches, `trailing_slash_redirect` is set only if the sibling path with
    /// the slash toggled is itself registered.
    #[must_use]
    pub fn lookup(&self, method: &str, path: &str) -> RouteLookup<'_, H> {
        debug!(method = %method, path = %path, "Route match attempt");
        let match_start = Instant::now();

        let Some(tree) = self.tree(method) else {
            warn!(method = %method, path = %path, "No routes registered for method");
            return RouteLookup::not_found();
        };

        let mut params = Params::with_capacity(self.max_params);
        let mut skipped = Vec::with_capacity(self.max_sections);
        let value = tree.root.get_value(
            path,
            &mut params,
            &mut skipped,
            self.config.unescape_path_values,
        );
        let match_duration = match_start.elapsed();

        if let Some(handlers) = value.value {
            if match_duration > SLOW_MATCH_THRESHOLD {
                warn!(
                    method = %method,
                    path = %path,
                    route_pattern = value.full_path.unwrap_or_default(),
                    path_params = ?params,
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                debug!(
                    method = %method,
                    path = %path,
                    route_pattern = value.full_path.unwrap_or_default(),
                    path_params = ?params,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }
            return RouteLookup {
                handlers: Some(handlers),
                params,
                full_path: value.full_path,
                trailing_slash_redirect: false,
            };
        }

        let trailing_slash_redirect = value.tsr
            && path != "/"
            && tree
                .root
                .lookup(&trailing_slash_target(path, None))
                .0
                .value
                .is_some();

        warn!(
            method = %method,
            path = %path,
            trailing_slash_redirect,
            duration_us = match_duration.as_micros(),
            "No route matched"
        );

        RouteLookup {
            trailing_slash_redirect,
            ..RouteLookup::not_found()
        }
    }

    /// Case-insensitive match of `path` within `method`'s tree, returning the
    /// path with the registered casing. With `fix_trailing_slash` a missing or
    /// extra trailing slash is corrected as well.
    #[must_use]
    pub fn find_case_insensitive_path(
        &self,
        method: &str,
        path: &str,
        fix_trailing_slash: bool,
    ) -> Option<String> {
        self.tree(method)?
            .root
            .find_case_insensitive_path(path, fix_trailing_slash)
    }

    /// Decide between running a route, redirecting, or answering 404.
    ///
    /// Redirects are never issued for `/` or `CONNECT`. `forwarded_prefix` is
    /// the raw `X-Forwarded-Prefix` header, sanitised before use.
    #[must_use]
    pub fn resolve(
        &self,
        method: &str,
        path: &str,
        forwarded_prefix: Option<&str>,
    ) -> Resolution<'_, H> {
        let lookup = self.lookup(method, path);
        if lookup.found() {
            return Resolution::Matched(lookup);
        }
        if method == Method::CONNECT.as_str() || path == "/" {
            return Resolution::NotFound;
        }

        if lookup.trailing_slash_redirect && self.config.redirect_trailing_slash {
            let prefix = forwarded_prefix.and_then(sanitize_prefix);
            let location = trailing_slash_target(path, prefix.as_deref());
            let status = redirect_status(method);
            info!(%status, from = %path, to = %location, "Redirecting trailing slash");
            return Resolution::Redirect { location, status };
        }

        if self.config.redirect_fixed_path {
            if let Some(location) = self.find_case_insensitive_path(method, path, true) {
                if location != path {
                    let status = redirect_status(method);
                    info!(%status, from = %path, to = %location, "Redirecting to corrected path");
                    return Resolution::Redirect { location, status };
                }
            }
        }

        Resolution::NotFound
    }

    /// Every registered route, grouped by method in registration order of the
    /// methods and in tree order within a method.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.trees
            .iter()
            .flat_map(|t| {
                t.root.routes().into_iter().map(|(path, chain)| RouteInfo {
                    method: t.method.to_string(),
                    path: path.to_owned(),
                    handler_count: chain.len(),
                })
            })
            .collect()
    }

    /// Log the route table, one event per route.
    pub fn dump_routes(&self) {
        let routes = self.routes();
        info!(
            routes_count = routes.len(),
            max_params = self.max_params,
            max_sections = self.max_sections,
            "Routing table"
        );
        for route in routes {
            info!(
                method = %route.method,
                path = %route.path,
                handler_count = route.handler_count,
                "Route"
            );
        }
    }
}
