use http::StatusCode;
use std::sync::Arc;
use tracing::debug;

use super::context::{Context, Handler};
use crate::router::{HandlerChain, Resolution, RouteError, RouteInfo, Router, RouterGroup};
use crate::runtime_config::RouterConfig;

/// Router plus the handler chains that run around it.
///
/// Global middleware added with [`Engine::use_handlers`] is copied into every
/// route registered afterwards, so install it before building routes.
pub struct Engine {
    router: Router<Handler>,
    middleware: Vec<Handler>,
    no_route: Vec<Handler>,
    all_no_route: HandlerChain<Handler>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(RouterConfig::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            router: Router::with_config(config),
            middleware: Vec::new(),
            no_route: Vec::new(),
            all_no_route: Arc::new([]),
        }
    }

    fn rebuild_404_handlers(&mut self) {
        self.all_no_route = self
            .middleware
            .iter()
            .chain(&self.no_route)
            .cloned()
            .collect();
    }

    /// Append global middleware.
    pub fn use_handlers(&mut self, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.middleware.extend(handlers);
        self.rebuild_404_handlers();
        self
    }

    /// Handlers run, after global middleware, when no route matches.
    pub fn no_route(&mut self, handlers: impl IntoIterator<Item = Handler>) -> &mut Self {
        self.no_route = handlers.into_iter().collect();
        self.rebuild_404_handlers();
        self
    }

    /// The `/` group carrying the global middleware.
    pub fn root_group(&mut self) -> RouterGroup<'_, Handler> {
        RouterGroup::new(&mut self.router, "/", self.middleware.clone())
    }

    /// Group rooted at `relative` with extra middleware.
    pub fn group(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> RouterGroup<'_, Handler> {
        let mut chain = self.middleware.clone();
        chain.extend(handlers);
        RouterGroup::new(&mut self.router, crate::router::join_paths("/", relative), chain)
    }

    /// Register a route directly (global middleware prepended).
    ///
    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn handle(
        &mut self,
        method: &str,
        path: &str,
        handlers: impl IntoIterator<Item = Handler>,
    ) -> Result<&mut Self, RouteError> {
        self.root_group().handle(method, path, handlers)?;
        Ok(self)
    }

    #[must_use]
    pub fn router(&self) -> &Router<Handler> {
        &self.router
    }

    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.router.routes()
    }

    /// Route one request and run its chain.
    ///
    /// Matched routes run their handlers; redirects set status and location
    /// without running anything; misses run global middleware plus the
    /// no-route handlers with status 404 preset.
    pub fn dispatch(&self, method: &str, path: &str, forwarded_prefix: Option<&str>) -> Context {
        let mut ctx = Context::new(method, path);

        match self.router.resolve(method, path, forwarded_prefix) {
            Resolution::Matched(lookup) => {
                if let Some(handlers) = lookup.handlers {
                    ctx.use_chain(handlers);
                }
                ctx.set_route(lookup.params, lookup.full_path);
                debug!(
                    method = %method,
                    route = ctx.full_path().unwrap_or_default(),
                    handler_count = ctx.handler_count(),
                    "Dispatching"
                );
                ctx.next();
            }
            Resolution::Redirect { location, status } => {
                ctx.set_redirect(status, location);
            }
            Resolution::NotFound => {
                ctx.set_status(StatusCode::NOT_FOUND);
                ctx.use_chain(&self.all_no_route);
                ctx.next();
            }
        }

        ctx
    }
}
