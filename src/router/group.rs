use super::core::Router;
use super::error::RouteError;
use super::path::join_paths;

/// Methods registered by [`RouterGroup::any`]
pub const ANY_METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "PATCH", "HEAD", "OPTIONS", "DELETE", "CONNECT", "TRACE",
];

/// Registers routes under a shared base path with a shared handler prefix.
///
/// Every route gets `join_paths(base_path, relative)` as its pattern and the
/// group's handlers followed by its own as its chain. Child groups extend
/// both.
///
/// ```rust
/// use rough_router::router::{Router, RouterGroup};
///
/// let mut router: Router<&str> = Router::new();
/// let mut api = RouterGroup::new(&mut router, "/api", vec!["auth"]);
/// api.get("/users/:id", ["show_user"]).unwrap();
/// api.group("v2", ["v2_headers"]).post("/users", ["create_user"]).unwrap();
///
/// let lookup = router.lookup("POST", "/api/v2/users");
/// assert_eq!(&lookup.handlers.unwrap()[..], ["auth", "v2_headers", "create_user"]);
/// ```
#[derive(Debug)]
pub struct RouterGroup<'r, H> {
    router: &'r mut Router<H>,
    base_path: String,
    handlers: Vec<H>,
}

impl<'r, H: Clone> RouterGroup<'r, H> {
    pub fn new(router: &'r mut Router<H>, base_path: impl Into<String>, handlers: Vec<H>) -> Self {
        Self {
            router,
            base_path: base_path.into(),
            handlers,
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn handlers(&self) -> &[H] {
        &self.handlers
    }

    /// Append middleware for routes registered on this group from now on.
    pub fn use_handlers(&mut self, handlers: impl IntoIterator<Item = H>) -> &mut Self {
        self.handlers.extend(handlers);
        self
    }

    /// A child group below `relative` with `handlers` added to this group's.
    pub fn group(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> RouterGroup<'_, H> {
        RouterGroup {
            base_path: join_paths(&self.base_path, relative),
            handlers: self.combine_handlers(handlers),
            router: &mut *self.router,
        }
    }

    fn combine_handlers(&self, handlers: impl IntoIterator<Item = H>) -> Vec<H> {
        let mut merged = self.handlers.clone();
        merged.extend(handlers);
        merged
    }

    /// Register `handlers` for `method` at `relative` below the base path.
    ///
    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn handle(
        &mut self,
        method: &str,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        let absolute = join_paths(&self.base_path, relative);
        let chain = self.combine_handlers(handlers);
        self.router.add_route(method, &absolute, chain)?;
        Ok(self)
    }

    /// Shortcut for `handle("GET", ..)`.
    ///
    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn get(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("GET", relative, handlers)
    }

    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn post(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("POST", relative, handlers)
    }

    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn put(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("PUT", relative, handlers)
    }

    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn patch(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("PATCH", relative, handlers)
    }

    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn delete(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("DELETE", relative, handlers)
    }

    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn head(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("HEAD", relative, handlers)
    }

    /// # Errors
    ///
    /// See [`Router::add_route`].
    pub fn options(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        self.handle("OPTIONS", relative, handlers)
    }

    /// Register the same chain for every method in [`ANY_METHODS`].
    ///
    /// # Errors
    ///
    /// Stops at the first method that fails; earlier methods stay registered.
    pub fn any(
        &mut self,
        relative: &str,
        handlers: impl IntoIterator<Item = H>,
    ) -> Result<&mut Self, RouteError> {
        let handlers: Vec<H> = handlers.into_iter().collect();
        for method in ANY_METHODS {
            self.handle(method, relative, handlers.iter().cloned())?;
        }
        Ok(self)
    }
}
