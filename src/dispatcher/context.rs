use http::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::router::{HandlerChain, Params, MAX_HANDLERS};

/// A request handler or middleware.
///
/// Middleware wraps the rest of the chain by calling [`Context::next`]: code
/// before the call runs on the way in, code after it on the way out.
pub type Handler = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Cursor value that stops the chain. Larger than any valid handler index.
pub const ABORT_INDEX: i8 = i8::MAX >> 1;

const _: () = assert!(MAX_HANDLERS < ABORT_INDEX as usize);

/// Per-request state threaded through a handler chain.
///
/// Owned by one request; never shared across threads or reused.
pub struct Context {
    method: String,
    path: String,
    params: Params,
    full_path: Option<String>,
    handlers: HandlerChain<Handler>,
    index: i8,
    keys: HashMap<String, Value>,
    status: StatusCode,
    location: Option<String>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("full_path", &self.full_path)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("keys", &self.keys)
            .field("status", &self.status)
            .field("location", &self.location)
            .finish()
    }
}

impl Context {
    /// A context with an empty chain and status 200.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            params: Params::new(),
            full_path: None,
            handlers: Arc::new([]),
            index: -1,
            keys: HashMap::new(),
            status: StatusCode::OK,
            location: None,
        }
    }

    /// Replace the chain and rewind the cursor.
    ///
    /// A chain longer than [`MAX_HANDLERS`] is cut off at the abort sentinel
    /// and then reads as aborted.
    #[must_use]
    pub fn with_handlers(mut self, handlers: HandlerChain<Handler>) -> Self {
        self.handlers = handlers;
        self.index = -1;
        self
    }

    pub(crate) fn set_route(&mut self, params: Params, full_path: Option<&str>) {
        self.params = params;
        self.full_path = full_path.map(str::to_owned);
    }

    pub(crate) fn set_redirect(&mut self, status: StatusCode, location: String) {
        self.status = status;
        self.location = Some(location);
    }

    fn current(&self) -> Option<Handler> {
        if self.is_aborted() {
            return None;
        }
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.handlers.get(i))
            .map(Arc::clone)
    }

    /// Step the cursor, stopping one past the last handler. Unwinding wrap
    /// middleware calls this once per nesting level, so the cap keeps a long
    /// chain from drifting into the abort sentinel.
    fn advance(&mut self) {
        if self.is_aborted() {
            return;
        }
        let end = i8::try_from(self.handlers.len())
            .unwrap_or(ABORT_INDEX)
            .min(ABORT_INDEX);
        self.index = self.index.saturating_add(1).min(end);
    }

    /// Run the remaining handlers in order.
    ///
    /// A handler that calls `next` itself runs everything after it before
    /// its own call returns; the outer loop then finds the cursor at the
    /// end and stops.
    pub fn next(&mut self) {
        self.advance();
        while let Some(handler) = self.current() {
            (*handler)(self);
            self.advance();
        }
    }

    /// Stop the chain. Handlers already running finish; no later handler
    /// starts.
    pub fn abort(&mut self) {
        self.index = ABORT_INDEX;
    }

    pub fn abort_with_status(&mut self, status: StatusCode) {
        self.status = status;
        self.abort();
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.index >= ABORT_INDEX
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameter by name
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The registered pattern of the matched route
    #[must_use]
    pub fn full_path(&self) -> Option<&str> {
        self.full_path.as_deref()
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Redirect target chosen by the router, if any
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Store a value for later handlers in the chain.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.keys.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.keys.get(key)
    }

    pub(crate) fn use_chain(&mut self, handlers: &HandlerChain<Handler>) {
        self.handlers = Arc::clone(handlers);
        self.index = -1;
    }
}
