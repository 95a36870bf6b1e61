//! # Middleware Module
//!
//! Built-in wrap middleware. Each one is an ordinary
//! [`Handler`](crate::dispatcher::Handler) that calls
//! [`Context::next`](crate::dispatcher::Context::next) to run the rest of the
//! chain, so its code before that call runs on the way in and its code after
//! runs on the way out.
//!
//! - [`logger`] - one structured event per request with status and latency
//! - [`recovery`] - turns a panicking handler into an aborted 500
//! - [`RequestMetrics`] - atomic request, abort and 404 counters
//!
//! ```rust
//! use rough_router::dispatcher::Engine;
//! use rough_router::middleware::{logger, recovery, RequestMetrics};
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(RequestMetrics::new());
//! let mut engine = Engine::new();
//! engine.use_handlers([recovery(), logger(), metrics.handler()]);
//! ```

mod logger;
mod metrics;
mod recovery;

pub use logger::logger;
pub use metrics::RequestMetrics;
pub use recovery::recovery;
