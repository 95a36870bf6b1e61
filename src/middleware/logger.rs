use std::time::Instant;

use tracing::{error, info, info_span, warn};

use crate::dispatcher::{handler_fn, Handler};

/// Request logging middleware.
///
/// Opens a `request` span around the rest of the chain and logs one event
/// when it unwinds: `error` for 5xx, `warn` for 4xx, `info` otherwise.
#[must_use]
pub fn logger() -> Handler {
    handler_fn(|ctx| {
        let start = Instant::now();
        let span = info_span!(
            "request",
            method = %ctx.method(),
            path = %ctx.path(),
            route = ctx.full_path().unwrap_or_default(),
        );
        let _entered = span.enter();

        ctx.next();

        let latency_us = start.elapsed().as_micros();
        let status = ctx.status().as_u16();
        let aborted = ctx.is_aborted();
        if ctx.status().is_server_error() {
            error!(status, latency_us, aborted, "Request failed");
        } else if ctx.status().is_client_error() {
            warn!(status, latency_us, aborted, "Request rejected");
        } else {
            info!(status, latency_us, aborted, "Request completed");
        }
    })
}
