use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use http::StatusCode;
use tracing::error;

use crate::dispatcher::{handler_fn, Handler};

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

/// Panic recovery middleware.
///
/// A panic in any later handler is caught here; the chain is aborted with
/// status 500 and the panic message is logged. Place it first so it covers
/// every other handler.
#[must_use]
pub fn recovery() -> Handler {
    handler_fn(|ctx| {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| ctx.next()));
        if let Err(payload) = outcome {
            error!(
                method = %ctx.method(),
                path = %ctx.path(),
                panic = panic_message(payload.as_ref()),
                "Handler panicked, request aborted"
            );
            ctx.abort_with_status(StatusCode::INTERNAL_SERVER_ERROR);
        }
    })
}
