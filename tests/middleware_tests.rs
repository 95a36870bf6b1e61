use http::StatusCode;
use rough_router::dispatcher::{handler_fn, Engine};
use rough_router::middleware::{logger, recovery, RequestMetrics};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn engine_with(metrics: &Arc<RequestMetrics>) -> Engine {
    let mut engine = Engine::new();
    engine.use_handlers([recovery(), logger(), metrics.handler()]);
    engine
        .handle("GET", "/ok", [handler_fn(|_| {})])
        .unwrap()
        .handle(
            "GET",
            "/boom",
            [handler_fn(|_| panic!("handler exploded"))],
        )
        .unwrap()
        .handle(
            "GET",
            "/deny",
            [handler_fn(|ctx| ctx.abort_with_status(StatusCode::UNAUTHORIZED))],
        )
        .unwrap();
    engine
}

#[test]
fn test_recovery_turns_panic_into_500() {
    let metrics = Arc::new(RequestMetrics::new());
    let engine = engine_with(&metrics);

    let ctx = engine.dispatch("GET", "/boom", None);
    assert_eq!(ctx.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(ctx.is_aborted());

    // The engine keeps serving after a panic
    let ctx = engine.dispatch("GET", "/ok", None);
    assert_eq!(ctx.status(), StatusCode::OK);
}

#[test]
fn test_recovery_stops_later_handlers() {
    let reached = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reached);

    let mut engine = Engine::new();
    engine.use_handlers([recovery()]);
    engine
        .handle(
            "GET",
            "/",
            [
                handler_fn(|_| panic!("first")),
                handler_fn(move |_| flag.store(true, Ordering::SeqCst)),
            ],
        )
        .unwrap();

    let ctx = engine.dispatch("GET", "/", None);
    assert_eq!(ctx.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!reached.load(Ordering::SeqCst));
}

#[test]
fn test_metrics_count_outcomes() {
    let metrics = Arc::new(RequestMetrics::new());
    let engine = engine_with(&metrics);

    engine.dispatch("GET", "/ok", None);
    engine.dispatch("GET", "/ok", None);
    engine.dispatch("GET", "/deny", None);
    engine.dispatch("GET", "/missing", None);

    assert_eq!(metrics.request_count(), 4);
    assert_eq!(metrics.aborted_count(), 1);
    assert_eq!(metrics.not_found_count(), 1);
}

#[test]
fn test_metrics_see_recovered_status() {
    let metrics = Arc::new(RequestMetrics::new());
    let engine = engine_with(&metrics);

    let ctx = engine.dispatch("GET", "/boom", None);
    assert_eq!(ctx.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // Metrics sits inside recovery, so the panic unwinds past it
    assert_eq!(metrics.request_count(), 0);

    engine.dispatch("GET", "/ok", None);
    assert_eq!(metrics.request_count(), 1);
}

#[test]
fn test_redirect_skips_middleware() {
    let metrics = Arc::new(RequestMetrics::new());
    let engine = engine_with(&metrics);

    let ctx = engine.dispatch("GET", "/ok/", None);
    assert_eq!(ctx.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(metrics.request_count(), 0);
}

#[test]
fn test_deep_middleware_stack_is_not_counted_as_aborted() {
    let metrics = Arc::new(RequestMetrics::new());
    let mut engine = Engine::new();
    engine.use_handlers([metrics.handler()]);
    engine.use_handlers((0..40).map(|_| handler_fn(|ctx| ctx.next())));
    engine.handle("GET", "/deep", [handler_fn(|_| {})]).unwrap();

    let ctx = engine.dispatch("GET", "/deep", None);
    assert_eq!(ctx.handler_count(), 42);
    assert!(!ctx.is_aborted());
    assert_eq!(metrics.request_count(), 1);
    assert_eq!(metrics.aborted_count(), 0);
}
