use axum::Router;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod panic;
pub mod telemetry;

const MAX_CONTENT_LEN: usize = 64 * 1024; // 64 KB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wraps the router with request ids, tracing, panic recovery,
/// timeouts, body limits and response compression.
pub fn apply(router: Router) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(self::telemetry::set_request_id_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(self::telemetry::RequestSpan)
                .on_request(())
                .on_response(self::telemetry::RecordResponse),
        )
        .layer(CatchPanicLayer::custom(self::panic::catch_panic));

    let compression_layer = CompressionLayer::new()
        .br(true)
        .zstd(true)
        .gzip(true)
        .deflate(true)
        .quality(tower_http::CompressionLevel::Fastest);

    router
        .layer(middleware)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyTimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyLimitLayer::new(MAX_CONTENT_LEN))
        .layer(compression_layer)
}
