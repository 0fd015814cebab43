use axum::extract::MatchedPath;
use axum::http::{header, Request, Response};
use axum_extra::headers::Header;
use std::time::Duration;
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{debug, Span};
use uuid::Uuid;

use crate::headers::XRequestId;

#[doc(hidden)]
#[derive(Default, Clone)]
pub struct LocalRequestIdGenerator;

impl MakeRequestId for LocalRequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::now_v7().to_string().parse().ok().map(RequestId::new)
    }
}

#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<LocalRequestIdGenerator> {
    SetRequestIdLayer::new(XRequestId::name().clone(), LocalRequestIdGenerator)
}

/// Creates the `http.request` span every request handler runs in.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let target = request
            .extensions()
            .get::<MatchedPath>()
            .map_or_else(|| request.uri().path(), MatchedPath::as_str);

        let header_str = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
        };

        let span = tracing::info_span!(
            "http.request",
            http.method = %request.method(),
            http.status_code = tracing::field::Empty,
            http.target = %target,
            http.user_agent = %header_str(header::USER_AGENT.as_str()),
            http.version = ?request.version(),
            request.duration = tracing::field::Empty,
            request.id = %header_str(XRequestId::NAME),
        );

        span.in_scope(|| debug!("Processing request: {target}"));
        span
    }
}

/// Records the status code and duration into the `http.request` span.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordResponse;

impl<B> OnResponse<B> for RecordResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        span.record("http.status_code", status.as_u16());
        span.record("request.duration", tracing::field::debug(latency));
        debug!("Responded with {status} ({latency:?})");
    }
}
