use axum::response::{IntoResponse, Response};
use foodie_error::Error;
use std::any::Any;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Request handler panicked")]
struct HandlerPanicked;

/// Turns a panic inside a request handler into an `unknown` API error.
/// The panic message is only kept in the logged report.
#[tracing::instrument(skip_all, name = "middleware.catch_panic")]
pub fn catch_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    Error::unknown_generic(HandlerPanicked)
        .attach_printable(format!("panic message: {}", panic_message(&*payload)))
        .into_api_error()
        .into_response()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("<non-string panic payload>")
}
