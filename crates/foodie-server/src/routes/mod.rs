use axum::http::{Method, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::Router;
use foodie_error::{ApiError, ApiErrorCategory};

use crate::App;

mod v1;

/// Builds an [axum router] with every route of the AmaderFoodie API
/// and the whole middleware stack.
///
/// [axum router]: axum::Router
pub fn build_axum_router(app: App) -> Router {
    let router = Router::new()
        .nest("/api/v1", self::v1::build_axum_router(app.clone()))
        .nest("/api/", self::v1::build_axum_router(app.clone()))
        .method_not_allowed_fallback(method_not_allowed_route)
        .fallback(not_found_route)
        .layer(from_fn_with_state(app, crate::middleware::auth::catch_token));

    crate::middleware::apply(router)
}

async fn method_not_allowed_route() -> Response {
    ApiError::new(ApiErrorCategory::InvalidRequest)
        .message("Method not allowed")
        .into_response()
}

async fn not_found_route(method: Method) -> Response {
    match method {
        Method::HEAD => StatusCode::NOT_FOUND.into_response(),
        _ => ApiError::new(ApiErrorCategory::NotFound).into_response(),
    }
}
