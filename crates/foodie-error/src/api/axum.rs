use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{ApiError, ErrorCategory};

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match &self.category {
            ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
            ErrorCategory::AccessDenied => StatusCode::UNAUTHORIZED,
            ErrorCategory::Forbidden => StatusCode::FORBIDDEN,
            ErrorCategory::ExpiredToken => StatusCode::FORBIDDEN,
            ErrorCategory::Outage => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::LoginUserFailed(..) => StatusCode::FORBIDDEN,
            ErrorCategory::RegisterUserFailed(..) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
