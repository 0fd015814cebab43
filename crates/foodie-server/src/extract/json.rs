use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::{BufMut, BytesMut};
use foodie_error::{ApiError, ApiErrorCategory, Error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// JSON request body or response.
///
/// Unlike [`axum::Json`], bodies that cannot be read or deserialized are
/// rejected with an `invalid_request` [`ApiError`].
#[derive(Debug)]
pub struct Json<T>(pub T);

#[derive(Debug, Error)]
#[error("Could not serialize response to JSON body")]
struct SerializeBodyError;

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        let mut writer = BytesMut::with_capacity(256).writer();
        if let Err(error) = serde_json::to_writer(&mut writer, &self.0) {
            return Error::unknown_generic(error)
                .change_context(SerializeBodyError)
                .into_api_error()
                .into_response();
        }

        let content_type = HeaderValue::from_static("application/json");
        let body = writer.into_inner().freeze();
        ([(header::CONTENT_TYPE, content_type)], body).into_response()
    }
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        axum::Json::<T>::from_request(req, state)
            .await
            .map(|axum::Json(value)| Self(value))
            .map_err(reject)
    }
}

fn reject(rejection: JsonRejection) -> Response {
    let message = match rejection {
        JsonRejection::JsonDataError(error) => error.body_text(),
        JsonRejection::JsonSyntaxError(error) => error.body_text(),
        JsonRejection::BytesRejection(error) => error.body_text(),
        JsonRejection::MissingJsonContentType(..) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => {
            warn!("unhandled JSON body rejection: {other:?}");
            return Error::unknown_generic(other)
                .into_api_error()
                .into_response();
        }
    };

    ApiError::new(ApiErrorCategory::InvalidRequest)
        .message(message)
        .into_response()
}
