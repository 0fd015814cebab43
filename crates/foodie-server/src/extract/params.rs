use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use foodie_error::{ApiError, ApiErrorCategory, Error};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Local version of [`axum::extract::Query`] that rejects with the
/// API error schema.
#[derive(Debug)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(inner) => Ok(Self(inner.0)),
            Err(QueryRejection::FailedToDeserializeQueryString(error)) => {
                Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                    .message(error.body_text())
                    .into_response())
            }
            Err(error) => {
                warn!("unhandled axum::QueryRejection category: {error:?}");
                Err(Error::unknown_generic(error).into_api_error().into_response())
            }
        }
    }
}

/// Local version of [`axum::extract::Path`] that rejects with the
/// API error schema.
#[derive(Debug)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(inner) => Ok(Self(inner.0)),
            Err(PathRejection::FailedToDeserializePathParams(error)) => {
                Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                    .message(error.body_text())
                    .into_response())
            }
            Err(error) => {
                warn!("unhandled axum::PathRejection category: {error:?}");
                Err(Error::unknown_generic(error).into_api_error().into_response())
            }
        }
    }
}
