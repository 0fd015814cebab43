use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use foodie_db::SqliteConnection;
use foodie_error::ext::ResultExt;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::id::UserId;
use foodie_model::User;
use std::ops::Deref;
use thiserror::Error;

use crate::App;

/// The user who made the request, taken from the bearer token that was
/// validated by [`catch_token`](crate::middleware::auth::catch_token).
///
/// Use `Option<SessionUser>` for routes where logging in is optional.
#[derive(Clone)]
pub struct SessionUser {
    pub user: User,
}

impl SessionUser {
    #[must_use]
    pub fn into_inner(self) -> User {
        self.user
    }
}

impl Deref for SessionUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[derive(Debug, Error)]
#[error("Could not make a session user")]
pub(crate) struct GetSessionUserError;

impl SessionUser {
    pub(crate) async fn from_db(
        conn: &mut SqliteConnection,
        id: UserId,
    ) -> foodie_error::Result<Self, GetSessionUserError> {
        let user = User::find(conn, id)
            .await
            .change_context(GetSessionUserError)?;

        match user {
            Some(user) if user.is_active => Ok(Self { user }),
            Some(..) => Err(foodie_error::Error::new(
                ApiErrorCategory::AccessDenied,
                GetSessionUserError,
            )
            .attach_printable("specified user is deactivated")),
            None => Err(foodie_error::Error::new(
                ApiErrorCategory::AccessDenied,
                GetSessionUserError,
            )
            .attach_printable("specified user does not exists")),
        }
    }
}

impl std::fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionUser")
            .field("id", &self.user.id)
            .finish_non_exhaustive()
    }
}

#[axum::async_trait]
impl FromRequestParts<App> for SessionUser {
    type Rejection = Response;

    #[tracing::instrument(skip_all, name = "extractors.session_user")]
    async fn from_request_parts(parts: &mut Parts, _app: &App) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SessionUser>() {
            Some(identity) => Ok(identity.clone()),
            None => Err(ApiError::new(ApiErrorCategory::AccessDenied).into_response()),
        }
    }
}
