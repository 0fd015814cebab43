use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use foodie_error::ext::ResultExt;
use foodie_error::Result;

use crate::auth::jwt::LoginClaims;
use crate::extract::SessionUser;
use crate::App;

#[doc(hidden)]
#[derive(FromRequestParts)]
pub struct Metadata {
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
}

/// Resolves the bearer token (if there's any) into a [`SessionUser`]
/// that route handlers can extract.
///
/// Requests with an invalid or expired token are rejected right away.
#[tracing::instrument(skip_all, name = "middleware.auth")]
pub async fn catch_token(
    metadata: Metadata,
    State(app): State<App>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(header) = metadata.auth_header {
        match get_user_from_token(&app, header.token()).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
            }
            Err(error) => return error.into_api_error().into_response(),
        }
    }
    next.run(request).await
}

async fn get_user_from_token(app: &App, token: &str) -> Result<SessionUser> {
    let claims = LoginClaims::decode(app, token).erase_context()?;

    let mut conn = app.db_read().await.erase_context()?;
    let user = SessionUser::from_db(&mut conn, claims.sub)
        .await
        .erase_context()?;

    drop(conn);
    Ok(user)
}
