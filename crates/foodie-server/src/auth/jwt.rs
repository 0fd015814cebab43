use chrono::{DateTime, TimeDelta, Utc};
use foodie_error::ext::ResultExt;
use foodie_error::{ApiErrorCategory, Error, Result};
use foodie_model::id::UserId;
use foodie_model::User;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::App;

static JWT_HEADER: LazyLock<Header> = LazyLock::new(|| Header::new(Algorithm::HS256));
static JWT_LOGIN_ISSUER: &str = "amaderfoodie.api.login";
static JWT_VERIFY_EMAIL_ISSUER: &str = "amaderfoodie.api.verify_email";

const VERIFY_EMAIL_LIFETIME_HOURS: i64 = 72;

#[derive(Debug, Error)]
#[error("Failed to decode as JWT")]
pub struct DecodeJwtError;

fn decode_jwt<T: DeserializeOwned>(
    app: &App,
    token: &str,
    issuer: &str,
) -> Result<T, DecodeJwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 30;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_issuer(&[issuer]);

    let token = token.replace(char::is_whitespace, "");
    match jsonwebtoken::decode(&token, &app.jwt_decode, &validation) {
        Ok(data) => Ok(data.claims),
        Err(error) => match *error.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(..)
            | ErrorKind::Json(..)
            | ErrorKind::Utf8(..) => {
                Err(Error::new(ApiErrorCategory::AccessDenied, DecodeJwtError))
            }
            ErrorKind::ExpiredSignature => {
                Err(Error::new(ApiErrorCategory::ExpiredToken, DecodeJwtError))
            }
            _ => Err(Error::unknown_generic(error).change_context(DecodeJwtError)),
        },
    }
}

#[derive(Debug, Error)]
#[error("Failed to encode as JWT")]
pub struct EncodeJwtError;

fn encode_jwt<T: Serialize>(app: &App, claims: &T) -> Result<String, EncodeJwtError> {
    jsonwebtoken::encode(&JWT_HEADER, claims, &app.jwt_encode).change_context(EncodeJwtError)
}

/// Claims of the bearer token given to a user once they logged in.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginClaims {
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: UserId,
}

impl LoginClaims {
    pub fn decode(app: &App, token: &str) -> Result<Self, DecodeJwtError> {
        decode_jwt(app, token, JWT_LOGIN_ISSUER)
    }

    pub fn encode(&self, app: &App) -> Result<String, EncodeJwtError> {
        encode_jwt(app, self).attach_printable("could not encode login jwt claims")
    }

    #[must_use]
    pub fn generate(app: &App, user: &User) -> Self {
        let lifetime = i64::try_from(app.config.auth.token_lifetime_hours.get())
            .ok()
            .and_then(TimeDelta::try_hours)
            .unwrap_or(TimeDelta::MAX);

        let now = Utc::now();
        let exp = now
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            nbf: now.timestamp(),
            exp: exp.timestamp(),
            iss: JWT_LOGIN_ISSUER.to_string(),
            sub: user.id,
        }
    }
}

/// Claims of the token that proves a user owns their email address.
///
/// The email is part of the claims so the token stops working once the
/// address changes.
#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyEmailClaims {
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: UserId,
    pub email: String,
}

impl VerifyEmailClaims {
    pub fn decode(app: &App, token: &str) -> Result<Self, DecodeJwtError> {
        decode_jwt(app, token, JWT_VERIFY_EMAIL_ISSUER)
    }

    pub fn encode(&self, app: &App) -> Result<String, EncodeJwtError> {
        encode_jwt(app, self).attach_printable("could not encode email verification jwt claims")
    }

    #[must_use]
    pub fn generate(user: &User) -> Self {
        let now = Utc::now();
        Self {
            nbf: now.timestamp(),
            exp: (now + TimeDelta::hours(VERIFY_EMAIL_LIFETIME_HOURS)).timestamp(),
            iss: JWT_VERIFY_EMAIL_ISSUER.to_string(),
            sub: user.id,
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_decode_login_token() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let token = LoginClaims::generate(&app, &alice).encode(&app).unwrap();
        let claims = LoginClaims::decode(&app, &token).unwrap();
        assert_eq!(claims.sub, alice.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_mix_up_token_issuers() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let token = VerifyEmailClaims::generate(&alice).encode(&app).unwrap();
        let error = LoginClaims::decode(&app, &token).unwrap_err();
        assert_eq!(error.get_category(), &ApiErrorCategory::AccessDenied);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_expired_token() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let mut claims = LoginClaims::generate(&app, &alice);
        claims.nbf -= 7200;
        claims.exp = claims.nbf + 60;

        let token = claims.encode(&app).unwrap();
        let error = LoginClaims::decode(&app, &token).unwrap_err();
        assert_eq!(error.get_category(), &ApiErrorCategory::ExpiredToken);
    }
}
