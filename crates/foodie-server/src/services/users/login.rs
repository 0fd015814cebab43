use foodie_error::api::LoginUserFailed;
use foodie_error::ext::ResultExt;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::User;
use foodie_utils::Sensitive;
use tokio::task::spawn_blocking;

use crate::auth::jwt::LoginClaims;
use crate::auth::password;
use crate::App;

#[derive(Debug)]
pub struct Login<'a> {
    pub email: Sensitive<&'a str>,
    pub password: Sensitive<&'a str>,
}

#[derive(Debug)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::new(ApiErrorCategory::LoginUserFailed(
        LoginUserFailed::InvalidCredentials,
    ))
    .message("Invalid email or password")
}

impl Login<'_> {
    #[tracing::instrument(skip_all, name = "services.users.login")]
    pub async fn perform(self, app: &App) -> Result<LoginResult, ApiError> {
        let mut conn = app.db_read().await?;
        let user = User::find_by_email(&mut conn, self.email.trim()).await?;
        drop(conn);

        let Some(user) = user else {
            return Err(invalid_credentials());
        };

        let raw_password = self.password.value().to_string();
        let password_hash = user.password_hash.clone();
        let is_matched =
            spawn_blocking(move || password::verify(raw_password.as_bytes(), &password_hash))
                .await
                .erase_context()??;

        if !is_matched {
            return Err(invalid_credentials());
        }

        if !user.is_active {
            return Err(ApiError::new(ApiErrorCategory::AccessDenied)
                .message("This account has been deactivated"));
        }

        let token = LoginClaims::generate(app, &user).encode(app)?;
        Ok(LoginResult { user, token })
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_login_user() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = Login {
            email: Sensitive::new("Alice@Example.com"),
            password: Sensitive::new(test_utils::users::DEFAULT_PASSWORD),
        };

        let result = request.perform(&app).await.unwrap();
        assert_eq!(result.user.id, alice.id);

        let claims = LoginClaims::decode(&app, &result.token).unwrap();
        assert_eq!(claims.sub, alice.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_wrong_password() {
        let app = App::new_for_tests().await;
        test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = Login {
            email: Sensitive::new("alice@example.com"),
            password: Sensitive::new("not-my-password"),
        };

        let error = request.perform(&app).await.expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "login_user_failed",
                "subcode": "invalid_credentials",
            }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_unknown_email() {
        let app = App::new_for_tests().await;
        let request = Login {
            email: Sensitive::new("nobody@example.com"),
            password: Sensitive::new("hunter2hunter2"),
        };

        let error = request.perform(&app).await.expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "login_user_failed",
                "subcode": "invalid_credentials",
            }),
        );
    }
}
