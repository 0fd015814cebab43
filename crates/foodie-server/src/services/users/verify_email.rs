use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{ActivityType, InsertUserActivity, ObjectType};
use foodie_model::User;
use foodie_utils::Sensitive;

use crate::auth::jwt::VerifyEmailClaims;
use crate::App;

#[derive(Debug)]
pub struct VerifyEmail<'a> {
    pub token: Sensitive<&'a str>,
}

impl VerifyEmail<'_> {
    #[tracing::instrument(skip_all, name = "services.users.verify_email")]
    pub async fn perform(self, app: &App) -> Result<User, ApiError> {
        let claims = VerifyEmailClaims::decode(app, self.token.value())?;

        let mut conn = app.db_write().await?;
        let user = User::find(&mut conn, claims.sub)
            .await?
            .filter(|user| user.email.eq_ignore_ascii_case(&claims.email));

        let Some(user) = user else {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Verification token is no longer valid"));
        };

        if !User::mark_verified(&mut conn, user.id).await? {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Email address is already verified"));
        }

        InsertUserActivity::builder()
            .user_id(user.id)
            .activity_type(ActivityType::EmailVerified)
            .description(format!("User {} verified email address", user.email))
            .related_object((ObjectType::User, user.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let user = User::find(&mut conn, user.id).await?.unwrap_or(user);
        conn.commit().await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_verify_email() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let token = VerifyEmailClaims::generate(&alice).encode(&app).unwrap();
        let request = VerifyEmail {
            token: Sensitive::new(token.as_str()),
        };

        let user = request.perform(&app).await.unwrap();
        assert!(user.is_verified);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_if_already_verified() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::register()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let token = VerifyEmailClaims::generate(&alice).encode(&app).unwrap();
        VerifyEmail {
            token: Sensitive::new(token.as_str()),
        }
        .perform(&app)
        .await
        .unwrap();

        let error = VerifyEmail {
            token: Sensitive::new(token.as_str()),
        }
        .perform(&app)
        .await
        .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "Email address is already verified",
            }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_malformed_token() {
        let app = App::new_for_tests().await;
        let error = VerifyEmail {
            token: Sensitive::new("not-a-token"),
        }
        .perform(&app)
        .await
        .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({ "code": "access_denied" }),
        );
    }
}
