use foodie_error::ext::ResultExt;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{ActivityType, InsertUserActivity, ObjectType};
use foodie_model::User;
use foodie_utils::Sensitive;
use tokio::task::spawn_blocking;

use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::extract::SessionUser;
use crate::App;

#[derive(Debug)]
pub struct ChangePassword<'a> {
    pub current_password: Sensitive<&'a str>,
    pub new_password: Sensitive<&'a str>,
    pub confirm_password: Sensitive<&'a str>,
}

impl ChangePassword<'_> {
    #[tracing::instrument(skip_all, name = "services.users.change_password")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        if self.new_password.value() != self.confirm_password.value() {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Passwords do not match"));
        }

        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(
                ApiError::new(ApiErrorCategory::InvalidRequest).message(format!(
                    "Password must be at least {MIN_PASSWORD_LEN} characters long"
                )),
            );
        }

        let current_password = self.current_password.value().to_string();
        let current_hash = session_user.password_hash.clone();
        let is_matched =
            spawn_blocking(move || password::verify(current_password.as_bytes(), &current_hash))
                .await
                .erase_context()??;

        if !is_matched {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Current password is incorrect"));
        }

        let new_password = self.new_password.value().to_string();
        let new_hash = spawn_blocking(move || password::hash(new_password))
            .await
            .erase_context()??;

        let mut conn = app.db_write().await?;
        User::set_password(&mut conn, session_user.id, &new_hash).await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::PasswordChanged)
            .description(format!("User {} changed password", session_user.email))
            .related_object((ObjectType::User, session_user.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(())
    }
}
