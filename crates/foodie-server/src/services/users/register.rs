use foodie_error::api::RegisterUserFailed;
use foodie_error::ext::ResultExt;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{ActivityType, InsertUserActivity, ObjectType};
use foodie_model::user::InsertUser;
use foodie_model::User;
use foodie_utils::Sensitive;
use tokio::task::spawn_blocking;

use crate::auth::jwt::VerifyEmailClaims;
use crate::auth::password;
use crate::services::util;
use crate::App;

#[derive(Debug)]
pub struct Register<'a> {
    pub email: Sensitive<&'a str>,
    pub password: Sensitive<&'a str>,
    pub confirm_password: Sensitive<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug)]
pub struct RegisterResult {
    pub user: User,
    pub verification_token: String,
}

impl Register<'_> {
    #[tracing::instrument(skip_all, name = "services.users.register")]
    pub async fn perform(self, app: &App) -> Result<RegisterResult, ApiError> {
        let email = self.email.trim();
        if !util::is_valid_email(email) {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Invalid email address."));
        }
        util::check_new_password(self.password.value(), self.confirm_password.value())?;

        let raw_password = self.password.value().to_string();
        let password_hash = spawn_blocking(move || password::hash(raw_password))
            .await
            .erase_context()??;

        let mut conn = app.db_write().await?;
        let user = InsertUser::builder()
            .email(email)
            .password_hash(&password_hash)
            .first_name(self.first_name.trim())
            .last_name(self.last_name.trim())
            .build()
            .insert(&mut conn)
            .await?;

        let Some(user) = user else {
            return Err(ApiError::new(ApiErrorCategory::RegisterUserFailed(
                RegisterUserFailed::EmailTaken,
            ))
            .message("Email address is already taken"));
        };

        InsertUserActivity::builder()
            .user_id(user.id)
            .activity_type(ActivityType::UserRegistered)
            .description(format!("User {} registered successfully", user.email))
            .related_object((ObjectType::User, user.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let verification_token = VerifyEmailClaims::generate(&user).encode(app)?;
        conn.commit().await?;

        Ok(RegisterResult {
            user,
            verification_token,
        })
    }
}
