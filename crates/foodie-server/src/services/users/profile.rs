use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{ActivityType, InsertUserActivity, ObjectType};
use foodie_model::id::UserId;
use foodie_model::user::UpdateUser;
use foodie_model::User;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

/// Public profile of an active user.
#[derive(Debug)]
pub struct GetProfile {
    pub id: UserId,
}

impl GetProfile {
    #[tracing::instrument(skip_all, name = "services.users.profile.get")]
    pub async fn perform(self, app: &App) -> Result<User, ApiError> {
        let mut conn = app.db_read().await?;
        match User::find(&mut conn, self.id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(util::user_not_found()),
        }
    }
}

#[derive(Debug, Default)]
pub struct UpdateProfile<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub location: Option<&'a str>,
    pub website: Option<&'a str>,
    pub is_chef: Option<bool>,
    pub chef_experience: Option<Option<i64>>,
    /// Comma separated.
    pub specialties: Option<&'a str>,
}

impl UpdateProfile<'_> {
    #[tracing::instrument(skip_all, name = "services.users.profile.update")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<User, ApiError> {
        if self.chef_experience.flatten().is_some_and(|v| v < 0) {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Chef experience cannot be negative"));
        }

        let update = UpdateUser::builder()
            .id(session_user.id)
            .maybe_first_name(self.first_name)
            .maybe_last_name(self.last_name)
            .maybe_bio(self.bio)
            .maybe_location(self.location)
            .maybe_website(self.website)
            .maybe_is_chef(self.is_chef)
            .maybe_chef_experience(self.chef_experience)
            .maybe_specialties(self.specialties)
            .build();

        // Nothing changes so there's nothing to log either.
        if update.is_empty() {
            return Ok(session_user.user.clone());
        }

        let mut conn = app.db_write().await?;
        let Some(user) = update.update(&mut conn).await? else {
            return Err(util::user_not_found());
        };

        InsertUserActivity::builder()
            .user_id(user.id)
            .activity_type(ActivityType::ProfileUpdated)
            .description(format!("User {} updated profile", user.email))
            .related_object((ObjectType::User, user.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use foodie_model::activity::UserActivity;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_update_profile() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = UpdateProfile {
            bio: Some("Home cook from Dhaka"),
            is_chef: Some(true),
            chef_experience: Some(Some(4)),
            specialties: Some("Bengali, Mughlai"),
            ..Default::default()
        };

        let user = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .unwrap();

        assert_eq!(user.bio, "Home cook from Dhaka");
        assert!(user.is_chef);
        assert_eq!(user.chef_experience, Some(4));
        assert_eq!(user.specialties_list(), vec!["Bengali", "Mughlai"]);

        let mut conn = app.db_read().await.unwrap();
        let activities = UserActivity::list_for_user(&mut conn, user.id, None, 1)
            .await
            .unwrap();
        assert_eq!(activities[0].activity_type, ActivityType::ProfileUpdated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_log_empty_update() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        UpdateProfile::default()
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .unwrap();

        let mut conn = app.db_read().await.unwrap();
        let total = UserActivity::count_for_user(&mut conn, alice.user.id)
            .await
            .unwrap();

        // only the registration
        assert_eq!(total, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_negative_experience() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let request = UpdateProfile {
            chef_experience: Some(Some(-1)),
            ..Default::default()
        };

        let error = request
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({ "code": "invalid_request" }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_not_find_unknown_user() {
        let app = App::new_for_tests().await;
        let error = GetProfile { id: UserId(404) }
            .perform(&app)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "not_found",
                "message": "Could not find user specified",
            }),
        );
    }
}
