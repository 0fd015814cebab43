use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::UserActivity;
use foodie_model::id::{ActivityId, UserId};
use foodie_model::page::Page;

use crate::extract::SessionUser;
use crate::App;

/// Activity feed of a user, newest first. Only the user may read it.
#[derive(Debug)]
pub struct ListActivities {
    pub user_id: UserId,
    pub before: Option<ActivityId>,
    pub limit: Option<u64>,
}

#[derive(Debug)]
pub struct ListActivitiesResult {
    pub activities: Vec<UserActivity>,
    pub total: u64,
    /// Cursor of the next batch if this one was full.
    pub next_before: Option<ActivityId>,
}

impl ListActivities {
    #[tracing::instrument(skip_all, name = "services.users.activities")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<ListActivitiesResult, ApiError> {
        if session_user.id != self.user_id {
            return Err(ApiError::new(ApiErrorCategory::Forbidden)
                .message("You can only view your own activities"));
        }

        let limit = self.limit.unwrap_or(Page::DEFAULT_LIMIT);
        if !(1..=Page::MAX_LIMIT).contains(&limit) {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest).message(format!(
                "Limit must be between 1 and {}",
                Page::MAX_LIMIT
            )));
        }

        let mut conn = app.db_read().await?;
        let activities =
            UserActivity::list_for_user(&mut conn, self.user_id, self.before, limit).await?;
        let total = UserActivity::count_for_user(&mut conn, self.user_id).await?;

        let is_full = u64::try_from(activities.len()).is_ok_and(|len| len == limit);
        let next_before = if is_full {
            activities.last().map(|v| v.id)
        } else {
            None
        };

        Ok(ListActivitiesResult {
            activities,
            total,
            next_before,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use foodie_model::activity::ActivityType;
    use serde_json::json;

    use super::*;
    use crate::services::users::UpdateProfile;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_page_through_activities() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        for bio in ["first", "second"] {
            UpdateProfile {
                bio: Some(bio),
                ..Default::default()
            }
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .unwrap();
        }

        let session_user = alice.get_session_user(&app).await;
        let first = ListActivities {
            user_id: alice.user.id,
            before: None,
            limit: Some(2),
        }
        .perform(&app, &session_user)
        .await
        .unwrap();

        assert_eq!(first.total, 3);
        assert_eq!(first.activities.len(), 2);
        assert_eq!(
            first.activities[0].activity_type,
            ActivityType::ProfileUpdated
        );

        let second = ListActivities {
            user_id: alice.user.id,
            before: first.next_before,
            limit: Some(2),
        }
        .perform(&app, &session_user)
        .await
        .unwrap();

        assert_eq!(second.activities.len(), 1);
        assert_eq!(
            second.activities[0].activity_type,
            ActivityType::UserRegistered
        );
        assert!(second.next_before.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_forbid_reading_other_feeds() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let bob = test_utils::users::register()
            .app(&app)
            .email("bob@example.com")
            .call()
            .await;

        let error = ListActivities {
            user_id: bob.id,
            before: None,
            limit: None,
        }
        .perform(&app, &alice.get_session_user(&app).await)
        .await
        .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({ "code": "forbidden" }),
        );
    }
}
