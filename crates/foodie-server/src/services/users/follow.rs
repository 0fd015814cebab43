use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{ActivityType, InsertUserActivity, ObjectType};
use foodie_model::counter::Counter;
use foodie_model::follower::Follower;
use foodie_model::id::UserId;
use foodie_model::User;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug)]
pub struct FollowUser {
    pub target: UserId,
}

impl FollowUser {
    /// Returns the followed user with their refreshed counters.
    #[tracing::instrument(skip_all, name = "services.users.follow")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<User, ApiError> {
        if session_user.id == self.target {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("You cannot follow yourself"));
        }

        let mut conn = app.db_write().await?;
        let Some(target) = User::find(&mut conn, self.target)
            .await?
            .filter(|v| v.is_active)
        else {
            return Err(util::user_not_found());
        };

        if Follower::follow(&mut conn, session_user.id, target.id)
            .await?
            .is_none()
        {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("You are already following this user"));
        }

        Counter::UserFollowers(target.id).refresh(&mut conn).await?;
        Counter::UserFollowing(session_user.id)
            .refresh(&mut conn)
            .await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::UserFollowed)
            .description(format!(
                "User {} followed {}",
                session_user.email, target.email
            ))
            .related_object((ObjectType::User, target.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let target = User::find(&mut conn, target.id).await?.unwrap_or(target);
        conn.commit().await?;

        Ok(target)
    }
}

#[derive(Debug)]
pub struct UnfollowUser {
    pub target: UserId,
}

impl UnfollowUser {
    /// Returns the unfollowed user with their refreshed counters.
    #[tracing::instrument(skip_all, name = "services.users.unfollow")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<User, ApiError> {
        let mut conn = app.db_write().await?;
        let Some(target) = User::find(&mut conn, self.target).await? else {
            return Err(util::user_not_found());
        };

        if !Follower::unfollow(&mut conn, session_user.id, target.id).await? {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("You are not following this user"));
        }

        Counter::UserFollowers(target.id).refresh(&mut conn).await?;
        Counter::UserFollowing(session_user.id)
            .refresh(&mut conn)
            .await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::UserUnfollowed)
            .description(format!(
                "User {} unfollowed {}",
                session_user.email, target.email
            ))
            .related_object((ObjectType::User, target.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let target = User::find(&mut conn, target.id).await?.unwrap_or(target);
        conn.commit().await?;

        Ok(target)
    }
}
