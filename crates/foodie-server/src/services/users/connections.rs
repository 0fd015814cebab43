use foodie_error::ApiError;
use foodie_model::follower::Follower;
use foodie_model::id::UserId;
use foodie_model::page::Page;
use foodie_model::User;

use crate::services::util;
use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Users following the given user.
    Followers,
    /// Users the given user follows.
    Following,
}

#[derive(Debug)]
pub struct ListConnections {
    pub user_id: UserId,
    pub direction: Direction,
    pub page: Page,
}

#[derive(Debug)]
pub struct ListConnectionsResult {
    pub users: Vec<User>,
    pub total: u64,
}

impl ListConnections {
    #[tracing::instrument(skip_all, name = "services.users.connections", fields(
        user.id = %self.user_id,
        direction = ?self.direction,
    ))]
    pub async fn perform(self, app: &App) -> Result<ListConnectionsResult, ApiError> {
        let mut conn = app.db_read().await?;
        let Some(user) = User::find(&mut conn, self.user_id).await? else {
            return Err(util::user_not_found());
        };

        let (users, total) = match self.direction {
            Direction::Followers => (
                Follower::list_followers(&mut conn, user.id, self.page).await?,
                user.followers_count,
            ),
            Direction::Following => (
                Follower::list_following(&mut conn, user.id, self.page).await?,
                user.following_count,
            ),
        };

        Ok(ListConnectionsResult {
            users,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}
