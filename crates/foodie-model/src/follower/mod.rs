use chrono::{DateTime, Utc};
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{FollowerId, UserId};

/// A directed follow edge from `follower_id` to `following_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Follower {
    pub id: FollowerId,
    pub follower_id: UserId,
    pub following_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum FollowerIdent {
    Followers,
    Id,
    FollowerId,
    FollowingId,
    CreatedAt,
}
