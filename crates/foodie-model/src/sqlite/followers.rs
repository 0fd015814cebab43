use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::follower::{Follower, FollowerIdent};
use crate::id::UserId;
use crate::page::Page;
use crate::user::{User, UserIdent};

#[derive(Debug, Error)]
#[error("Could not follow user")]
pub struct FollowError;

#[derive(Debug, Error)]
#[error("Could not unfollow user")]
pub struct UnfollowError;

impl Follower {
    /// Makes `follower_id` follow `following_id`.
    ///
    /// Returns [`None`] if the edge already exists.
    #[tracing::instrument(skip_all, name = "db.followers.follow")]
    pub async fn follow(
        conn: &mut SqliteConnection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<Option<Self>, FollowError> {
        let (sql, values) = Query::insert()
            .into_table(FollowerIdent::Followers)
            .columns([
                FollowerIdent::FollowerId,
                FollowerIdent::FollowingId,
                FollowerIdent::CreatedAt,
            ])
            .values_panic([
                follower_id.0.into(),
                following_id.0.into(),
                Utc::now().into(),
            ])
            .on_conflict(
                OnConflict::columns([FollowerIdent::FollowerId, FollowerIdent::FollowingId])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(FollowError)
    }

    /// Removes the follow edge.
    ///
    /// Returns `false` if there was nothing to remove.
    #[tracing::instrument(skip_all, name = "db.followers.unfollow")]
    pub async fn unfollow(
        conn: &mut SqliteConnection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<bool, UnfollowError> {
        let (sql, values) = Query::delete()
            .from_table(FollowerIdent::Followers)
            .and_where(
                Expr::col(FollowerIdent::FollowerId)
                    .eq(follower_id.0)
                    .and(Expr::col(FollowerIdent::FollowingId).eq(following_id.0)),
            )
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(UnfollowError)?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "db.followers.get")]
    pub async fn get(
        conn: &mut SqliteConnection,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(FollowerIdent::Followers)
            .and_where(
                Expr::col(FollowerIdent::FollowerId)
                    .eq(follower_id.0)
                    .and(Expr::col(FollowerIdent::FollowingId).eq(following_id.0)),
            )
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find follower data by follower or following id")
    }

    /// Lists users following `user_id`, most recent follows first.
    #[tracing::instrument(skip_all, name = "db.followers.list_followers")]
    pub async fn list_followers(
        conn: &mut SqliteConnection,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<User>> {
        Self::list_edges(
            conn,
            FollowerIdent::FollowingId,
            FollowerIdent::FollowerId,
            user_id,
            page,
        )
        .await
        .attach_printable("could not list followers of user")
    }

    /// Lists users that `user_id` follows, most recent follows first.
    #[tracing::instrument(skip_all, name = "db.followers.list_following")]
    pub async fn list_following(
        conn: &mut SqliteConnection,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<User>> {
        Self::list_edges(
            conn,
            FollowerIdent::FollowerId,
            FollowerIdent::FollowingId,
            user_id,
            page,
        )
        .await
        .attach_printable("could not list followed users of user")
    }

    async fn list_edges(
        conn: &mut SqliteConnection,
        by: FollowerIdent,
        other: FollowerIdent,
        user_id: UserId,
        page: Page,
    ) -> Result<Vec<User>> {
        let (sql, values) = Query::select()
            .column((UserIdent::Users, Asterisk))
            .from(FollowerIdent::Followers)
            .inner_join(
                UserIdent::Users,
                Expr::col((UserIdent::Users, UserIdent::Id))
                    .equals((FollowerIdent::Followers, other)),
            )
            .and_where(Expr::col((FollowerIdent::Followers, by)).eq(user_id.0))
            .order_by((FollowerIdent::Followers, FollowerIdent::Id), Order::Desc)
            .limit(page.limit())
            .offset(page.offset())
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
    }
}

#[cfg(test)]
mod tests {
    use crate::follower::Follower;
    use crate::page::Page;
    use foodie_db::Pool;
    use foodie_error::ext::ResultExt;
    use foodie_error::Result;

    #[tokio::test]
    async fn should_follow_once_per_pair() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let bob = crate::test_utils::insert_user(&mut conn, "bob@example.com").await;

        let first = Follower::follow(&mut conn, alice.id, bob.id).await.erase_context()?;
        assert!(first.is_some());

        let second = Follower::follow(&mut conn, alice.id, bob.id).await.erase_context()?;
        assert!(second.is_none());

        let followers = Follower::list_followers(&mut conn, bob.id, Page::default()).await?;
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, alice.id);

        let following = Follower::list_following(&mut conn, alice.id, Page::default()).await?;
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].id, bob.id);

        assert!(Follower::unfollow(&mut conn, alice.id, bob.id).await.erase_context()?);
        assert!(!Follower::unfollow(&mut conn, alice.id, bob.id).await.erase_context()?);
        assert!(Follower::get(&mut conn, alice.id, bob.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn should_reject_self_follow_at_storage_level() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        assert!(Follower::follow(&mut conn, alice.id, alice.id).await.is_err());

        Ok(())
    }
}
