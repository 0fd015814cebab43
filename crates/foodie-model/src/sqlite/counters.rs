use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, Func, Query, SimpleExpr, SqliteQueryBuilder, SubQueryStatement};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;
use tracing::{debug, warn};

use crate::counter::{Counter, CounterKind, CounterSource};
use crate::id::UserId;
use crate::user::UserIdent;

#[derive(Debug, Error)]
#[error("Could not refresh counter")]
pub struct RefreshCounterError;

#[derive(Debug, Error)]
#[error("Could not recount counters")]
pub struct RecountError;

/// `(SELECT COUNT(*) FROM <rows> WHERE <rows>.<fk> = <table>.<id>)`
fn live_count(source: &CounterSource) -> SimpleExpr {
    let select = Query::select()
        .expr(Func::count(Expr::col(Asterisk)))
        .from(source.rows.clone())
        .and_where(
            Expr::col((source.rows.clone(), source.rows_fk.clone()))
                .equals((source.table.clone(), source.id.clone())),
        )
        .to_owned();

    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(select)))
}

impl Counter {
    /// Recounts this counter from its source rows.
    ///
    /// Returns the new value or [`None`] if the owning row does not exist.
    #[tracing::instrument(skip(conn), name = "db.counters.refresh")]
    pub async fn refresh(
        self,
        conn: &mut SqliteConnection,
    ) -> Result<Option<i64>, RefreshCounterError> {
        let source = self.kind().source();
        let (sql, values) = Query::update()
            .table(source.table.clone())
            .value(source.column.clone(), live_count(&source))
            .and_where(Expr::col(source.id.clone()).eq(self.owner_id()))
            .returning_col(source.column.clone())
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(RefreshCounterError)
    }

    /// Recounts every counter of a user.
    #[tracing::instrument(skip(conn), name = "db.counters.refresh_user")]
    pub async fn refresh_user(
        conn: &mut SqliteConnection,
        user_id: UserId,
    ) -> Result<(), RefreshCounterError> {
        let mut query = Query::update();
        query
            .table(UserIdent::Users)
            .and_where(Expr::col(UserIdent::Id).eq(user_id.0));

        for kind in CounterKind::USER {
            let source = kind.source();
            query.value(source.column.clone(), live_count(&source));
        }

        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(RefreshCounterError)?;

        Ok(())
    }

    /// Recounts every counter of every row.
    ///
    /// Returns the amount of counters that had drifted and got corrected.
    #[tracing::instrument(skip_all, name = "db.counters.recount_all")]
    pub async fn recount_all(conn: &mut SqliteConnection) -> Result<u64, RecountError> {
        let mut corrected = 0;
        for kind in CounterKind::ALL {
            let source = kind.source();
            let (sql, values) = Query::update()
                .table(source.table.clone())
                .value(source.column.clone(), live_count(&source))
                .and_where(Expr::col(source.column.clone()).ne(live_count(&source)))
                .build_sqlx(SqliteQueryBuilder);

            let result = sqlx::query_with(&sql, values)
                .execute(&mut *conn)
                .await
                .change_context(RecountError)
                .attach_printable_lazy(|| format!("could not recount {kind:?}"))?;

            let rows = result.rows_affected();
            if rows > 0 {
                warn!(counter = ?kind, rows, "corrected drifted counters");
            }
            corrected += rows;
        }

        debug!(corrected, "recounted all counters");
        Ok(corrected)
    }
}

#[cfg(test)]
mod tests {
    use crate::counter::Counter;
    use crate::follower::Follower;
    use crate::id::UserId;
    use crate::user::User;
    use foodie_db::Pool;
    use foodie_error::ext::ResultExt;
    use foodie_error::Result;

    #[tokio::test]
    async fn should_count_source_rows() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let bob = crate::test_utils::insert_user(&mut conn, "bob@example.com").await;
        let carol = crate::test_utils::insert_user(&mut conn, "carol@example.com").await;

        Follower::follow(&mut conn, bob.id, alice.id).await.erase_context()?;
        Follower::follow(&mut conn, carol.id, alice.id).await.erase_context()?;

        let followers = Counter::UserFollowers(alice.id)
            .refresh(&mut conn)
            .await
            .erase_context()?;
        assert_eq!(followers, Some(2));

        let following = Counter::UserFollowing(alice.id)
            .refresh(&mut conn)
            .await
            .erase_context()?;
        assert_eq!(following, Some(0));

        Counter::refresh_user(&mut conn, bob.id).await.erase_context()?;
        let bob = User::find(&mut conn, bob.id).await?.unwrap();
        assert_eq!(bob.following_count, 1);
        assert_eq!(bob.followers_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn should_return_none_for_missing_owner() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let value = Counter::UserRecipes(UserId(404))
            .refresh(&mut conn)
            .await
            .erase_context()?;
        assert_eq!(value, None);

        Ok(())
    }

    #[tokio::test]
    async fn should_repair_tampered_counters() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let bob = crate::test_utils::insert_user(&mut conn, "bob@example.com").await;
        Follower::follow(&mut conn, bob.id, alice.id).await.erase_context()?;
        crate::test_utils::insert_recipe(&mut conn, alice.id, "Khichuri", 10).await;

        sqlx::query("UPDATE users SET followers_count = 42, recipes_count = 7 WHERE id = ?")
            .bind(alice.id)
            .execute(&mut *conn)
            .await
            .unwrap();

        let corrected = Counter::recount_all(&mut conn).await.erase_context()?;
        // alice.followers_count, alice.recipes_count and bob.following_count
        assert_eq!(corrected, 3);

        let alice = User::find(&mut conn, alice.id).await?.unwrap();
        assert_eq!(alice.followers_count, 1);
        assert_eq!(alice.recipes_count, 1);

        assert_eq!(Counter::recount_all(&mut conn).await.erase_context()?, 0);
        Ok(())
    }
}
