use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, OnConflict, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::id::UserId;
use crate::reaction::{Reaction, ReactionIdent, ReactionTarget};

#[derive(Debug, Error)]
#[error("Could not update reaction")]
pub struct ReactionError;

impl Reaction {
    /// Records the reaction of `user_id` on `target`.
    ///
    /// Returns `false` if the user already reacted this way.
    #[tracing::instrument(skip(conn), name = "db.reactions.add")]
    pub async fn add(
        self,
        conn: &mut SqliteConnection,
        user_id: UserId,
        target: ReactionTarget,
    ) -> Result<bool, ReactionError> {
        let (table, column) = target.idents(self);
        let (sql, values) = Query::insert()
            .into_table(table)
            .columns([ReactionIdent::UserId, column, ReactionIdent::CreatedAt])
            .values_panic([user_id.0.into(), target.raw_id().into(), Utc::now().into()])
            .on_conflict(
                OnConflict::columns([ReactionIdent::UserId, column])
                    .do_nothing()
                    .to_owned(),
            )
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(ReactionError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` if there was no reaction to remove.
    #[tracing::instrument(skip(conn), name = "db.reactions.remove")]
    pub async fn remove(
        self,
        conn: &mut SqliteConnection,
        user_id: UserId,
        target: ReactionTarget,
    ) -> Result<bool, ReactionError> {
        let (table, column) = target.idents(self);
        let (sql, values) = Query::delete()
            .from_table(table)
            .and_where(Expr::col(ReactionIdent::UserId).eq(user_id.0))
            .and_where(Expr::col(column).eq(target.raw_id()))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(ReactionError)?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(conn), name = "db.reactions.exists")]
    pub async fn exists(
        self,
        conn: &mut SqliteConnection,
        user_id: UserId,
        target: ReactionTarget,
    ) -> Result<bool> {
        let (table, column) = target.idents(self);

        // SELECT EXISTS(SELECT * FROM <table> WHERE user_id = $1 AND <column> = $2)
        let (sql, values) = Query::select()
            .expr(Expr::exists(
                Query::select()
                    .column(Asterisk)
                    .from(table)
                    .and_where(Expr::col(ReactionIdent::UserId).eq(user_id.0))
                    .and_where(Expr::col(column).eq(target.raw_id()))
                    .take(),
            ))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_scalar_with::<_, bool, _>(&sql, values)
            .fetch_one(conn)
            .await
            .erase_context()
            .attach_printable("could not check reaction")
    }
}

#[cfg(test)]
mod tests {
    use crate::reaction::{Reaction, ReactionTarget};
    use crate::recipe::Recipe;
    use foodie_db::Pool;
    use foodie_error::ext::ResultExt;
    use foodie_error::Result;

    #[tokio::test]
    async fn should_react_once_per_user() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let bob = crate::test_utils::insert_user(&mut conn, "bob@example.com").await;
        let recipe = crate::test_utils::insert_recipe(&mut conn, alice.id, "Khichuri", 10).await;
        let target = ReactionTarget::Recipe(recipe.id);

        assert!(Reaction::Like.add(&mut conn, bob.id, target).await.erase_context()?);
        assert!(!Reaction::Like.add(&mut conn, bob.id, target).await.erase_context()?);
        assert!(Reaction::Save.add(&mut conn, bob.id, target).await.erase_context()?);

        assert!(Reaction::Like.exists(&mut conn, bob.id, target).await?);
        assert!(!Reaction::Like.exists(&mut conn, alice.id, target).await?);

        for reaction in [Reaction::Like, Reaction::Save] {
            target.counter(reaction).refresh(&mut conn).await.erase_context()?;
        }
        let recipe = Recipe::find(&mut conn, recipe.id).await?.unwrap();
        assert_eq!(recipe.likes_count, 1);
        assert_eq!(recipe.saves_count, 1);

        assert!(Reaction::Like.remove(&mut conn, bob.id, target).await.erase_context()?);
        assert!(!Reaction::Like.remove(&mut conn, bob.id, target).await.erase_context()?);

        let likes = target
            .counter(Reaction::Like)
            .refresh(&mut conn)
            .await
            .erase_context()?;
        assert_eq!(likes, Some(0));

        Ok(())
    }
}
