use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Alias, Asterisk, Expr, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::id::RecipeId;
use crate::page::Page;
use crate::rating::{InsertRating, Rating, RatingIdent, RatingView};
use crate::user::UserIdent;

#[derive(Debug, Error)]
#[error("Could not rate recipe")]
pub struct RateRecipeError;

impl InsertRating<'_> {
    /// Rates the recipe or replaces the rating the user already gave it.
    ///
    /// The returned flag is `true` if a new rating was created.
    #[tracing::instrument(skip_all, name = "db.ratings.upsert")]
    pub async fn upsert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<(Rating, bool), RateRecipeError> {
        let (sql, values) = Query::insert()
            .into_table(RatingIdent::RecipeRatings)
            .columns([
                RatingIdent::UserId,
                RatingIdent::RecipeId,
                RatingIdent::Rating,
                RatingIdent::Review,
                RatingIdent::CreatedAt,
            ])
            .values_panic([
                self.user_id.0.into(),
                self.recipe_id.0.into(),
                self.rating.into(),
                self.review.trim().into(),
                Utc::now().into(),
            ])
            .on_conflict(
                OnConflict::columns([RatingIdent::UserId, RatingIdent::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        let created = sqlx::query_as_with::<_, Rating, _>(&sql, values)
            .fetch_optional(&mut *conn)
            .await
            .change_context(RateRecipeError)?;

        if let Some(rating) = created {
            return Ok((rating, true));
        }

        // UPDATE recipe_ratings SET rating = <rating>, review = <review>
        //   WHERE user_id = <user_id> AND recipe_id = <recipe_id>
        let (sql, values) = Query::update()
            .table(RatingIdent::RecipeRatings)
            .value(RatingIdent::Rating, self.rating)
            .value(RatingIdent::Review, self.review.trim())
            .and_where(Expr::col(RatingIdent::UserId).eq(self.user_id.0))
            .and_where(Expr::col(RatingIdent::RecipeId).eq(self.recipe_id.0))
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        let rating = sqlx::query_as_with::<_, Rating, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(RateRecipeError)
            .attach_printable("could not replace existing rating")?;

        Ok((rating, false))
    }
}

impl RatingView {
    /// Lists the ratings of a recipe, newest first.
    #[tracing::instrument(skip_all, name = "db.ratings.list_for_recipe")]
    pub async fn list_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: RecipeId,
        page: Page,
    ) -> Result<Vec<Self>> {
        let (sql, values) = Query::select()
            .column((RatingIdent::RecipeRatings, Asterisk))
            .expr_as(
                Expr::col((UserIdent::Users, UserIdent::Email)),
                Alias::new("author_email"),
            )
            .from(RatingIdent::RecipeRatings)
            .inner_join(
                UserIdent::Users,
                Expr::col((UserIdent::Users, UserIdent::Id))
                    .equals((RatingIdent::RecipeRatings, RatingIdent::UserId)),
            )
            .and_where(
                Expr::col((RatingIdent::RecipeRatings, RatingIdent::RecipeId)).eq(recipe_id.0),
            )
            .order_by((RatingIdent::RecipeRatings, RatingIdent::Id), Order::Desc)
            .limit(page.limit())
            .offset(page.offset())
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list ratings of recipe")
    }
}
