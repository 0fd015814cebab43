use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::id::RecipeId;
use crate::ingredient::{Ingredient, IngredientIdent, NewIngredient, RecipeIngredientIdent};

#[derive(Debug, Error)]
#[error("Could not replace ingredients of recipe")]
pub struct ReplaceIngredientsError;

impl Ingredient {
    /// Lists the ingredients of a recipe, sorted by name.
    #[tracing::instrument(skip_all, name = "db.ingredients.list_for_recipe")]
    pub async fn list_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: RecipeId,
    ) -> Result<Vec<Self>> {
        let (sql, values) = Query::select()
            .column((IngredientIdent::Ingredients, Asterisk))
            .from(IngredientIdent::Ingredients)
            .inner_join(
                RecipeIngredientIdent::RecipeIngredients,
                Expr::col((
                    RecipeIngredientIdent::RecipeIngredients,
                    RecipeIngredientIdent::IngredientId,
                ))
                .equals((IngredientIdent::Ingredients, IngredientIdent::Id)),
            )
            .and_where(
                Expr::col((
                    RecipeIngredientIdent::RecipeIngredients,
                    RecipeIngredientIdent::RecipeId,
                ))
                .eq(recipe_id.0),
            )
            .order_by((IngredientIdent::Ingredients, IngredientIdent::Name), Order::Asc)
            .order_by((IngredientIdent::Ingredients, IngredientIdent::Id), Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list ingredients of recipe")
    }

    /// Replaces every ingredient linked to the recipe with `ingredients`.
    /// Repeated entries are linked once.
    #[tracing::instrument(skip_all, fields(recipe.id = %recipe_id), name = "db.ingredients.replace_for_recipe")]
    pub async fn replace_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: RecipeId,
        ingredients: &[NewIngredient<'_>],
    ) -> Result<Vec<Self>, ReplaceIngredientsError> {
        let (sql, values) = Query::delete()
            .from_table(RecipeIngredientIdent::RecipeIngredients)
            .and_where(Expr::col(RecipeIngredientIdent::RecipeId).eq(recipe_id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&mut *conn)
            .await
            .change_context(ReplaceIngredientsError)
            .attach_printable("could not unlink previous ingredients")?;

        for new in ingredients {
            let ingredient = new
                .find_or_insert(&mut *conn)
                .await
                .change_context(ReplaceIngredientsError)?;

            let (sql, values) = Query::insert()
                .into_table(RecipeIngredientIdent::RecipeIngredients)
                .columns([
                    RecipeIngredientIdent::RecipeId,
                    RecipeIngredientIdent::IngredientId,
                ])
                .values_panic([recipe_id.0.into(), ingredient.id.0.into()])
                .on_conflict(OnConflict::new().do_nothing().to_owned())
                .build_sqlx(SqliteQueryBuilder);

            sqlx::query_with(&sql, values)
                .execute(&mut *conn)
                .await
                .change_context(ReplaceIngredientsError)
                .attach_printable("could not link ingredient to recipe")?;
        }

        Self::list_for_recipe(conn, recipe_id)
            .await
            .change_context(ReplaceIngredientsError)
    }
}

impl NewIngredient<'_> {
    #[tracing::instrument(skip_all, name = "db.ingredients.find_or_insert")]
    pub async fn find_or_insert(&self, conn: &mut SqliteConnection) -> Result<Ingredient> {
        let name = self.name.trim();
        let quantity = self.quantity.trim();
        let unit = self.unit.map(|unit| unit.as_str());

        // The unique index covers `IFNULL(unit, '')`, so no conflict target.
        let (sql, values) = Query::insert()
            .into_table(IngredientIdent::Ingredients)
            .columns([
                IngredientIdent::Name,
                IngredientIdent::Quantity,
                IngredientIdent::Unit,
            ])
            .values_panic([name.into(), quantity.into(), unit.into()])
            .on_conflict(OnConflict::new().do_nothing().to_owned())
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        let inserted = sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_optional(&mut *conn)
            .await
            .erase_context()
            .attach_printable("could not insert ingredient")?;

        if let Some(ingredient) = inserted {
            return Ok(ingredient);
        }

        let unit_condition = match unit {
            Some(unit) => Expr::col(IngredientIdent::Unit).eq(unit),
            None => Expr::col(IngredientIdent::Unit).is_null(),
        };
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(IngredientIdent::Ingredients)
            .and_where(Expr::col(IngredientIdent::Name).eq(name))
            .and_where(Expr::col(IngredientIdent::Quantity).eq(quantity))
            .and_where(unit_condition)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Ingredient, _>(&sql, values)
            .fetch_one(conn)
            .await
            .erase_context()
            .attach_printable("could not find existing ingredient")
    }
}

#[cfg(test)]
mod tests {
    use crate::ingredient::{Ingredient, IngredientUnit, NewIngredient};
    use foodie_db::Pool;
    use foodie_error::ext::ResultExt;
    use foodie_error::Result;

    #[tokio::test]
    async fn should_share_identical_ingredients() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let dal = crate::test_utils::insert_recipe(&mut conn, alice.id, "Dal", 10).await;
        let khichuri = crate::test_utils::insert_recipe(&mut conn, alice.id, "Khichuri", 10).await;

        let rice = NewIngredient {
            name: "Rice",
            quantity: "2",
            unit: Some(IngredientUnit::Cup),
        };
        let salt = NewIngredient {
            name: "Salt",
            quantity: "",
            unit: Some(IngredientUnit::ToTaste),
        };
        let lentils = NewIngredient {
            name: "Lentils",
            quantity: "1",
            unit: None,
        };

        let first = Ingredient::replace_for_recipe(&mut conn, dal.id, &[salt, lentils, lentils])
            .await
            .erase_context()?;
        let second = Ingredient::replace_for_recipe(&mut conn, khichuri.id, &[rice, lentils])
            .await
            .erase_context()?;

        let names = first.iter().map(|v| v.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Lentils", "Salt"]);
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(second[1].unit, Some(IngredientUnit::Cup));

        let replaced = Ingredient::replace_for_recipe(&mut conn, dal.id, &[rice])
            .await
            .erase_context()?;
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].id, second[1].id);

        let untouched = Ingredient::list_for_recipe(&mut conn, khichuri.id).await?;
        assert_eq!(untouched, second);

        Ok(())
    }
}
