use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::id::RecipeId;
use crate::step::{NewRecipeStep, RecipeStep, RecipeStepIdent};

#[derive(Debug, Error)]
#[error("Could not replace steps of recipe")]
pub struct ReplaceStepsError;

impl RecipeStep {
    #[tracing::instrument(skip_all, name = "db.recipe_steps.list_for_recipe")]
    pub async fn list_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: RecipeId,
    ) -> Result<Vec<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(RecipeStepIdent::RecipeSteps)
            .and_where(Expr::col(RecipeStepIdent::RecipeId).eq(recipe_id.0))
            .order_by(RecipeStepIdent::StepNumber, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list steps of recipe")
    }

    /// Deletes the recipe's steps and inserts `steps` in their place.
    ///
    /// A repeated step number results in an error with
    /// [`ErrorCategory::Conflict`](foodie_error::ErrorCategory::Conflict).
    #[tracing::instrument(skip_all, fields(recipe.id = %recipe_id), name = "db.recipe_steps.replace_for_recipe")]
    pub async fn replace_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: RecipeId,
        steps: &[NewRecipeStep<'_>],
    ) -> Result<Vec<Self>, ReplaceStepsError> {
        let (sql, values) = Query::delete()
            .from_table(RecipeStepIdent::RecipeSteps)
            .and_where(Expr::col(RecipeStepIdent::RecipeId).eq(recipe_id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&mut *conn)
            .await
            .change_context(ReplaceStepsError)
            .attach_printable("could not delete previous steps")?;

        if steps.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Query::insert();
        query.into_table(RecipeStepIdent::RecipeSteps).columns([
            RecipeStepIdent::RecipeId,
            RecipeStepIdent::StepNumber,
            RecipeStepIdent::Title,
            RecipeStepIdent::Description,
            RecipeStepIdent::Timer,
        ]);
        for step in steps {
            query.values_panic([
                recipe_id.0.into(),
                step.step_number.into(),
                step.title.trim().into(),
                step.description.trim().into(),
                step.timer.into(),
            ]);
        }
        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&mut *conn)
            .await
            .change_context(ReplaceStepsError)?;

        Self::list_for_recipe(conn, recipe_id)
            .await
            .change_context(ReplaceStepsError)
    }
}
