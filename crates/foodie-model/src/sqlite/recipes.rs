use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Condition, Expr, Func, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use super::filter::{like_pattern, recipe_count_select, recipe_view_select};
use crate::filter::{RecipeFilter, RecipeOrdering};
use crate::id::RecipeId;
use crate::page::Page;
use crate::recipe::{
    InsertRecipe, Recipe, RecipeIdent, RecipeStatus, RecipeSuggestion, RecipeView, UpdateRecipe,
};
use crate::slug;

/// Shortest search term [`Recipe::suggestions`] looks up.
const MIN_SUGGESTION_CHARS: usize = 2;
const MAX_SUGGESTIONS: u64 = 10;

#[derive(Debug, Error)]
#[error("Could not insert recipe")]
pub struct InsertRecipeError;

#[derive(Debug, Error)]
#[error("Could not update recipe")]
pub struct UpdateRecipeError;

#[derive(Debug, Error)]
#[error("Could not delete recipe")]
pub struct DeleteRecipeError;

impl Recipe {
    #[tracing::instrument(skip_all, name = "db.recipes.find")]
    pub async fn find(conn: &mut SqliteConnection, id: RecipeId) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(RecipeIdent::Recipes)
            .and_where(Expr::col(RecipeIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find recipe by id")
    }

    #[tracing::instrument(skip_all, name = "db.recipes.find_by_slug")]
    pub async fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(RecipeIdent::Recipes)
            .and_where(Expr::col(RecipeIdent::Slug).eq(slug))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find recipe by slug")
    }

    /// Derives a slug from `title` that no other recipe uses yet.
    #[tracing::instrument(skip_all, name = "db.recipes.unique_slug")]
    pub async fn unique_slug(conn: &mut SqliteConnection, title: &str) -> Result<String> {
        let base = slug::slugify(title, "recipe");
        super::unique_slug(conn, RecipeIdent::Recipes, RecipeIdent::Slug, &base).await
    }

    /// Returns `false` if the recipe does not exist.
    #[tracing::instrument(skip_all, name = "db.recipes.delete")]
    pub async fn delete(
        conn: &mut SqliteConnection,
        id: RecipeId,
    ) -> Result<bool, DeleteRecipeError> {
        let (sql, values) = Query::delete()
            .from_table(RecipeIdent::Recipes)
            .and_where(Expr::col(RecipeIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(DeleteRecipeError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Bumps `views_count` by one. Views are not recounted from any rows.
    #[tracing::instrument(skip_all, name = "db.recipes.increment_views")]
    pub async fn increment_views(conn: &mut SqliteConnection, id: RecipeId) -> Result<()> {
        let (sql, values) = Query::update()
            .table(RecipeIdent::Recipes)
            .value(
                RecipeIdent::ViewsCount,
                Expr::col(RecipeIdent::ViewsCount).add(1),
            )
            .and_where(Expr::col(RecipeIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .erase_context()
            .attach_printable("could not increment recipe views")?;

        Ok(())
    }

    /// Published recipes whose title, description or tags contain `term`.
    ///
    /// Terms shorter than two characters yield no suggestions.
    #[tracing::instrument(skip(conn), name = "db.recipes.suggestions")]
    pub async fn suggestions(
        conn: &mut SqliteConnection,
        term: &str,
    ) -> Result<Vec<RecipeSuggestion>> {
        let term = term.trim();
        if term.chars().count() < MIN_SUGGESTION_CHARS {
            return Ok(Vec::new());
        }

        let (sql, values) = Query::select()
            .columns([RecipeIdent::Id, RecipeIdent::Title, RecipeIdent::Slug])
            .from(RecipeIdent::Recipes)
            .and_where(Expr::col(RecipeIdent::Status).eq(RecipeStatus::Published.as_str()))
            .cond_where(
                Condition::any()
                    .add(Expr::col(RecipeIdent::Title).like(like_pattern(term)))
                    .add(Expr::col(RecipeIdent::Description).like(like_pattern(term)))
                    .add(Expr::col(RecipeIdent::Tags).like(like_pattern(term))),
            )
            .order_by(RecipeIdent::CreatedAt, Order::Desc)
            .order_by(RecipeIdent::Id, Order::Desc)
            .limit(MAX_SUGGESTIONS)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, RecipeSuggestion, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not search recipe suggestions")
    }
}

impl InsertRecipe<'_> {
    /// Inserts the recipe. `published_at` is set right away if it is
    /// created as [`RecipeStatus::Published`].
    #[tracing::instrument(skip_all, name = "db.recipes.insert")]
    pub async fn insert(&self, conn: &mut SqliteConnection) -> Result<Recipe, InsertRecipeError> {
        use RecipeIdent as R;

        let now = Utc::now();
        let published_at = (self.status == RecipeStatus::Published).then_some(now);

        let (sql, values) = Query::insert()
            .into_table(R::Recipes)
            .columns([
                R::AuthorId,
                R::CategoryId,
                R::Title,
                R::Slug,
                R::Description,
                R::ShortDescription,
                R::PrepTime,
                R::CookTime,
                R::TotalTime,
                R::Servings,
                R::Difficulty,
                R::Instructions,
                R::Tips,
                R::Tags,
                R::Calories,
                R::Protein,
                R::Carbohydrates,
                R::Fat,
                R::Status,
                R::IsFeatured,
                R::CreatedAt,
                R::UpdatedAt,
                R::PublishedAt,
            ])
            .values_panic([
                self.author_id.0.into(),
                self.category_id.map(|v| v.0).into(),
                self.title.trim().into(),
                self.slug.into(),
                self.description.into(),
                self.short_description.into(),
                self.prep_time.into(),
                self.cook_time.into(),
                self.resolved_total_time().into(),
                self.servings.into(),
                self.difficulty.as_str().into(),
                self.instructions.into(),
                self.tips.into(),
                self.tags.into(),
                self.calories.into(),
                self.protein.into(),
                self.carbohydrates.into(),
                self.fat.into(),
                self.status.as_str().into(),
                self.is_featured.into(),
                now.into(),
                now.into(),
                published_at.into(),
            ])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Recipe, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertRecipeError)
    }
}

impl UpdateRecipe<'_> {
    /// Applies the changes. Returns [`None`] if the recipe does not exist.
    #[tracing::instrument(skip_all, name = "db.recipes.update")]
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: RecipeId,
    ) -> Result<Option<Recipe>, UpdateRecipeError> {
        use RecipeIdent as R;

        let now = Utc::now();
        let mut query = Query::update();
        query
            .table(R::Recipes)
            .value(R::UpdatedAt, now)
            .and_where(Expr::col(R::Id).eq(id.0))
            .returning_all();

        if let Some(category_id) = self.category_id {
            query.value(R::CategoryId, category_id.map(|v| v.0));
        }
        if let Some(title) = self.title {
            query.value(R::Title, title.trim());
        }
        if let Some(description) = self.description {
            query.value(R::Description, description);
        }
        if let Some(short_description) = self.short_description {
            query.value(R::ShortDescription, short_description);
        }
        if let Some(prep_time) = self.prep_time {
            query.value(R::PrepTime, prep_time);
        }
        if let Some(cook_time) = self.cook_time {
            query.value(R::CookTime, cook_time);
        }
        if let Some(total_time) = self.total_time {
            query.value(R::TotalTime, total_time);
        }
        if let Some(servings) = self.servings {
            query.value(R::Servings, servings);
        }
        if let Some(difficulty) = self.difficulty {
            query.value(R::Difficulty, difficulty.as_str());
        }
        if let Some(instructions) = self.instructions {
            query.value(R::Instructions, instructions);
        }
        if let Some(tips) = self.tips {
            query.value(R::Tips, tips);
        }
        if let Some(tags) = self.tags {
            query.value(R::Tags, tags);
        }
        if let Some(calories) = self.calories {
            query.value(R::Calories, calories);
        }
        if let Some(protein) = self.protein {
            query.value(R::Protein, protein);
        }
        if let Some(carbohydrates) = self.carbohydrates {
            query.value(R::Carbohydrates, carbohydrates);
        }
        if let Some(fat) = self.fat {
            query.value(R::Fat, fat);
        }
        if let Some(status) = self.status {
            query.value(R::Status, status.as_str());
            if status == RecipeStatus::Published {
                query.value(
                    R::PublishedAt,
                    Func::coalesce([Expr::col(R::PublishedAt).into(), Expr::val(now).into()]),
                );
            }
        }
        if let Some(is_featured) = self.is_featured {
            query.value(R::IsFeatured, is_featured);
        }

        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, Recipe, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UpdateRecipeError)
    }
}

impl RecipeView {
    #[tracing::instrument(skip_all, name = "db.recipes.view.find")]
    pub async fn find(conn: &mut SqliteConnection, id: RecipeId) -> Result<Option<Self>> {
        let (sql, values) = recipe_view_select()
            .and_where(Expr::col((RecipeIdent::Recipes, RecipeIdent::Id)).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find recipe view by id")
    }

    #[tracing::instrument(skip_all, name = "db.recipes.view.find_by_slug")]
    pub async fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        let (sql, values) = recipe_view_select()
            .and_where(Expr::col((RecipeIdent::Recipes, RecipeIdent::Slug)).eq(slug))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find recipe view by slug")
    }

    /// Lists the recipes matching `filter`.
    #[tracing::instrument(skip(conn), name = "db.recipes.view.list")]
    pub async fn list(
        conn: &mut SqliteConnection,
        filter: &RecipeFilter,
        ordering: RecipeOrdering,
        page: Page,
    ) -> Result<Vec<Self>> {
        let mut select = recipe_view_select();
        select
            .cond_where(filter.condition())
            .limit(page.limit())
            .offset(page.offset());
        ordering.apply(&mut select);

        let (sql, values) = select.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list recipes")
    }

    /// Counts every recipe matching `filter`, regardless of pagination.
    #[tracing::instrument(skip(conn), name = "db.recipes.view.count")]
    pub async fn count(conn: &mut SqliteConnection, filter: &RecipeFilter) -> Result<u64> {
        let (sql, values) = recipe_count_select()
            .cond_where(filter.condition())
            .build_sqlx(SqliteQueryBuilder);

        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(conn)
            .await
            .erase_context()
            .attach_printable("could not count recipes")?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
