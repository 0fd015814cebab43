use foodie_error::ApiError;
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::counter::Counter;
use foodie_model::ingredient::NewIngredient;
use foodie_model::recipe::{self, Difficulty, Recipe, RecipeStatus, RecipeView};
use foodie_model::step::NewRecipeStep;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug, Default)]
pub struct UpdateRecipe<'a> {
    pub slug: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub short_description: Option<&'a str>,
    pub prep_time: Option<i64>,
    pub cook_time: Option<i64>,
    pub total_time: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub instructions: Option<&'a str>,
    pub tips: Option<&'a str>,
    /// Comma separated.
    pub tags: Option<&'a str>,
    /// `Some(None)` removes the recipe from its category.
    pub category: Option<Option<&'a str>>,
    pub calories: Option<Option<f64>>,
    pub protein: Option<Option<f64>>,
    pub carbohydrates: Option<Option<f64>>,
    pub fat: Option<Option<f64>>,
    pub status: Option<RecipeStatus>,
    pub is_featured: Option<bool>,
    /// Replaces every ingredient of the recipe when given.
    pub ingredients: Option<Vec<NewIngredient<'a>>>,
    /// Replaces every step of the recipe when given.
    pub steps: Option<Vec<NewRecipeStep<'a>>>,
}

impl UpdateRecipe<'_> {
    fn validate(&self) -> Result<(), ApiError> {
        let required = [
            ("title", self.title),
            ("description", self.description),
            ("instructions", self.instructions),
        ];
        for (field, value) in required {
            if let Some(value) = value {
                super::check_required(field, value)?;
            }
        }

        let minutes = [
            ("preparation time", self.prep_time),
            ("cooking time", self.cook_time),
            ("total time", self.total_time),
        ];
        for (field, value) in minutes {
            if let Some(value) = value {
                super::check_minutes(field, value)?;
            }
        }

        if let Some(servings) = self.servings {
            super::check_servings(servings)?;
        }
        for value in [self.calories, self.protein, self.carbohydrates, self.fat] {
            super::check_nutrition(value.flatten())?;
        }
        if let Some(ingredients) = &self.ingredients {
            super::check_ingredients(ingredients)?;
        }
        if let Some(steps) = &self.steps {
            super::check_steps(steps)?;
        }
        Ok(())
    }

    /// Keeps `total_time` in line with the preparation and cooking time
    /// unless it was given explicitly.
    fn total_time(&self, current: &Recipe) -> Option<i64> {
        if self.total_time.is_some() {
            return self.total_time;
        }
        if self.prep_time.is_none() && self.cook_time.is_none() {
            return None;
        }
        let prep_time = self.prep_time.unwrap_or(current.prep_time);
        let cook_time = self.cook_time.unwrap_or(current.cook_time);
        Some(prep_time.saturating_add(cook_time))
    }

    #[tracing::instrument(skip_all, name = "services.recipes.update")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<super::RecipeDetails, ApiError> {
        self.validate()?;

        let mut conn = app.db_write().await?;
        let Some(current) = Recipe::find_by_slug(&mut conn, self.slug).await? else {
            return Err(util::recipe_not_found());
        };
        if !util::is_recipe_visible(&current, Some(&session_user.user)) {
            return Err(util::recipe_not_found());
        }
        util::check_owner(
            session_user,
            current.author_id,
            "You can only edit your own recipes",
        )?;

        let category_id = match self.category {
            Some(Some(slug)) => Some(Some(super::resolve_category(&mut conn, slug).await?)),
            Some(None) => Some(None),
            None => None,
        };

        let changes = recipe::UpdateRecipe {
            category_id,
            title: self.title.map(str::trim),
            description: self.description,
            short_description: self.short_description,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: self.total_time(&current),
            servings: self.servings,
            difficulty: self.difficulty,
            instructions: self.instructions,
            tips: self.tips,
            tags: self.tags,
            calories: self.calories,
            protein: self.protein,
            carbohydrates: self.carbohydrates,
            fat: self.fat,
            status: self.status,
            is_featured: self.is_featured,
        };

        let Some(updated) = changes.update(&mut conn, current.id).await? else {
            return Err(util::recipe_not_found());
        };
        super::replace_contents(
            &mut conn,
            updated.id,
            self.ingredients.as_deref(),
            self.steps.as_deref(),
        )
        .await?;

        if current.category_id != updated.category_id {
            for category_id in [current.category_id, updated.category_id]
                .into_iter()
                .flatten()
            {
                Counter::CategoryRecipes(category_id)
                    .refresh(&mut conn)
                    .await?;
            }
        }

        let (activity_type, verb) = if !current.is_published() && updated.is_published() {
            (ActivityType::RecipePublished, "published")
        } else {
            (ActivityType::RecipeUpdated, "updated")
        };

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(activity_type)
            .description(activity::describe(
                &session_user.email,
                verb,
                "recipe",
                &updated.title,
            ))
            .related_object((ObjectType::Recipe, updated.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let Some(view) = RecipeView::find(&mut conn, updated.id).await? else {
            return Err(util::recipe_not_found());
        };
        let details = super::RecipeDetails::load(&mut conn, view).await?;
        conn.commit().await?;

        Ok(details)
    }
}

#[derive(Debug)]
pub struct DeleteRecipe<'a> {
    pub slug: &'a str,
}

impl DeleteRecipe<'_> {
    #[tracing::instrument(skip_all, name = "services.recipes.delete")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let Some(recipe) = Recipe::find_by_slug(&mut conn, self.slug).await? else {
            return Err(util::recipe_not_found());
        };
        if !util::is_recipe_visible(&recipe, Some(&session_user.user)) {
            return Err(util::recipe_not_found());
        }
        util::check_owner(
            session_user,
            recipe.author_id,
            "You can only delete your own recipes",
        )?;

        if !Recipe::delete(&mut conn, recipe.id).await? {
            return Err(util::recipe_not_found());
        }

        Counter::UserRecipes(recipe.author_id)
            .refresh(&mut conn)
            .await?;
        if let Some(category_id) = recipe.category_id {
            Counter::CategoryRecipes(category_id)
                .refresh(&mut conn)
                .await?;
        }

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::RecipeDeleted)
            .description(activity::describe(
                &session_user.email,
                "deleted",
                "recipe",
                &recipe.title,
            ))
            .related_object((ObjectType::Recipe, recipe.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(())
    }
}
