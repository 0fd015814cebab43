use foodie_db::SqliteConnection;
use foodie_error::{ApiError, ApiErrorCategory};
use std::collections::HashSet;

use foodie_model::category::Category;
use foodie_model::id::{CategoryId, RecipeId};
use foodie_model::ingredient::{Ingredient, NewIngredient};
use foodie_model::recipe::RecipeView;
use foodie_model::step::{NewRecipeStep, RecipeStep};

mod comments;
mod create;
mod detail;
mod list;
mod ratings;
mod reactions;
mod update;

pub use self::comments::{
    CommentOnRecipe, DeleteRecipeComment, ListRecipeComments, ListRecipeCommentsResult,
};
pub use self::create::CreateRecipe;
pub use self::detail::{GetRecipe, GetRecipeResult};
pub use self::list::{
    ListRecipes, ListRecipesResult, ListSavedRecipes, RecipeShortcut, RecipeSuggestions,
};
pub use self::ratings::{ListRatings, ListRatingsResult, RateRecipe};
pub use self::reactions::ReactToRecipe;
pub use self::update::{DeleteRecipe, UpdateRecipe};

/// A recipe together with its ingredients and steps.
#[derive(Debug)]
pub struct RecipeDetails {
    pub view: RecipeView,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<RecipeStep>,
}

impl RecipeDetails {
    async fn load(conn: &mut SqliteConnection, view: RecipeView) -> Result<Self, ApiError> {
        let ingredients = Ingredient::list_for_recipe(conn, view.recipe.id).await?;
        let steps = RecipeStep::list_for_recipe(conn, view.recipe.id).await?;
        Ok(Self {
            view,
            ingredients,
            steps,
        })
    }
}

fn invalid(message: impl Into<String>) -> ApiError {
    ApiError::new(ApiErrorCategory::InvalidRequest).message(message)
}

fn check_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(invalid(format!("Recipe {field} must not be empty")))
    } else {
        Ok(())
    }
}

fn check_minutes(field: &str, value: i64) -> Result<(), ApiError> {
    if value < 0 {
        Err(invalid(format!("Recipe {field} cannot be negative")))
    } else {
        Ok(())
    }
}

fn check_servings(servings: i64) -> Result<(), ApiError> {
    if servings < 1 {
        Err(invalid("Recipe must serve at least one person"))
    } else {
        Ok(())
    }
}

fn check_nutrition(value: Option<f64>) -> Result<(), ApiError> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(invalid("Nutrition facts must be positive numbers"))
        }
        _ => Ok(()),
    }
}

fn check_ingredients(ingredients: &[NewIngredient<'_>]) -> Result<(), ApiError> {
    if ingredients.iter().any(|v| v.name.trim().is_empty()) {
        return Err(invalid("Ingredient name must not be empty"));
    }
    Ok(())
}

fn check_steps(steps: &[NewRecipeStep<'_>]) -> Result<(), ApiError> {
    let mut numbers = HashSet::new();
    for step in steps {
        if step.step_number < 1 {
            return Err(invalid("Step numbers must start from 1"));
        }
        if !numbers.insert(step.step_number) {
            return Err(invalid(format!(
                "Step number {} is used more than once",
                step.step_number
            )));
        }
        if step.title.trim().is_empty() {
            return Err(invalid("Step title must not be empty"));
        }
        if step.timer.is_some_and(|v| v < 0) {
            return Err(invalid("Step timer cannot be negative"));
        }
    }
    Ok(())
}

async fn replace_contents(
    conn: &mut SqliteConnection,
    recipe_id: RecipeId,
    ingredients: Option<&[NewIngredient<'_>]>,
    steps: Option<&[NewRecipeStep<'_>]>,
) -> Result<(), ApiError> {
    if let Some(ingredients) = ingredients {
        Ingredient::replace_for_recipe(conn, recipe_id, ingredients).await?;
    }
    if let Some(steps) = steps {
        RecipeStep::replace_for_recipe(conn, recipe_id, steps).await?;
    }
    Ok(())
}

async fn resolve_category(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<CategoryId, ApiError> {
    match Category::find_by_slug(conn, slug.trim()).await? {
        Some(category) => Ok(category.id),
        None => Err(invalid(format!("Unknown recipe category: {}", slug.trim()))),
    }
}
