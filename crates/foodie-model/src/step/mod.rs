use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{RecipeId, RecipeStepId};

/// A numbered preparation step of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeStep {
    pub id: RecipeStepId,
    pub recipe_id: RecipeId,
    pub step_number: i64,
    pub title: String,
    pub description: String,
    /// Seconds.
    pub timer: Option<i64>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum RecipeStepIdent {
    RecipeSteps,
    Id,
    RecipeId,
    StepNumber,
    Title,
    Description,
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRecipeStep<'a> {
    pub step_number: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub timer: Option<i64>,
}
