use bon::Builder;
use chrono::{DateTime, Utc};
use foodie_model::comment::RecipeCommentView;
use foodie_model::filter::RecipeOrdering;
use foodie_model::id::{IngredientId, RatingId, RecipeCommentId, RecipeId, RecipeStepId};
use foodie_model::ingredient::{Ingredient, IngredientUnit, NewIngredient};
use foodie_model::rating::RatingView;
use foodie_model::recipe::{Difficulty, RecipeStatus, RecipeSuggestion, RecipeView};
use foodie_model::step::{NewRecipeStep, RecipeStep};
use serde::{Deserialize, Serialize};

use super::{AuthorRef, CategoryRef};

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct CreateRecipe {
    #[builder(into)]
    pub title: String,
    #[builder(into)]
    pub description: String,
    #[serde(default)]
    #[builder(into, default)]
    pub short_description: String,
    pub prep_time: i64,
    pub cook_time: i64,
    /// Defaults to `prep_time + cook_time`.
    pub total_time: Option<i64>,
    pub servings: i64,
    #[serde(default)]
    #[builder(default)]
    pub difficulty: Difficulty,
    #[builder(into)]
    pub instructions: String,
    #[serde(default)]
    #[builder(into, default)]
    pub tips: String,
    #[serde(default)]
    #[builder(default)]
    pub tags: Vec<String>,
    /// Category slug.
    #[builder(into)]
    pub category: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
    #[serde(default)]
    #[builder(default)]
    pub status: RecipeStatus,
    #[serde(default)]
    #[builder(default)]
    pub is_featured: bool,
    #[serde(default)]
    #[builder(default)]
    pub ingredients: Vec<IngredientForm>,
    #[serde(default)]
    #[builder(default)]
    pub steps: Vec<StepForm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct IngredientForm {
    #[builder(into)]
    pub name: String,
    #[serde(default)]
    #[builder(into, default)]
    pub quantity: String,
    pub unit: Option<IngredientUnit>,
}

impl IngredientForm {
    #[must_use]
    pub fn as_new(&self) -> NewIngredient<'_> {
        NewIngredient {
            name: &self.name,
            quantity: &self.quantity,
            unit: self.unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct StepForm {
    pub step_number: i64,
    #[builder(into)]
    pub title: String,
    #[serde(default)]
    #[builder(into, default)]
    pub description: String,
    /// Seconds.
    pub timer: Option<i64>,
}

impl StepForm {
    #[must_use]
    pub fn as_new(&self) -> NewRecipeStep<'_> {
        NewRecipeStep {
            step_number: self.step_number,
            title: &self.title,
            description: &self.description,
            timer: self.timer,
        }
    }
}

/// Fields left out are kept as is, nullable fields are cleared with `null`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Builder)]
pub struct UpdateRecipe {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub calories: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub protein: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub carbohydrates: Option<Option<f64>>,
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fat: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecipeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    /// Replaces every ingredient when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientForm>>,
    /// Replaces every step when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepForm>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub total_time: i64,
    pub servings: i64,
    pub difficulty: Difficulty,
    pub instructions: String,
    pub tips: String,
    pub tags: Vec<String>,
    pub category: Option<CategoryRef>,
    pub author: AuthorRef,
    pub nutrition: Nutrition,
    pub status: RecipeStatus,
    pub is_featured: bool,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub saves_count: i64,
    pub average_rating: f64,
    pub ratings_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub ingredients: Vec<IngredientResponse>,
    pub steps: Vec<StepResponse>,
    /// Only present for authenticated requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl From<RecipeView> for RecipeDetail {
    fn from(view: RecipeView) -> Self {
        let recipe = view.recipe;
        Self {
            tags: recipe.tags_list().into_iter().map(String::from).collect(),
            nutrition: Nutrition {
                calories: recipe.calories,
                protein: recipe.protein,
                carbohydrates: recipe.carbohydrates,
                fat: recipe.fat,
            },
            category: CategoryRef::from_parts(view.category_slug, view.category_name),
            author: AuthorRef {
                id: recipe.author_id,
                email: view.author_email,
            },
            id: recipe.id,
            slug: recipe.slug,
            title: recipe.title,
            description: recipe.description,
            short_description: recipe.short_description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time: recipe.total_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            instructions: recipe.instructions,
            tips: recipe.tips,
            status: recipe.status,
            is_featured: recipe.is_featured,
            views_count: recipe.views_count,
            likes_count: recipe.likes_count,
            comments_count: recipe.comments_count,
            saves_count: recipe.saves_count,
            average_rating: view.average_rating,
            ratings_count: view.ratings_count,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            published_at: recipe.published_at,
            ingredients: Vec::new(),
            steps: Vec::new(),
            is_liked: None,
            is_saved: None,
        }
    }
}

impl RecipeDetail {
    #[must_use]
    pub fn with_contents(mut self, ingredients: Vec<Ingredient>, steps: Vec<RecipeStep>) -> Self {
        self.ingredients = ingredients.into_iter().map(IngredientResponse::from).collect();
        self.steps = steps.into_iter().map(StepResponse::from).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientResponse {
    pub id: IngredientId,
    pub name: String,
    pub quantity: String,
    pub unit: Option<IngredientUnit>,
}

impl From<Ingredient> for IngredientResponse {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id,
            name: value.name,
            quantity: value.quantity,
            unit: value.unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResponse {
    pub id: RecipeStepId,
    pub step_number: i64,
    pub title: String,
    pub description: String,
    pub timer: Option<i64>,
}

impl From<RecipeStep> for StepResponse {
    fn from(value: RecipeStep) -> Self {
        Self {
            id: value.id,
            step_number: value.step_number,
            title: value.title,
            description: value.description,
            timer: value.timer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub slug: String,
    pub title: String,
    pub short_description: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub total_time: i64,
    pub servings: i64,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub category: Option<CategoryRef>,
    pub author: AuthorRef,
    pub status: RecipeStatus,
    pub is_featured: bool,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub saves_count: i64,
    pub average_rating: f64,
    pub ratings_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeView> for RecipeSummary {
    fn from(view: RecipeView) -> Self {
        let recipe = view.recipe;
        Self {
            tags: recipe.tags_list().into_iter().map(String::from).collect(),
            category: CategoryRef::from_parts(view.category_slug, view.category_name),
            author: AuthorRef {
                id: recipe.author_id,
                email: view.author_email,
            },
            id: recipe.id,
            slug: recipe.slug,
            title: recipe.title,
            short_description: recipe.short_description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time: recipe.total_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            status: recipe.status,
            is_featured: recipe.is_featured,
            views_count: recipe.views_count,
            likes_count: recipe.likes_count,
            comments_count: recipe.comments_count,
            saves_count: recipe.saves_count,
            average_rating: view.average_rating,
            ratings_count: view.ratings_count,
            created_at: recipe.created_at,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct OrderingParams {
    #[serde(default)]
    pub ordering: RecipeOrdering,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: RecipeId,
    pub title: String,
    pub slug: String,
}

impl From<RecipeSuggestion> for Suggestion {
    fn from(value: RecipeSuggestion) -> Self {
        Self {
            id: value.id,
            title: value.title,
            slug: value.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct RateRecipe {
    pub rating: i64,
    #[serde(default)]
    #[builder(into, default)]
    pub review: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResponse {
    pub id: RatingId,
    pub author: AuthorRef,
    pub rating: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl From<RatingView> for RatingResponse {
    fn from(view: RatingView) -> Self {
        Self {
            id: view.rating.id,
            author: AuthorRef {
                id: view.rating.user_id,
                email: view.author_email,
            },
            rating: view.rating.rating,
            review: view.rating.review,
            created_at: view.rating.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct CreateComment {
    #[builder(into)]
    pub content: String,
    /// Comment this one replies to.
    pub parent_id: Option<RecipeCommentId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: RecipeCommentId,
    pub author: AuthorRef,
    pub parent_id: Option<RecipeCommentId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeCommentView> for CommentResponse {
    fn from(view: RecipeCommentView) -> Self {
        Self {
            id: view.comment.id,
            author: AuthorRef {
                id: view.comment.user_id,
                email: view.author_email,
            },
            parent_id: view.comment.parent_id,
            content: view.comment.content,
            created_at: view.comment.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SaveResponse {
    pub saved: bool,
    pub saves_count: i64,
}
