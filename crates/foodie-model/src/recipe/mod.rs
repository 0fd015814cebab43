use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::id::{CategoryId, RecipeId, UserId};
use crate::user::split_comma_list;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum RecipeStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl RecipeStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,

    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,

    pub prep_time: i64,
    pub cook_time: i64,
    pub total_time: i64,
    pub servings: i64,
    pub difficulty: Difficulty,

    pub instructions: String,
    pub tips: String,
    pub tags: String,

    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,

    pub status: RecipeStatus,
    pub is_featured: bool,

    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub saves_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Recipe {
    #[must_use]
    pub fn tags_list(&self) -> Vec<&str> {
        split_comma_list(&self.tags)
    }

    #[must_use]
    pub fn has_nutrition(&self) -> bool {
        self.calories.is_some()
            || self.protein.is_some()
            || self.carbohydrates.is_some()
            || self.fat.is_some()
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == RecipeStatus::Published
    }
}

/// A recipe joined with its author, category and rating summary.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RecipeView {
    #[sqlx(flatten)]
    pub recipe: Recipe,
    pub author_email: String,
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
    /// `0.0` if the recipe has no ratings yet.
    pub average_rating: f64,
    pub ratings_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeSuggestion {
    pub id: RecipeId,
    pub title: String,
    pub slug: String,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum RecipeIdent {
    Recipes,
    Id,
    AuthorId,
    CategoryId,
    Title,
    Slug,
    Description,
    ShortDescription,
    PrepTime,
    CookTime,
    TotalTime,
    Servings,
    Difficulty,
    Instructions,
    Tips,
    Tags,
    Calories,
    Protein,
    Carbohydrates,
    Fat,
    Status,
    IsFeatured,
    ViewsCount,
    LikesCount,
    CommentsCount,
    SavesCount,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}

#[derive(Debug, Builder)]
pub struct InsertRecipe<'a> {
    #[builder(into)]
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,

    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    #[builder(default)]
    pub short_description: &'a str,

    pub prep_time: i64,
    pub cook_time: i64,
    /// Defaults to `prep_time + cook_time`.
    pub total_time: Option<i64>,
    pub servings: i64,
    #[builder(default)]
    pub difficulty: Difficulty,

    pub instructions: &'a str,
    #[builder(default)]
    pub tips: &'a str,
    #[builder(default)]
    pub tags: &'a str,

    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub fat: Option<f64>,

    #[builder(default)]
    pub status: RecipeStatus,
    #[builder(default)]
    pub is_featured: bool,
}

impl InsertRecipe<'_> {
    #[must_use]
    pub fn resolved_total_time(&self) -> i64 {
        self.total_time
            .unwrap_or_else(|| self.prep_time.saturating_add(self.cook_time))
    }
}

/// Recipe fields to change. Fields left as [`None`] are kept as is.
#[derive(Debug, Default, Builder)]
pub struct UpdateRecipe<'a> {
    pub category_id: Option<Option<CategoryId>>,
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
    pub tags: Option<&'a str>,
    pub calories: Option<Option<f64>>,
    pub protein: Option<Option<f64>>,
    pub carbohydrates: Option<Option<f64>>,
    pub fat: Option<Option<f64>>,
    /// `published_at` is filled in the first time this becomes
    /// [`RecipeStatus::Published`].
    pub status: Option<RecipeStatus>,
    pub is_featured: Option<bool>,
}
