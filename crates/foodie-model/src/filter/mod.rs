//! Recipe filtering.
//!
//! A [`RecipeFilter`] is the conjunction of every field that is set, an
//! empty filter matches every recipe. It can be turned into a SQL
//! condition or evaluated in memory with [`RecipeFilter::matches`], both
//! forms select the same recipes.
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::id::UserId;
use crate::recipe::{Difficulty, RecipeStatus, RecipeView};

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct RecipeFilter {
    pub min_prep_time: Option<i64>,
    pub max_prep_time: Option<i64>,
    pub min_cook_time: Option<i64>,
    pub max_cook_time: Option<i64>,
    pub min_total_time: Option<i64>,
    pub max_total_time: Option<i64>,
    pub min_servings: Option<i64>,
    pub max_servings: Option<i64>,

    pub difficulty: Option<Difficulty>,
    pub status: Option<RecipeStatus>,
    pub is_featured: Option<bool>,

    /// Category slug.
    pub category: Option<String>,
    /// Author email, compared case-insensitively.
    pub author: Option<String>,
    pub author_id: Option<UserId>,

    /// Comma separated tags. A recipe matches if any of them is
    /// contained in its tag list, ignoring case.
    pub tags: Option<String>,

    /// Minimum average rating. Unrated recipes have an average of `0`.
    pub min_rating: Option<f64>,

    /// Inclusive, from the start of the day in UTC.
    pub created_after: Option<NaiveDate>,
    /// Inclusive, up to the end of the day in UTC.
    pub created_before: Option<NaiveDate>,

    /// Only `true` constrains, recipes with at least one nutrition fact.
    pub has_nutrition: Option<bool>,

    /// Case-insensitive text search over title, descriptions and tags.
    pub search: Option<String>,

    /// Only recipes saved by this user. This requires the saves table so
    /// it is only evaluated in SQL.
    #[serde(skip)]
    pub saved_by: Option<UserId>,
}

impl RecipeFilter {
    /// Trimmed, non-empty tags from [`RecipeFilter::tags`].
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(crate::user::split_comma_list)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.created_after
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Exclusive upper bound, the start of the day after `created_before`.
    /// Includes the whole day, unlike a `lte` against its midnight.
    #[must_use]
    pub fn created_until(&self) -> Option<DateTime<Utc>> {
        self.created_before
            .and_then(|date| date.checked_add_signed(TimeDelta::days(1)))
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }

    /// Evaluates the filter against a recipe without the database.
    ///
    /// [`RecipeFilter::saved_by`] is not evaluated.
    #[must_use]
    pub fn matches(&self, view: &RecipeView) -> bool {
        let recipe = &view.recipe;

        let in_range = |value: i64, min: Option<i64>, max: Option<i64>| {
            min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
        };

        if !in_range(recipe.prep_time, self.min_prep_time, self.max_prep_time)
            || !in_range(recipe.cook_time, self.min_cook_time, self.max_cook_time)
            || !in_range(recipe.total_time, self.min_total_time, self.max_total_time)
            || !in_range(recipe.servings, self.min_servings, self.max_servings)
        {
            return false;
        }

        if self.difficulty.is_some_and(|v| v != recipe.difficulty)
            || self.status.is_some_and(|v| v != recipe.status)
            || self.is_featured.is_some_and(|v| v != recipe.is_featured)
            || self.author_id.is_some_and(|v| v != recipe.author_id)
        {
            return false;
        }

        if let Some(category) = self.category.as_deref() {
            if view.category_slug.as_deref() != Some(category) {
                return false;
            }
        }

        if let Some(author) = self.author.as_deref() {
            if !view.author_email.eq_ignore_ascii_case(author.trim()) {
                return false;
            }
        }

        let tags = self.tag_list();
        if !tags.is_empty() && !tags.iter().any(|tag| contains_ignore_case(&recipe.tags, tag)) {
            return false;
        }

        if self.min_rating.is_some_and(|min| view.average_rating < min) {
            return false;
        }

        if self.created_from().is_some_and(|from| recipe.created_at < from)
            || self.created_until().is_some_and(|until| recipe.created_at >= until)
        {
            return false;
        }

        if self.has_nutrition == Some(true) && !recipe.has_nutrition() {
            return false;
        }

        if let Some(term) = self.search_term() {
            let found = [
                &recipe.title,
                &recipe.description,
                &recipe.short_description,
                &recipe.tags,
            ]
            .iter()
            .any(|field| contains_ignore_case(field, term));

            if !found {
                return false;
            }
        }

        true
    }
}

/// Same semantics as SQLite's `LIKE`, only ASCII letters are folded.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Sort order of recipe listings. Ties are broken by the newest recipe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeOrdering {
    #[default]
    Newest,
    Oldest,
    Views,
    Likes,
    Comments,
    Saves,
    Title,
    Rating,
    /// Most viewed, then most liked, then newest.
    Popular,
}

#[cfg(test)]
mod tests;
