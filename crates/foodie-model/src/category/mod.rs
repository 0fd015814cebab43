use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{BlogCategoryId, CategoryId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum CategoryIdent {
    Categories,
    Id,
    Name,
    Slug,
    Description,
    RecipeCount,
    CreatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertCategory<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    #[builder(default)]
    pub description: &'a str,
}

/// Category fields to change. The slug stays the same on rename.
#[derive(Debug, Default, Builder)]
pub struct UpdateCategory<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl UpdateCategory<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BlogCategory {
    pub id: BlogCategoryId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum BlogCategoryIdent {
    BlogCategories,
    Id,
    Name,
    Slug,
    CreatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertBlogCategory<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

#[derive(Debug, Builder)]
pub struct UpdateBlogCategory<'a> {
    pub name: &'a str,
}
