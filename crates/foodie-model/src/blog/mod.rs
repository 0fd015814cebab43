use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use serde::Deserialize;
use sqlx::FromRow;

use crate::id::{BlogCategoryId, BlogId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Blog {
    pub id: BlogId,
    pub author_id: UserId,
    pub category_id: Option<BlogCategoryId>,

    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,

    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub saves_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BlogView {
    #[sqlx(flatten)]
    pub blog: Blog,
    pub author_email: String,
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum BlogIdent {
    Blogs,
    Id,
    AuthorId,
    CategoryId,
    Title,
    Slug,
    Description,
    Content,
    ViewsCount,
    LikesCount,
    CommentsCount,
    SavesCount,
    CreatedAt,
    UpdatedAt,
}

/// Optional constraints for listing blogs.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BlogFilter {
    pub author_id: Option<UserId>,
    /// Blog category slug.
    pub category: Option<String>,
}

#[derive(Debug, Builder)]
pub struct InsertBlog<'a> {
    #[builder(into)]
    pub author_id: UserId,
    pub category_id: Option<BlogCategoryId>,
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Default, Builder)]
pub struct UpdateBlog<'a> {
    pub category_id: Option<Option<BlogCategoryId>>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub content: Option<&'a str>,
}
