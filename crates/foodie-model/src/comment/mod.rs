use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{BlogCommentId, BlogId, RecipeCommentId, RecipeId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeComment {
    pub id: RecipeCommentId,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    /// Set if this comment is a reply.
    pub parent_id: Option<RecipeCommentId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeCommentView {
    #[sqlx(flatten)]
    pub comment: RecipeComment,
    pub author_email: String,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum RecipeCommentIdent {
    RecipeComments,
    Id,
    UserId,
    RecipeId,
    ParentId,
    Content,
    CreatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertRecipeComment<'a> {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub parent_id: Option<RecipeCommentId>,
    pub content: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BlogComment {
    pub id: BlogCommentId,
    pub user_id: UserId,
    pub blog_id: BlogId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BlogCommentView {
    #[sqlx(flatten)]
    pub comment: BlogComment,
    pub author_email: String,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum BlogCommentIdent {
    BlogComments,
    Id,
    UserId,
    BlogId,
    Content,
    CreatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertBlogComment<'a> {
    pub user_id: UserId,
    pub blog_id: BlogId,
    pub content: &'a str,
}
