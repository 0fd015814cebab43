use bon::Builder;
use chrono::{DateTime, Utc};
use foodie_model::blog::BlogView;
use foodie_model::comment::BlogCommentView;
use foodie_model::id::{BlogCommentId, BlogId};
use serde::{Deserialize, Serialize};

use super::{AuthorRef, CategoryRef};

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct CreateBlog {
    #[builder(into)]
    pub title: String,
    #[serde(default)]
    #[builder(into, default)]
    pub description: String,
    #[builder(into)]
    pub content: String,
    /// Blog category slug.
    #[builder(into)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Builder)]
pub struct UpdateBlog {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `null` removes the blog from its category.
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogDetail {
    pub id: BlogId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: Option<CategoryRef>,
    pub author: AuthorRef,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub saves_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl From<BlogView> for BlogDetail {
    fn from(view: BlogView) -> Self {
        let blog = view.blog;
        Self {
            category: CategoryRef::from_parts(view.category_slug, view.category_name),
            author: AuthorRef {
                id: blog.author_id,
                email: view.author_email,
            },
            id: blog.id,
            slug: blog.slug,
            title: blog.title,
            description: blog.description,
            content: blog.content,
            views_count: blog.views_count,
            likes_count: blog.likes_count,
            comments_count: blog.comments_count,
            saves_count: blog.saves_count,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            is_liked: None,
            is_saved: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogSummary {
    pub id: BlogId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<CategoryRef>,
    pub author: AuthorRef,
    pub views_count: i64,
    pub likes_count: i64,
    pub comments_count: i64,
    pub saves_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<BlogView> for BlogSummary {
    fn from(view: BlogView) -> Self {
        let blog = view.blog;
        Self {
            category: CategoryRef::from_parts(view.category_slug, view.category_name),
            author: AuthorRef {
                id: blog.author_id,
                email: view.author_email,
            },
            id: blog.id,
            slug: blog.slug,
            title: blog.title,
            description: blog.description,
            views_count: blog.views_count,
            likes_count: blog.likes_count,
            comments_count: blog.comments_count,
            saves_count: blog.saves_count,
            created_at: blog.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct CreateBlogComment {
    #[builder(into)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct UpdateBlogComment {
    #[builder(into)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogCommentResponse {
    pub id: BlogCommentId,
    pub author: AuthorRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<BlogCommentView> for BlogCommentResponse {
    fn from(view: BlogCommentView) -> Self {
        Self {
            id: view.comment.id,
            author: AuthorRef {
                id: view.comment.user_id,
                email: view.author_email,
            },
            content: view.comment.content,
            created_at: view.comment.created_at,
        }
    }
}
