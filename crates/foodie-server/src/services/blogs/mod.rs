use foodie_db::SqliteConnection;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::blog::Blog;
use foodie_model::category::BlogCategory;
use foodie_model::id::BlogCategoryId;

use super::util;

mod interact;
mod manage;
mod read;

pub use self::interact::{
    CommentOnBlog, DeleteBlogComment, ListBlogComments, ListBlogCommentsResult, ReactToBlog,
    UpdateBlogComment,
};
pub use self::manage::{CreateBlog, DeleteBlog, UpdateBlog};
pub use self::read::{GetBlog, GetBlogResult, ListBlogs, ListBlogsResult};

fn check_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::new(ApiErrorCategory::InvalidRequest)
            .message(format!("Blog {field} must not be empty")))
    } else {
        Ok(())
    }
}

async fn resolve_category(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<BlogCategoryId, ApiError> {
    match BlogCategory::find_by_slug(conn, slug.trim()).await? {
        Some(category) => Ok(category.id),
        None => Err(ApiError::new(ApiErrorCategory::InvalidRequest)
            .message(format!("Unknown blog category: {}", slug.trim()))),
    }
}

async fn find_blog(conn: &mut SqliteConnection, slug: &str) -> Result<Blog, ApiError> {
    Blog::find_by_slug(conn, slug)
        .await?
        .ok_or_else(util::blog_not_found)
}
