use foodie_error::ApiError;
use foodie_model::blog::{Blog, BlogFilter, BlogView};
use foodie_model::page::Page;
use foodie_model::reaction::{Reaction, ReactionTarget};

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug)]
pub struct GetBlog<'a> {
    pub slug: &'a str,
}

#[derive(Debug)]
pub struct GetBlogResult {
    pub view: BlogView,
    pub is_liked: Option<bool>,
    pub is_saved: Option<bool>,
}

impl GetBlog<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.get")]
    pub async fn perform(
        self,
        app: &App,
        session_user: Option<&SessionUser>,
    ) -> Result<GetBlogResult, ApiError> {
        let mut conn = app.db_write().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;
        Blog::increment_views(&mut conn, blog.id).await?;

        let target = ReactionTarget::Blog(blog.id);
        let (is_liked, is_saved) = match session_user {
            Some(user) => (
                Some(Reaction::Like.exists(&mut conn, user.id, target).await?),
                Some(Reaction::Save.exists(&mut conn, user.id, target).await?),
            ),
            None => (None, None),
        };

        let Some(view) = BlogView::find_by_slug(&mut conn, &blog.slug).await? else {
            return Err(util::blog_not_found());
        };
        conn.commit().await?;

        Ok(GetBlogResult {
            view,
            is_liked,
            is_saved,
        })
    }
}

#[derive(Debug)]
pub struct ListBlogsResult {
    pub blogs: Vec<BlogView>,
    pub total: u64,
}

#[derive(Debug, Default)]
pub struct ListBlogs {
    pub filter: BlogFilter,
    pub page: Page,
}

impl ListBlogs {
    #[tracing::instrument(skip_all, name = "services.blogs.list")]
    pub async fn perform(self, app: &App) -> Result<ListBlogsResult, ApiError> {
        let mut conn = app.db_read().await?;
        let blogs = BlogView::list(&mut conn, &self.filter, self.page).await?;
        let total = BlogView::count(&mut conn, &self.filter).await?;

        Ok(ListBlogsResult { blogs, total })
    }
}
