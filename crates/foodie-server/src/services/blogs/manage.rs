use foodie_error::ApiError;
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::blog::{self, Blog, BlogView, InsertBlog};
use foodie_model::counter::Counter;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug)]
pub struct CreateBlog<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub content: &'a str,
    /// Blog category slug.
    pub category: Option<&'a str>,
}

impl CreateBlog<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.create")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<BlogView, ApiError> {
        super::check_required("title", self.title)?;
        super::check_required("content", self.content)?;

        let mut conn = app.db_write().await?;
        let category_id = match self.category {
            Some(slug) => Some(super::resolve_category(&mut conn, slug).await?),
            None => None,
        };

        let title = self.title.trim();
        let slug = Blog::unique_slug(&mut conn, title).await?;
        let blog = InsertBlog::builder()
            .author_id(session_user.id)
            .maybe_category_id(category_id)
            .title(title)
            .slug(&slug)
            .description(self.description.trim())
            .content(self.content)
            .build()
            .insert(&mut conn)
            .await?;

        Counter::UserBlogs(session_user.id).refresh(&mut conn).await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::BlogCreated)
            .description(activity::describe(
                &session_user.email,
                "created",
                "blog",
                &blog.title,
            ))
            .related_object((ObjectType::Blog, blog.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let Some(view) = BlogView::find_by_slug(&mut conn, &blog.slug).await? else {
            return Err(util::blog_not_found());
        };
        conn.commit().await?;

        Ok(view)
    }
}

#[derive(Debug, Default)]
pub struct UpdateBlog<'a> {
    pub slug: &'a str,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub content: Option<&'a str>,
    /// `Some(None)` removes the blog from its category.
    pub category: Option<Option<&'a str>>,
}

impl UpdateBlog<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.update")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<BlogView, ApiError> {
        if let Some(title) = self.title {
            super::check_required("title", title)?;
        }
        if let Some(content) = self.content {
            super::check_required("content", content)?;
        }

        let mut conn = app.db_write().await?;
        let current = super::find_blog(&mut conn, self.slug).await?;
        util::check_owner(
            session_user,
            current.author_id,
            "You can only edit your own blogs",
        )?;

        let category_id = match self.category {
            Some(Some(slug)) => Some(Some(super::resolve_category(&mut conn, slug).await?)),
            Some(None) => Some(None),
            None => None,
        };

        let changes = blog::UpdateBlog {
            category_id,
            title: self.title.map(str::trim),
            description: self.description.map(str::trim),
            content: self.content,
        };
        let Some(updated) = changes.update(&mut conn, current.id).await? else {
            return Err(util::blog_not_found());
        };

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::BlogUpdated)
            .description(activity::describe(
                &session_user.email,
                "updated",
                "blog",
                &updated.title,
            ))
            .related_object((ObjectType::Blog, updated.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        let Some(view) = BlogView::find_by_slug(&mut conn, &updated.slug).await? else {
            return Err(util::blog_not_found());
        };
        conn.commit().await?;

        Ok(view)
    }
}

#[derive(Debug)]
pub struct DeleteBlog<'a> {
    pub slug: &'a str,
}

impl DeleteBlog<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.delete")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;
        util::check_owner(
            session_user,
            blog.author_id,
            "You can only delete your own blogs",
        )?;

        if !Blog::delete(&mut conn, blog.id).await? {
            return Err(util::blog_not_found());
        }
        Counter::UserBlogs(blog.author_id).refresh(&mut conn).await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::BlogDeleted)
            .description(activity::describe(
                &session_user.email,
                "deleted",
                "blog",
                &blog.title,
            ))
            .related_object((ObjectType::Blog, blog.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use foodie_model::activity::UserActivity;
    use serde_json::json;

    use super::*;
    use crate::services::categories::CreateBlogCategory;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_blog() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let session_user = alice.get_session_user(&app).await;
        CreateBlogCategory { name: "Travel" }
            .perform(&app, &session_user)
            .await
            .unwrap();

        let view = CreateBlog {
            title: "Street Food of Old Dhaka",
            description: "A walk through the lanes.",
            content: "Start at Chawk Bazaar...",
            category: Some("travel"),
        }
        .perform(&app, &session_user)
        .await
        .unwrap();

        assert_eq!(view.blog.slug, "street-food-of-old-dhaka");
        assert_eq!(view.category_name.as_deref(), Some("Travel"));
        assert_eq!(view.author_email, "alice@example.com");

        let author = test_utils::users::find(&app, alice.user.id).await;
        assert_eq!(author.blogs_count, 1);

        let mut conn = app.db_read().await.unwrap();
        let activities = UserActivity::list_for_user(&mut conn, alice.user.id, None, 1)
            .await
            .unwrap();
        assert_eq!(activities[0].activity_type, ActivityType::BlogCreated);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_update_and_delete_own_blog_only() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let bob = test_utils::users::start_session()
            .app(&app)
            .email("bob@example.com")
            .call()
            .await;
        let blog = test_utils::blogs::create()
            .app(&app)
            .author(&alice)
            .title("Pitha Season")
            .call()
            .await;

        let error = UpdateBlog {
            slug: &blog.blog.slug,
            title: Some("Mine now"),
            ..Default::default()
        }
        .perform(&app, &bob.get_session_user(&app).await)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "forbidden",
                "message": "You can only edit your own blogs",
            }),
        );

        let view = UpdateBlog {
            slug: &blog.blog.slug,
            title: Some("Winter Pitha Season"),
            ..Default::default()
        }
        .perform(&app, &alice.get_session_user(&app).await)
        .await
        .unwrap();
        assert_eq!(view.blog.title, "Winter Pitha Season");
        assert_eq!(view.blog.slug, "pitha-season");

        DeleteBlog {
            slug: &blog.blog.slug,
        }
        .perform(&app, &alice.get_session_user(&app).await)
        .await
        .unwrap();

        let author = test_utils::users::find(&app, alice.user.id).await;
        assert_eq!(author.blogs_count, 0);
    }
}
