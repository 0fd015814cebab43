use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::comment::{BlogComment, BlogCommentView, InsertBlogComment};
use foodie_model::counter::Counter;
use foodie_model::id::BlogCommentId;
use foodie_model::page::Page;
use foodie_model::reaction::{Reaction, ReactionTarget};

use crate::extract::SessionUser;
use crate::services::{reactions, util};
use crate::App;

#[derive(Debug)]
pub struct CommentOnBlog<'a> {
    pub slug: &'a str,
    pub content: &'a str,
}

impl CommentOnBlog<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.comment")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<BlogCommentView, ApiError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Comment must not be empty"));
        }

        let mut conn = app.db_write().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;

        let comment = InsertBlogComment::builder()
            .user_id(session_user.id)
            .blog_id(blog.id)
            .content(content)
            .build()
            .insert(&mut conn)
            .await?;
        Counter::BlogComments(blog.id).refresh(&mut conn).await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::BlogCommented)
            .description(activity::describe(
                &session_user.email,
                "commented on",
                "blog",
                &blog.title,
            ))
            .related_object((ObjectType::Blog, blog.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;

        Ok(BlogCommentView {
            comment,
            author_email: session_user.email.clone(),
        })
    }
}

#[derive(Debug)]
pub struct ListBlogCommentsResult {
    pub comments: Vec<BlogCommentView>,
    pub total: u64,
}

#[derive(Debug)]
pub struct ListBlogComments<'a> {
    pub slug: &'a str,
    pub page: Page,
}

impl ListBlogComments<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.list_comments")]
    pub async fn perform(self, app: &App) -> Result<ListBlogCommentsResult, ApiError> {
        let mut conn = app.db_read().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;
        let comments = BlogCommentView::list_for_blog(&mut conn, blog.id, self.page).await?;

        Ok(ListBlogCommentsResult {
            comments,
            total: u64::try_from(blog.comments_count).unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
pub struct DeleteBlogComment<'a> {
    pub slug: &'a str,
    pub comment_id: BlogCommentId,
}

impl DeleteBlogComment<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.delete_comment")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;
        let Some(comment) = BlogComment::find(&mut conn, self.comment_id)
            .await?
            .filter(|v| v.blog_id == blog.id)
        else {
            return Err(ApiError::new(ApiErrorCategory::NotFound)
                .message("Could not find comment specified"));
        };
        util::check_owner(
            session_user,
            comment.user_id,
            "You can only delete your own comments",
        )?;

        BlogComment::delete(&mut conn, comment.id).await?;
        Counter::BlogComments(blog.id).refresh(&mut conn).await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::CommentDeleted)
            .description(format!(
                "User {} deleted a comment on blog: {}",
                session_user.email, blog.title
            ))
            .related_object((ObjectType::Comment, comment.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(())
    }
}

/// Edits the content of a comment. Only its author may do so.
#[derive(Debug)]
pub struct UpdateBlogComment<'a> {
    pub slug: &'a str,
    pub comment_id: BlogCommentId,
    pub content: &'a str,
}

impl UpdateBlogComment<'_> {
    #[tracing::instrument(skip_all, name = "services.blogs.update_comment")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<BlogCommentView, ApiError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Comment must not be empty"));
        }

        let mut conn = app.db_write().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;
        let Some(comment) = BlogComment::find(&mut conn, self.comment_id)
            .await?
            .filter(|v| v.blog_id == blog.id)
        else {
            return Err(ApiError::new(ApiErrorCategory::NotFound)
                .message("Could not find comment specified"));
        };
        util::check_owner(
            session_user,
            comment.user_id,
            "You can only edit your own comments",
        )?;

        let Some(comment) = BlogComment::update_content(&mut conn, comment.id, content).await?
        else {
            return Err(ApiError::new(ApiErrorCategory::NotFound)
                .message("Could not find comment specified"));
        };

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::CommentUpdated)
            .description(format!(
                "User {} edited a comment on blog: {}",
                session_user.email, blog.title
            ))
            .related_object((ObjectType::Comment, comment.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;

        Ok(BlogCommentView {
            comment,
            author_email: session_user.email.clone(),
        })
    }
}

/// Likes, unlikes, saves or unsaves a blog.
#[derive(Debug)]
pub struct ReactToBlog<'a> {
    pub slug: &'a str,
    pub reaction: Reaction,
    pub active: bool,
}

impl ReactToBlog<'_> {
    /// Returns the refreshed amount of likes or saves.
    #[tracing::instrument(skip_all, name = "services.blogs.react")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<i64, ApiError> {
        let mut conn = app.db_write().await?;
        let blog = super::find_blog(&mut conn, self.slug).await?;

        let count = reactions::apply(
            &mut conn,
            session_user,
            self.reaction,
            ReactionTarget::Blog(blog.id),
            self.active,
            &blog.title,
        )
        .await?;

        conn.commit().await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_comment_on_blog() {
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
        test_utils::blogs::create()
            .app(&app)
            .author(&alice)
            .title("Pitha Season")
            .call()
            .await;

        let comment = CommentOnBlog {
            slug: "pitha-season",
            content: "  Lovely read  ",
        }
        .perform(&app, &bob.get_session_user(&app).await)
        .await
        .unwrap();
        assert_eq!(comment.comment.content, "Lovely read");

        let result = ListBlogComments {
            slug: "pitha-season",
            page: Page::default(),
        }
        .perform(&app)
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.comments[0].author_email, "bob@example.com");

        let error = DeleteBlogComment {
            slug: "pitha-season",
            comment_id: comment.comment.id,
        }
        .perform(&app, &alice.get_session_user(&app).await)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "forbidden" }),
        );

        DeleteBlogComment {
            slug: "pitha-season",
            comment_id: comment.comment.id,
        }
        .perform(&app, &bob.get_session_user(&app).await)
        .await
        .unwrap();

        let result = ListBlogComments {
            slug: "pitha-season",
            page: Page::default(),
        }
        .perform(&app)
        .await
        .unwrap();
        assert_eq!(result.total, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_only_let_author_edit_comment() {
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
        test_utils::blogs::create()
            .app(&app)
            .author(&alice)
            .title("Pitha Season")
            .call()
            .await;

        let bob_session = bob.get_session_user(&app).await;
        let comment = CommentOnBlog {
            slug: "pitha-season",
            content: "Lovely read",
        }
        .perform(&app, &bob_session)
        .await
        .unwrap();

        let error = UpdateBlogComment {
            slug: "pitha-season",
            comment_id: comment.comment.id,
            content: "Not mine",
        }
        .perform(&app, &alice.get_session_user(&app).await)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "forbidden" }),
        );

        let error = UpdateBlogComment {
            slug: "pitha-season",
            comment_id: comment.comment.id,
            content: "   ",
        }
        .perform(&app, &bob_session)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "invalid_request" }),
        );

        let updated = UpdateBlogComment {
            slug: "pitha-season",
            comment_id: comment.comment.id,
            content: " Lovely read, tried it twice ",
        }
        .perform(&app, &bob_session)
        .await
        .unwrap();
        assert_eq!(updated.comment.id, comment.comment.id);
        assert_eq!(updated.comment.content, "Lovely read, tried it twice");

        let result = ListBlogComments {
            slug: "pitha-season",
            page: Page::default(),
        }
        .perform(&app)
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.comments[0].comment.content, "Lovely read, tried it twice");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_save_blog_once() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        test_utils::blogs::create()
            .app(&app)
            .author(&alice)
            .title("Pitha Season")
            .call()
            .await;
        let session_user = alice.get_session_user(&app).await;

        let saves = ReactToBlog {
            slug: "pitha-season",
            reaction: Reaction::Save,
            active: true,
        }
        .perform(&app, &session_user)
        .await
        .unwrap();
        assert_eq!(saves, 1);

        let error = ReactToBlog {
            slug: "pitha-season",
            reaction: Reaction::Save,
            active: true,
        }
        .perform(&app, &session_user)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "You have already saved this blog",
            }),
        );

        let error = ReactToBlog {
            slug: "pitha-season",
            reaction: Reaction::Like,
            active: false,
        }
        .perform(&app, &session_user)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "You have not liked this blog",
            }),
        );
    }
}
