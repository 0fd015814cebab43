use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::comment::{InsertRecipeComment, RecipeComment, RecipeCommentView};
use foodie_model::counter::Counter;
use foodie_model::id::{RecipeCommentId, RecipeId};
use foodie_model::page::Page;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

fn comment_not_found() -> ApiError {
    ApiError::new(ApiErrorCategory::NotFound).message("Could not find comment specified")
}

#[derive(Debug)]
pub struct CommentOnRecipe<'a> {
    pub recipe_id: RecipeId,
    pub parent_id: Option<RecipeCommentId>,
    pub content: &'a str,
}

impl CommentOnRecipe<'_> {
    #[tracing::instrument(skip_all, name = "services.recipes.comment")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<RecipeCommentView, ApiError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                .message("Comment must not be empty"));
        }

        let mut conn = app.db_write().await?;
        let recipe =
            util::find_visible_recipe(&mut conn, self.recipe_id, Some(&session_user.user)).await?;

        if let Some(parent_id) = self.parent_id {
            let parent = RecipeComment::find(&mut conn, parent_id).await?;
            if !parent.is_some_and(|v| v.recipe_id == recipe.id) {
                return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
                    .message("Replied comment does not belong to this recipe"));
            }
        }

        let comment = InsertRecipeComment::builder()
            .user_id(session_user.id)
            .recipe_id(recipe.id)
            .maybe_parent_id(self.parent_id)
            .content(content)
            .build()
            .insert(&mut conn)
            .await?;

        Counter::RecipeComments(recipe.id)
            .refresh(&mut conn)
            .await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::RecipeCommented)
            .description(activity::describe(
                &session_user.email,
                "commented on",
                "recipe",
                &recipe.title,
            ))
            .related_object((ObjectType::Recipe, recipe.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;

        Ok(RecipeCommentView {
            comment,
            author_email: session_user.email.clone(),
        })
    }
}

#[derive(Debug)]
pub struct ListRecipeCommentsResult {
    pub comments: Vec<RecipeCommentView>,
    pub total: u64,
}

#[derive(Debug)]
pub struct ListRecipeComments {
    pub recipe_id: RecipeId,
    pub page: Page,
}

impl ListRecipeComments {
    #[tracing::instrument(skip_all, name = "services.recipes.list_comments")]
    pub async fn perform(
        self,
        app: &App,
        session_user: Option<&SessionUser>,
    ) -> Result<ListRecipeCommentsResult, ApiError> {
        let viewer = session_user.map(|v| &v.user);

        let mut conn = app.db_read().await?;
        let recipe = util::find_visible_recipe(&mut conn, self.recipe_id, viewer).await?;
        let comments =
            RecipeCommentView::list_for_recipe(&mut conn, recipe.id, self.page).await?;

        Ok(ListRecipeCommentsResult {
            comments,
            total: u64::try_from(recipe.comments_count).unwrap_or_default(),
        })
    }
}

#[derive(Debug)]
pub struct DeleteRecipeComment {
    pub recipe_id: RecipeId,
    pub comment_id: RecipeCommentId,
}

impl DeleteRecipeComment {
    /// Replies to the comment are deleted along with it.
    #[tracing::instrument(skip_all, name = "services.recipes.delete_comment")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let Some(comment) = RecipeComment::find(&mut conn, self.comment_id)
            .await?
            .filter(|v| v.recipe_id == self.recipe_id)
        else {
            return Err(comment_not_found());
        };
        util::check_owner(
            session_user,
            comment.user_id,
            "You can only delete your own comments",
        )?;

        if !RecipeComment::delete(&mut conn, comment.id).await? {
            return Err(comment_not_found());
        }
        Counter::RecipeComments(comment.recipe_id)
            .refresh(&mut conn)
            .await?;

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::CommentDeleted)
            .description(format!(
                "User {} deleted a comment on a recipe",
                session_user.email
            ))
            .related_object((ObjectType::Comment, comment.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(())
    }
}
