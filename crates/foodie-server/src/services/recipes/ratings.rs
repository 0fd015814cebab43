use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::id::RecipeId;
use foodie_model::page::Page;
use foodie_model::rating::{InsertRating, Rating, RatingView};
use foodie_model::recipe::RecipeView;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug)]
pub struct RateRecipe<'a> {
    pub recipe_id: RecipeId,
    pub rating: i64,
    pub review: &'a str,
}

impl RateRecipe<'_> {
    /// Rating a recipe again replaces the previous rating.
    #[tracing::instrument(skip_all, name = "services.recipes.rate")]
    pub async fn perform(
        self,
        app: &App,
        session_user: &SessionUser,
    ) -> Result<RatingView, ApiError> {
        if !Rating::is_valid_value(self.rating) {
            return Err(ApiError::new(ApiErrorCategory::InvalidRequest).message(format!(
                "Rating must be between {} and {}",
                Rating::MIN,
                Rating::MAX
            )));
        }

        let mut conn = app.db_write().await?;
        let recipe =
            util::find_visible_recipe(&mut conn, self.recipe_id, Some(&session_user.user)).await?;

        let (rating, created) = InsertRating::builder()
            .user_id(session_user.id)
            .recipe_id(recipe.id)
            .rating(self.rating)
            .review(self.review.trim())
            .build()
            .upsert(&mut conn)
            .await?;

        tracing::debug!(?created, rating = rating.rating, "rated recipe");

        InsertUserActivity::builder()
            .user_id(session_user.id)
            .activity_type(ActivityType::RecipeRated)
            .description(activity::describe(
                &session_user.email,
                "rated",
                "recipe",
                &recipe.title,
            ))
            .related_object((ObjectType::Recipe, recipe.id.0))
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;

        Ok(RatingView {
            rating,
            author_email: session_user.email.clone(),
        })
    }
}

#[derive(Debug)]
pub struct ListRatingsResult {
    pub ratings: Vec<RatingView>,
    pub total: u64,
}

#[derive(Debug)]
pub struct ListRatings {
    pub recipe_id: RecipeId,
    pub page: Page,
}

impl ListRatings {
    #[tracing::instrument(skip_all, name = "services.recipes.list_ratings")]
    pub async fn perform(
        self,
        app: &App,
        session_user: Option<&SessionUser>,
    ) -> Result<ListRatingsResult, ApiError> {
        let viewer = session_user.map(|v| &v.user);

        let mut conn = app.db_read().await?;
        util::find_visible_recipe(&mut conn, self.recipe_id, viewer).await?;

        let ratings = RatingView::list_for_recipe(&mut conn, self.recipe_id, self.page).await?;
        let total = RecipeView::find(&mut conn, self.recipe_id)
            .await?
            .map(|v| u64::try_from(v.ratings_count).unwrap_or_default())
            .unwrap_or_default();

        Ok(ListRatingsResult { ratings, total })
    }
}
