use foodie_error::ApiError;
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::ingredient::Ingredient;
use foodie_model::reaction::{Reaction, ReactionTarget};
use foodie_model::recipe::{Recipe, RecipeView};
use foodie_model::step::RecipeStep;

use crate::extract::SessionUser;
use crate::services::util;
use crate::App;

#[derive(Debug)]
pub struct GetRecipe<'a> {
    pub slug: &'a str,
}

#[derive(Debug)]
pub struct GetRecipeResult {
    pub view: RecipeView,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<RecipeStep>,
    /// Only known if the recipe was requested by a logged in user.
    pub is_liked: Option<bool>,
    pub is_saved: Option<bool>,
}

impl GetRecipe<'_> {
    /// Every call counts as a view. A logged in user viewing someone
    /// else's recipe is also recorded in their activities.
    #[tracing::instrument(skip_all, name = "services.recipes.get")]
    pub async fn perform(
        self,
        app: &App,
        session_user: Option<&SessionUser>,
    ) -> Result<GetRecipeResult, ApiError> {
        let viewer = session_user.map(|v| &v.user);

        let mut conn = app.db_write().await?;
        let Some(recipe) = Recipe::find_by_slug(&mut conn, self.slug).await? else {
            return Err(util::recipe_not_found());
        };
        if !util::is_recipe_visible(&recipe, viewer) {
            return Err(util::recipe_not_found());
        }

        Recipe::increment_views(&mut conn, recipe.id).await?;

        let target = ReactionTarget::Recipe(recipe.id);
        let (is_liked, is_saved) = match viewer {
            Some(viewer) => {
                if viewer.id != recipe.author_id {
                    InsertUserActivity::builder()
                        .user_id(viewer.id)
                        .activity_type(ActivityType::RecipeViewed)
                        .description(activity::describe(
                            &viewer.email,
                            "viewed",
                            "recipe",
                            &recipe.title,
                        ))
                        .related_object((ObjectType::Recipe, recipe.id.0))
                        .build()
                        .insert(&mut conn)
                        .await?;
                }

                let liked = Reaction::Like.exists(&mut conn, viewer.id, target).await?;
                let saved = Reaction::Save.exists(&mut conn, viewer.id, target).await?;
                (Some(liked), Some(saved))
            }
            None => (None, None),
        };

        let Some(view) = RecipeView::find(&mut conn, recipe.id).await? else {
            return Err(util::recipe_not_found());
        };
        let details = super::RecipeDetails::load(&mut conn, view).await?;
        conn.commit().await?;

        Ok(GetRecipeResult {
            view: details.view,
            ingredients: details.ingredients,
            steps: details.steps,
            is_liked,
            is_saved,
        })
    }
}
