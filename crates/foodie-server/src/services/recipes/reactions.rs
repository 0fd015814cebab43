use foodie_error::ApiError;
use foodie_model::id::RecipeId;
use foodie_model::reaction::{Reaction, ReactionTarget};

use crate::extract::SessionUser;
use crate::services::{reactions, util};
use crate::App;

/// Likes, unlikes, saves or unsaves a recipe.
#[derive(Debug)]
pub struct ReactToRecipe {
    pub recipe_id: RecipeId,
    pub reaction: Reaction,
    /// `false` takes the reaction back.
    pub active: bool,
}

impl ReactToRecipe {
    /// Returns the refreshed amount of likes or saves.
    #[tracing::instrument(skip_all, name = "services.recipes.react")]
    pub async fn perform(self, app: &App, session_user: &SessionUser) -> Result<i64, ApiError> {
        let mut conn = app.db_write().await?;
        let recipe =
            util::find_visible_recipe(&mut conn, self.recipe_id, Some(&session_user.user)).await?;

        let count = reactions::apply(
            &mut conn,
            session_user,
            self.reaction,
            ReactionTarget::Recipe(recipe.id),
            self.active,
            &recipe.title,
        )
        .await?;

        conn.commit().await?;
        Ok(count)
    }
}
