use foodie_model::category::{Category, InsertCategory};
use foodie_model::id::{CategoryId, RecipeId};
use foodie_model::recipe::{RecipeStatus, RecipeView};
use foodie_model::slug::slugify;

use super::users::UserSessionData;
use crate::services::recipes::CreateRecipe;
use crate::App;

/// Creates a recipe, published unless `status` says otherwise.
#[bon::builder]
#[tracing::instrument(skip(app, author), name = "test_utils.recipes.create")]
pub async fn create(
    app: &App,
    author: &UserSessionData,
    title: &str,
    status: Option<RecipeStatus>,
    category: Option<&str>,
) -> RecipeView {
    CreateRecipe {
        title,
        description: "A tasty dish.",
        prep_time: 10,
        cook_time: 20,
        servings: 2,
        instructions: "Cook it.",
        category,
        status: status.unwrap_or(RecipeStatus::Published),
        ..Default::default()
    }
    .perform(app, &author.get_session_user(app).await)
    .await
    .unwrap()
    .view
}

#[bon::builder]
#[tracing::instrument(skip(app), name = "test_utils.recipes.category")]
pub async fn category(app: &App, name: &str) -> Category {
    let slug = slugify(name, "category");
    let mut conn = app.db_write().await.unwrap();
    let category = InsertCategory::builder()
        .name(name)
        .slug(&slug)
        .build()
        .insert(&mut conn)
        .await
        .unwrap();

    conn.commit().await.unwrap();
    category
}

pub async fn find(app: &App, id: RecipeId) -> RecipeView {
    let mut conn = app.db_read().await.unwrap();
    RecipeView::find(&mut conn, id).await.unwrap().unwrap()
}

pub async fn find_category(app: &App, id: CategoryId) -> Category {
    let mut conn = app.db_read().await.unwrap();
    Category::find(&mut conn, id).await.unwrap().unwrap()
}
