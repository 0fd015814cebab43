use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodie_error::ApiError;
use foodie_model::filter::RecipeFilter;
use foodie_model::id::{RecipeCommentId, RecipeId};
use foodie_model::page::PageParams;
use foodie_model::reaction::Reaction;

use crate::extract::{Json, Path, Query, SessionUser};
use crate::schema::recipes::{
    CommentResponse, CreateComment, CreateRecipe, IngredientForm, LikeResponse, OrderingParams,
    RateRecipe, RatingResponse, RecipeDetail, RecipeSummary, SaveResponse, StepForm, Suggestion,
    SuggestionParams, UpdateRecipe,
};
use crate::schema::{join_list, Paginated};
use crate::services::recipes::RecipeShortcut;
use crate::services::util;
use crate::{services, App};

pub async fn list(
    app: App,
    user: Option<SessionUser>,
    Query(filter): Query<RecipeFilter>,
    Query(params): Query<OrderingParams>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::recipes::ListRecipes {
        filter,
        ordering: params.ordering,
        page,
    };

    let response = request.perform(&app, user.as_ref()).await?;
    let response = Paginated::<RecipeSummary>::new(response.recipes, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn saved(
    app: App,
    user: SessionUser,
    Query(filter): Query<RecipeFilter>,
    Query(params): Query<OrderingParams>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::recipes::ListSavedRecipes {
        filter,
        ordering: params.ordering,
        page,
    };

    let response = request.perform(&app, &user).await?;
    let response = Paginated::<RecipeSummary>::new(response.recipes, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn featured(app: App) -> Result<Response, ApiError> {
    shortcut(app, RecipeShortcut::Featured).await
}

pub async fn popular(app: App) -> Result<Response, ApiError> {
    shortcut(app, RecipeShortcut::Popular).await
}

pub async fn recent(app: App) -> Result<Response, ApiError> {
    shortcut(app, RecipeShortcut::Recent).await
}

async fn shortcut(app: App, shortcut: RecipeShortcut) -> Result<Response, ApiError> {
    let recipes = shortcut.perform(&app).await?;
    let response = recipes
        .into_iter()
        .map(RecipeSummary::from)
        .collect::<Vec<_>>();

    Ok(Json(response).into_response())
}

pub async fn suggestions(
    app: App,
    Query(params): Query<SuggestionParams>,
) -> Result<Response, ApiError> {
    let request = services::recipes::RecipeSuggestions { term: &params.q };

    let suggestions = request.perform(&app).await?;
    let response = suggestions
        .into_iter()
        .map(Suggestion::from)
        .collect::<Vec<_>>();

    Ok(Json(response).into_response())
}

pub async fn create(
    app: App,
    user: SessionUser,
    Json(form): Json<CreateRecipe>,
) -> Result<Response, ApiError> {
    let tags = join_list(&form.tags);
    let request = services::recipes::CreateRecipe {
        title: &form.title,
        description: &form.description,
        short_description: &form.short_description,
        prep_time: form.prep_time,
        cook_time: form.cook_time,
        total_time: form.total_time,
        servings: form.servings,
        difficulty: form.difficulty,
        instructions: &form.instructions,
        tips: &form.tips,
        tags: &tags,
        category: form.category.as_deref(),
        calories: form.calories,
        protein: form.protein,
        carbohydrates: form.carbohydrates,
        fat: form.fat,
        status: form.status,
        is_featured: form.is_featured,
        ingredients: form.ingredients.iter().map(IngredientForm::as_new).collect(),
        steps: form.steps.iter().map(StepForm::as_new).collect(),
    };

    let details = request.perform(&app, &user).await?;
    let detail =
        RecipeDetail::from(details.view).with_contents(details.ingredients, details.steps);
    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

pub async fn detail(
    app: App,
    user: Option<SessionUser>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let request = services::recipes::GetRecipe { slug: &slug };

    let response = request.perform(&app, user.as_ref()).await?;
    let mut detail =
        RecipeDetail::from(response.view).with_contents(response.ingredients, response.steps);
    detail.is_liked = response.is_liked;
    detail.is_saved = response.is_saved;

    Ok(Json(detail).into_response())
}

pub async fn update(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
    Json(form): Json<UpdateRecipe>,
) -> Result<Response, ApiError> {
    let tags = form.tags.as_deref().map(join_list);
    let request = services::recipes::UpdateRecipe {
        slug: &slug,
        title: form.title.as_deref(),
        description: form.description.as_deref(),
        short_description: form.short_description.as_deref(),
        prep_time: form.prep_time,
        cook_time: form.cook_time,
        total_time: form.total_time,
        servings: form.servings,
        difficulty: form.difficulty,
        instructions: form.instructions.as_deref(),
        tips: form.tips.as_deref(),
        tags: tags.as_deref(),
        category: form.category.as_ref().map(Option::as_deref),
        calories: form.calories,
        protein: form.protein,
        carbohydrates: form.carbohydrates,
        fat: form.fat,
        status: form.status,
        is_featured: form.is_featured,
        ingredients: form
            .ingredients
            .as_ref()
            .map(|v| v.iter().map(IngredientForm::as_new).collect()),
        steps: form
            .steps
            .as_ref()
            .map(|v| v.iter().map(StepForm::as_new).collect()),
    };

    let details = request.perform(&app, &user).await?;
    let detail =
        RecipeDetail::from(details.view).with_contents(details.ingredients, details.steps);
    Ok(Json(detail).into_response())
}

pub async fn remove(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    services::recipes::DeleteRecipe { slug: &slug }
        .perform(&app, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn ratings(
    app: App,
    user: Option<SessionUser>,
    Path(recipe_id): Path<RecipeId>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::recipes::ListRatings { recipe_id, page };

    let response = request.perform(&app, user.as_ref()).await?;
    let response = Paginated::<RatingResponse>::new(response.ratings, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn rate(
    app: App,
    user: SessionUser,
    Path(recipe_id): Path<RecipeId>,
    Json(form): Json<RateRecipe>,
) -> Result<Response, ApiError> {
    let request = services::recipes::RateRecipe {
        recipe_id,
        rating: form.rating,
        review: &form.review,
    };

    let rating = request.perform(&app, &user).await?;
    Ok(Json(RatingResponse::from(rating)).into_response())
}

pub async fn comments(
    app: App,
    user: Option<SessionUser>,
    Path(recipe_id): Path<RecipeId>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::recipes::ListRecipeComments { recipe_id, page };

    let response = request.perform(&app, user.as_ref()).await?;
    let response = Paginated::<CommentResponse>::new(response.comments, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn comment(
    app: App,
    user: SessionUser,
    Path(recipe_id): Path<RecipeId>,
    Json(form): Json<CreateComment>,
) -> Result<Response, ApiError> {
    let request = services::recipes::CommentOnRecipe {
        recipe_id,
        parent_id: form.parent_id,
        content: &form.content,
    };

    let comment = request.perform(&app, &user).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))).into_response())
}

pub async fn delete_comment(
    app: App,
    user: SessionUser,
    Path((recipe_id, comment_id)): Path<(RecipeId, RecipeCommentId)>,
) -> Result<Response, ApiError> {
    let request = services::recipes::DeleteRecipeComment {
        recipe_id,
        comment_id,
    };

    request.perform(&app, &user).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn like(
    app: App,
    user: SessionUser,
    Path(recipe_id): Path<RecipeId>,
) -> Result<Response, ApiError> {
    let likes_count = react(&app, &user, recipe_id, Reaction::Like, true).await?;
    Ok(Json(LikeResponse {
        liked: true,
        likes_count,
    })
    .into_response())
}

pub async fn unlike(
    app: App,
    user: SessionUser,
    Path(recipe_id): Path<RecipeId>,
) -> Result<Response, ApiError> {
    let likes_count = react(&app, &user, recipe_id, Reaction::Like, false).await?;
    Ok(Json(LikeResponse {
        liked: false,
        likes_count,
    })
    .into_response())
}

pub async fn save(
    app: App,
    user: SessionUser,
    Path(recipe_id): Path<RecipeId>,
) -> Result<Response, ApiError> {
    let saves_count = react(&app, &user, recipe_id, Reaction::Save, true).await?;
    Ok(Json(SaveResponse {
        saved: true,
        saves_count,
    })
    .into_response())
}

pub async fn unsave(
    app: App,
    user: SessionUser,
    Path(recipe_id): Path<RecipeId>,
) -> Result<Response, ApiError> {
    let saves_count = react(&app, &user, recipe_id, Reaction::Save, false).await?;
    Ok(Json(SaveResponse {
        saved: false,
        saves_count,
    })
    .into_response())
}

async fn react(
    app: &App,
    user: &SessionUser,
    recipe_id: RecipeId,
    reaction: Reaction,
    active: bool,
) -> Result<i64, ApiError> {
    services::recipes::ReactToRecipe {
        recipe_id,
        reaction,
        active,
    }
    .perform(app, user)
    .await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils;
    use crate::App;

    mod create {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_create_recipe() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            let alice = test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("alice@example.com")
                .call()
                .await;
            test_utils::recipes::category()
                .app(&app)
                .name("Main Course")
                .call()
                .await;

            let response = server
                .post("/api/v1/recipes")
                .json(&json!({
                    "title": "Chicken Biryani",
                    "description": "Fragrant rice layered with spiced chicken.",
                    "prep_time": 30,
                    "cook_time": 60,
                    "servings": 4,
                    "difficulty": "medium",
                    "instructions": "Marinate, par-boil, layer and steam.",
                    "tags": ["rice", " chicken "],
                    "category": "main-course",
                    "calories": 650.0,
                    "status": "published",
                }))
                .await;

            response.assert_status(StatusCode::CREATED);
            response.assert_json_contains(&json!({
                "slug": "chicken-biryani",
                "total_time": 90,
                "tags": ["rice", "chicken"],
                "category": { "slug": "main-course" },
                "author": { "id": alice.user.id, "email": "alice@example.com" },
                "nutrition": { "calories": 650.0 },
            }));

            let alice = test_utils::users::find(&app, alice.user.id).await;
            assert_eq!(alice.recipes_count, 1);
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_reject_anonymous_user() {
            let app = App::new_for_tests().await;
            let server = test_utils::build_test_server(&app);

            let response = server
                .post("/api/v1/recipes")
                .json(&json!({
                    "title": "Chicken Biryani",
                    "description": "Fragrant rice layered with spiced chicken.",
                    "prep_time": 30,
                    "cook_time": 60,
                    "servings": 4,
                    "instructions": "Marinate, par-boil, layer and steam.",
                }))
                .await;

            response.assert_status_unauthorized();
            response.assert_json_contains(&json!({ "code": "access_denied" }));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_keep_ingredients_and_steps() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("alice@example.com")
                .call()
                .await;

            let response = server
                .post("/api/v1/recipes")
                .json(&json!({
                    "title": "Aloo Bhorta",
                    "description": "Mashed potatoes with mustard oil.",
                    "prep_time": 5,
                    "cook_time": 20,
                    "servings": 2,
                    "instructions": "Boil, mash and mix.",
                    "ingredients": [
                        { "name": "Potato", "quantity": "3", "unit": "piece" },
                        { "name": "Salt", "unit": "to_taste" },
                    ],
                    "steps": [
                        { "step_number": 1, "title": "Boil", "timer": 900 },
                        { "step_number": 2, "title": "Mash" },
                    ],
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
            response.assert_json_contains(&json!({
                "ingredients": [
                    { "name": "Potato", "quantity": "3", "unit": "piece" },
                    { "name": "Salt", "quantity": "", "unit": "to_taste" },
                ],
                "steps": [
                    { "step_number": 1, "title": "Boil", "timer": 900 },
                    { "step_number": 2, "title": "Mash", "timer": null },
                ],
            }));

            let response = server
                .patch("/api/v1/recipes/aloo-bhorta")
                .json(&json!({
                    "steps": [{ "step_number": 1, "title": "Mash boiled potatoes" }],
                }))
                .await;
            response.assert_status_ok();

            let response = server.get("/api/v1/recipes/aloo-bhorta").await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "ingredients": [{ "name": "Potato" }, { "name": "Salt" }],
                "steps": [{ "step_number": 1, "title": "Mash boiled potatoes" }],
            }));

            let body = response.json::<serde_json::Value>();
            assert_eq!(body["steps"].as_array().map(Vec::len), Some(1));
        }
    }

    mod list {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_list_published_recipes_with_filters() {
            let app = App::new_for_tests().await;
            let server = test_utils::build_test_server(&app);
            let alice = test_utils::users::start_session()
                .app(&app)
                .email("alice@example.com")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Shorshe Ilish")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Beef Kala Bhuna")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Secret Draft")
                .status(foodie_model::recipe::RecipeStatus::Draft)
                .call()
                .await;

            let response = server.get("/api/v1/recipes").await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "page": 1,
                "limit": 20,
                "total": 2,
            }));

            let response = server
                .get("/api/v1/recipes")
                .add_query_param("search", "ilish")
                .await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "items": [{ "slug": "shorshe-ilish" }],
                "total": 1,
            }));

            let response = server
                .get("/api/v1/recipes")
                .add_query_param("ordering", "title")
                .await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "items": [{ "slug": "beef-kala-bhuna" }, { "slug": "shorshe-ilish" }],
            }));

            let response = server
                .get("/api/v1/recipes")
                .add_query_param("page", 0)
                .await;
            response.assert_status_bad_request();

            let response = server
                .get("/api/v1/recipes")
                .add_query_param("page", u64::MAX)
                .await;
            response.assert_status_bad_request();
            response.assert_json_contains(&json!({ "code": "invalid_request" }));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_serve_shortcuts_and_suggestions() {
            let app = App::new_for_tests().await;
            let server = test_utils::build_test_server(&app);
            let alice = test_utils::users::start_session()
                .app(&app)
                .email("alice@example.com")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Mango Lassi")
                .call()
                .await;

            for path in ["/api/v1/recipes/recent", "/api/v1/recipes/popular"] {
                let response = server.get(path).await;
                response.assert_status_ok();
                response.assert_json_contains(&json!([{ "slug": "mango-lassi" }]));
            }

            let response = server.get("/api/v1/recipes/featured").await;
            response.assert_status_ok();
            response.assert_json(&json!([]));

            let response = server
                .get("/api/v1/recipes/suggestions")
                .add_query_param("q", "mango")
                .await;
            response.assert_status_ok();
            response.assert_json_contains(&json!([{ "slug": "mango-lassi" }]));
        }
    }

    mod detail {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_show_reactions_of_logged_in_user() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            let alice = test_utils::users::start_session()
                .app(&app)
                .email("alice@example.com")
                .call()
                .await;
            let recipe = test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Mango Lassi")
                .call()
                .await;

            let response = server.get("/api/v1/recipes/mango-lassi").await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({ "views_count": 1 }));
            let body = response.json::<serde_json::Value>();
            assert!(body.get("is_liked").is_none());

            test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("bob@example.com")
                .call()
                .await;

            let response = server
                .post(&format!("/api/v1/recipes/{}/like", recipe.recipe.id))
                .await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({ "liked": true, "likes_count": 1 }));

            let response = server.get("/api/v1/recipes/mango-lassi").await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "views_count": 2,
                "likes_count": 1,
                "is_liked": true,
                "is_saved": false,
            }));
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_hide_drafts_from_others() {
            let app = App::new_for_tests().await;
            let server = test_utils::build_test_server(&app);
            let alice = test_utils::users::start_session()
                .app(&app)
                .email("alice@example.com")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Secret Draft")
                .status(foodie_model::recipe::RecipeStatus::Draft)
                .call()
                .await;

            let response = server.get("/api/v1/recipes/secret-draft").await;
            response.assert_status_not_found();
            response.assert_json_contains(&json!({ "code": "not_found" }));
        }
    }

    mod manage {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_update_and_delete_own_recipe() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            let alice = test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("alice@example.com")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Mango Lassi")
                .call()
                .await;

            let response = server
                .patch("/api/v1/recipes/mango-lassi")
                .json(&json!({ "prep_time": 5, "tags": ["drink"] }))
                .await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "prep_time": 5,
                "total_time": 25,
                "tags": ["drink"],
            }));

            let response = server.delete("/api/v1/recipes/mango-lassi").await;
            response.assert_status(StatusCode::NO_CONTENT);

            let response = server.get("/api/v1/recipes/mango-lassi").await;
            response.assert_status_not_found();
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_forbid_editing_others_recipe() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            let alice = test_utils::users::start_session()
                .app(&app)
                .email("alice@example.com")
                .call()
                .await;
            test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Mango Lassi")
                .call()
                .await;
            test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("bob@example.com")
                .call()
                .await;

            let response = server
                .patch("/api/v1/recipes/mango-lassi")
                .json(&json!({ "title": "Bob's Lassi" }))
                .await;
            response.assert_status_forbidden();
            response.assert_json_contains(&json!({ "code": "forbidden" }));

            let response = server.delete("/api/v1/recipes/mango-lassi").await;
            response.assert_status_forbidden();
        }
    }

    mod interactions {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_rate_and_comment() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            let alice = test_utils::users::start_session()
                .app(&app)
                .email("alice@example.com")
                .call()
                .await;
            let recipe = test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Mango Lassi")
                .call()
                .await;
            test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("bob@example.com")
                .call()
                .await;
            let base = format!("/api/v1/recipes/{}", recipe.recipe.id);

            let response = server
                .post(&format!("{base}/ratings"))
                .json(&json!({ "rating": 4, "review": "Refreshing" }))
                .await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "rating": 4,
                "author": { "email": "bob@example.com" },
            }));

            let response = server
                .post(&format!("{base}/ratings"))
                .json(&json!({ "rating": 6 }))
                .await;
            response.assert_status_bad_request();

            let response = server.get(&format!("{base}/ratings")).await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({ "total": 1 }));

            let response = server
                .post(&format!("{base}/comments"))
                .json(&json!({ "content": "Made it twice already" }))
                .await;
            response.assert_status(StatusCode::CREATED);
            let comment_id = response.json::<serde_json::Value>()["id"].clone();

            let response = server.get(&format!("{base}/comments")).await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "items": [{ "content": "Made it twice already" }],
                "total": 1,
            }));

            let response = server
                .delete(&format!("{base}/comments/{comment_id}"))
                .await;
            response.assert_status(StatusCode::NO_CONTENT);
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
        async fn should_list_saved_recipes() {
            let app = App::new_for_tests().await;
            let mut server = test_utils::build_test_server(&app);
            let alice = test_utils::users::override_credentials()
                .app(&app)
                .server(&mut server)
                .email("alice@example.com")
                .call()
                .await;
            let recipe = test_utils::recipes::create()
                .app(&app)
                .author(&alice)
                .title("Mango Lassi")
                .call()
                .await;

            let path = format!("/api/v1/recipes/{}/save", recipe.recipe.id);
            let response = server.post(&path).await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({ "saved": true, "saves_count": 1 }));

            let response = server.get("/api/v1/recipes/saved").await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({
                "items": [{ "slug": "mango-lassi" }],
                "total": 1,
            }));

            let response = server.delete(&path).await;
            response.assert_status_ok();
            response.assert_json_contains(&json!({ "saved": false, "saves_count": 0 }));

            let response = server.delete(&path).await;
            response.assert_status_bad_request();
        }
    }
}
