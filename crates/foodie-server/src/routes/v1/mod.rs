use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::extract::Json;
use crate::schema::Health;
use crate::App;

mod blogs;
mod categories;
mod recipes;
mod users;

/// Builds the base router for AmaderFoodie API v1.
pub fn build_axum_router(app: App) -> Router {
    Router::new()
        .route("/health", get(health))
        // users
        .route("/users/register", post(self::users::register))
        .route("/users/login", post(self::users::login))
        .route("/users/verify-email", post(self::users::verify_email))
        .route(
            "/users/@me",
            get(self::users::local_profile).patch(self::users::update_profile),
        )
        .route("/users/@me/password", post(self::users::change_password))
        .route("/users/:user", get(self::users::profile))
        .route("/users/:user/followers", get(self::users::followers))
        .route("/users/:user/following", get(self::users::following))
        .route(
            "/users/:user/follow",
            post(self::users::follow).delete(self::users::unfollow),
        )
        .route("/users/:user/activities", get(self::users::activities))
        // categories
        .route(
            "/categories",
            get(self::categories::list).post(self::categories::create),
        )
        .route(
            "/categories/:category",
            get(self::categories::detail)
                .patch(self::categories::update)
                .delete(self::categories::remove),
        )
        .route(
            "/blog-categories",
            get(self::categories::list_blog_categories)
                .post(self::categories::create_blog_category),
        )
        .route(
            "/blog-categories/:category",
            get(self::categories::blog_category)
                .patch(self::categories::update_blog_category)
                .delete(self::categories::remove_blog_category),
        )
        // recipes
        .route(
            "/recipes",
            get(self::recipes::list).post(self::recipes::create),
        )
        .route("/recipes/saved", get(self::recipes::saved))
        .route("/recipes/featured", get(self::recipes::featured))
        .route("/recipes/popular", get(self::recipes::popular))
        .route("/recipes/recent", get(self::recipes::recent))
        .route("/recipes/suggestions", get(self::recipes::suggestions))
        .route(
            "/recipes/:recipe",
            get(self::recipes::detail)
                .patch(self::recipes::update)
                .delete(self::recipes::remove),
        )
        .route(
            "/recipes/:recipe/ratings",
            get(self::recipes::ratings).post(self::recipes::rate),
        )
        .route(
            "/recipes/:recipe/comments",
            get(self::recipes::comments).post(self::recipes::comment),
        )
        .route(
            "/recipes/:recipe/comments/:comment",
            delete(self::recipes::delete_comment),
        )
        .route(
            "/recipes/:recipe/like",
            post(self::recipes::like).delete(self::recipes::unlike),
        )
        .route(
            "/recipes/:recipe/save",
            post(self::recipes::save).delete(self::recipes::unsave),
        )
        // blogs
        .route("/blogs", get(self::blogs::list).post(self::blogs::create))
        .route(
            "/blogs/:blog",
            get(self::blogs::detail)
                .patch(self::blogs::update)
                .delete(self::blogs::remove),
        )
        .route(
            "/blogs/:blog/comments",
            get(self::blogs::comments).post(self::blogs::comment),
        )
        .route(
            "/blogs/:blog/comments/:comment",
            patch(self::blogs::update_comment).delete(self::blogs::delete_comment),
        )
        .route(
            "/blogs/:blog/like",
            post(self::blogs::like).delete(self::blogs::unlike),
        )
        .route(
            "/blogs/:blog/save",
            post(self::blogs::save).delete(self::blogs::unsave),
        )
        .with_state(app)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
