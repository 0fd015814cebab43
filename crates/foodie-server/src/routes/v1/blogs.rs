use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodie_error::ApiError;
use foodie_model::blog::BlogFilter;
use foodie_model::id::BlogCommentId;
use foodie_model::page::PageParams;
use foodie_model::reaction::Reaction;

use crate::extract::{Json, Path, Query, SessionUser};
use crate::schema::blogs::{
    BlogCommentResponse, BlogDetail, BlogSummary, CreateBlog, CreateBlogComment, UpdateBlog,
    UpdateBlogComment,
};
use crate::schema::recipes::{LikeResponse, SaveResponse};
use crate::schema::Paginated;
use crate::services::util;
use crate::{services, App};

pub async fn list(
    app: App,
    Query(filter): Query<BlogFilter>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::blogs::ListBlogs { filter, page };

    let response = request.perform(&app).await?;
    let response = Paginated::<BlogSummary>::new(response.blogs, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn create(
    app: App,
    user: SessionUser,
    Json(form): Json<CreateBlog>,
) -> Result<Response, ApiError> {
    let request = services::blogs::CreateBlog {
        title: &form.title,
        description: &form.description,
        content: &form.content,
        category: form.category.as_deref(),
    };

    let view = request.perform(&app, &user).await?;
    Ok((StatusCode::CREATED, Json(BlogDetail::from(view))).into_response())
}

pub async fn detail(
    app: App,
    user: Option<SessionUser>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let request = services::blogs::GetBlog { slug: &slug };

    let response = request.perform(&app, user.as_ref()).await?;
    let mut detail = BlogDetail::from(response.view);
    detail.is_liked = response.is_liked;
    detail.is_saved = response.is_saved;

    Ok(Json(detail).into_response())
}

pub async fn update(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
    Json(form): Json<UpdateBlog>,
) -> Result<Response, ApiError> {
    let request = services::blogs::UpdateBlog {
        slug: &slug,
        title: form.title.as_deref(),
        description: form.description.as_deref(),
        content: form.content.as_deref(),
        category: form.category.as_ref().map(Option::as_deref),
    };

    let view = request.perform(&app, &user).await?;
    Ok(Json(BlogDetail::from(view)).into_response())
}

pub async fn remove(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    services::blogs::DeleteBlog { slug: &slug }
        .perform(&app, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn comments(
    app: App,
    Path(slug): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::blogs::ListBlogComments { slug: &slug, page };

    let response = request.perform(&app).await?;
    let response = Paginated::<BlogCommentResponse>::new(response.comments, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn comment(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
    Json(form): Json<CreateBlogComment>,
) -> Result<Response, ApiError> {
    let request = services::blogs::CommentOnBlog {
        slug: &slug,
        content: &form.content,
    };

    let comment = request.perform(&app, &user).await?;
    Ok((StatusCode::CREATED, Json(BlogCommentResponse::from(comment))).into_response())
}

pub async fn update_comment(
    app: App,
    user: SessionUser,
    Path((slug, comment_id)): Path<(String, BlogCommentId)>,
    Json(form): Json<UpdateBlogComment>,
) -> Result<Response, ApiError> {
    let request = services::blogs::UpdateBlogComment {
        slug: &slug,
        comment_id,
        content: &form.content,
    };

    let comment = request.perform(&app, &user).await?;
    Ok(Json(BlogCommentResponse::from(comment)).into_response())
}

pub async fn delete_comment(
    app: App,
    user: SessionUser,
    Path((slug, comment_id)): Path<(String, BlogCommentId)>,
) -> Result<Response, ApiError> {
    let request = services::blogs::DeleteBlogComment {
        slug: &slug,
        comment_id,
    };

    request.perform(&app, &user).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn like(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let likes_count = react(&app, &user, &slug, Reaction::Like, true).await?;
    Ok(Json(LikeResponse {
        liked: true,
        likes_count,
    })
    .into_response())
}

pub async fn unlike(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let likes_count = react(&app, &user, &slug, Reaction::Like, false).await?;
    Ok(Json(LikeResponse {
        liked: false,
        likes_count,
    })
    .into_response())
}

pub async fn save(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let saves_count = react(&app, &user, &slug, Reaction::Save, true).await?;
    Ok(Json(SaveResponse {
        saved: true,
        saves_count,
    })
    .into_response())
}

pub async fn unsave(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let saves_count = react(&app, &user, &slug, Reaction::Save, false).await?;
    Ok(Json(SaveResponse {
        saved: false,
        saves_count,
    })
    .into_response())
}

async fn react(
    app: &App,
    user: &SessionUser,
    slug: &str,
    reaction: Reaction,
    active: bool,
) -> Result<i64, ApiError> {
    services::blogs::ReactToBlog {
        slug,
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

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_publish_and_read_blog() {
        let app = App::new_for_tests().await;
        let mut server = test_utils::build_test_server(&app);
        test_utils::users::override_credentials()
            .app(&app)
            .server(&mut server)
            .email("alice@example.com")
            .call()
            .await;

        let response = server
            .post("/api/v1/blog-categories")
            .json(&json!({ "name": "Travel" }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/api/v1/blogs")
            .json(&json!({
                "title": "Street Food of Old Dhaka",
                "description": "A walk through the lanes.",
                "content": "Start at Chawk Bazaar...",
                "category": "travel",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json_contains(&json!({
            "slug": "street-food-of-old-dhaka",
            "category": { "slug": "travel", "name": "Travel" },
            "author": { "email": "alice@example.com" },
        }));

        let response = server.get("/api/v1/blogs/street-food-of-old-dhaka").await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({
            "views_count": 1,
            "is_liked": false,
            "is_saved": false,
        }));

        let response = server
            .get("/api/v1/blogs")
            .add_query_param("category", "travel")
            .await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({
            "items": [{ "slug": "street-food-of-old-dhaka" }],
            "total": 1,
        }));

        let response = server
            .patch("/api/v1/blogs/street-food-of-old-dhaka")
            .json(&json!({ "category": null }))
            .await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({ "category": null }));

        let response = server
            .delete("/api/v1/blogs/street-food-of-old-dhaka")
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.get("/api/v1/blogs/street-food-of-old-dhaka").await;
        response.assert_status_not_found();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_comment_and_react_on_blog() {
        let app = App::new_for_tests().await;
        let mut server = test_utils::build_test_server(&app);
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
        test_utils::users::override_credentials()
            .app(&app)
            .server(&mut server)
            .email("bob@example.com")
            .call()
            .await;

        let response = server
            .post("/api/v1/blogs/pitha-season/comments")
            .json(&json!({ "content": "Bhapa pitha forever" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let comment_id = response.json::<serde_json::Value>()["id"].clone();

        let response = server.get("/api/v1/blogs/pitha-season/comments").await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({
            "items": [{ "content": "Bhapa pitha forever" }],
            "total": 1,
        }));

        let response = server
            .patch(&format!("/api/v1/blogs/pitha-season/comments/{comment_id}"))
            .json(&json!({ "content": "Bhapa and chitoi pitha forever" }))
            .await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({
            "id": comment_id.clone(),
            "content": "Bhapa and chitoi pitha forever",
        }));

        let response = server
            .delete(&format!("/api/v1/blogs/pitha-season/comments/{comment_id}"))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = server.post("/api/v1/blogs/pitha-season/like").await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({ "liked": true, "likes_count": 1 }));

        let response = server.delete("/api/v1/blogs/pitha-season/like").await;
        response.assert_status_ok();
        response.assert_json_contains(&json!({ "liked": false, "likes_count": 0 }));

        let response = server.delete("/api/v1/blogs/pitha-season/save").await;
        response.assert_status_bad_request();
        response.assert_json_contains(&json!({
            "code": "invalid_request",
            "message": "You have not saved this blog",
        }));
    }
}
