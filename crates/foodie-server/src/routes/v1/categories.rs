use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodie_error::ApiError;

use crate::extract::{Json, Path, SessionUser};
use crate::schema::categories::{
    BlogCategoryResponse, CategoryResponse, CreateBlogCategory, CreateCategory,
    UpdateBlogCategory, UpdateCategory,
};
use crate::{services, App};

pub async fn list(app: App) -> Result<Response, ApiError> {
    let categories = services::categories::ListCategories.perform(&app).await?;
    let response = categories
        .into_iter()
        .map(CategoryResponse::from)
        .collect::<Vec<_>>();

    Ok(Json(response).into_response())
}

pub async fn create(
    app: App,
    user: SessionUser,
    Json(form): Json<CreateCategory>,
) -> Result<Response, ApiError> {
    let request = services::categories::CreateCategory {
        name: &form.name,
        description: &form.description,
    };

    let category = request.perform(&app, &user).await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))).into_response())
}

pub async fn detail(app: App, Path(slug): Path<String>) -> Result<Response, ApiError> {
    let category = services::categories::GetCategory { slug: &slug }
        .perform(&app)
        .await?;

    Ok(Json(CategoryResponse::from(category)).into_response())
}

pub async fn update(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
    Json(form): Json<UpdateCategory>,
) -> Result<Response, ApiError> {
    let request = services::categories::UpdateCategory {
        slug: &slug,
        name: form.name.as_deref(),
        description: form.description.as_deref(),
    };

    let category = request.perform(&app, &user).await?;
    Ok(Json(CategoryResponse::from(category)).into_response())
}

pub async fn remove(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    services::categories::DeleteCategory { slug: &slug }
        .perform(&app, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn list_blog_categories(app: App) -> Result<Response, ApiError> {
    let categories = services::categories::ListBlogCategories
        .perform(&app)
        .await?;
    let response = categories
        .into_iter()
        .map(BlogCategoryResponse::from)
        .collect::<Vec<_>>();

    Ok(Json(response).into_response())
}

pub async fn create_blog_category(
    app: App,
    user: SessionUser,
    Json(form): Json<CreateBlogCategory>,
) -> Result<Response, ApiError> {
    let request = services::categories::CreateBlogCategory { name: &form.name };

    let category = request.perform(&app, &user).await?;
    Ok((StatusCode::CREATED, Json(BlogCategoryResponse::from(category))).into_response())
}

pub async fn blog_category(app: App, Path(slug): Path<String>) -> Result<Response, ApiError> {
    let category = services::categories::GetBlogCategory { slug: &slug }
        .perform(&app)
        .await?;

    Ok(Json(BlogCategoryResponse::from(category)).into_response())
}

pub async fn update_blog_category(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
    Json(form): Json<UpdateBlogCategory>,
) -> Result<Response, ApiError> {
    let request = services::categories::UpdateBlogCategoryName {
        slug: &slug,
        name: &form.name,
    };

    let category = request.perform(&app, &user).await?;
    Ok(Json(BlogCategoryResponse::from(category)).into_response())
}

pub async fn remove_blog_category(
    app: App,
    user: SessionUser,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    services::categories::DeleteBlogCategory { slug: &slug }
        .perform(&app, &user)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
