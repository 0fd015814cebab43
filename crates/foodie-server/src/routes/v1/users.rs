use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodie_error::ApiError;
use foodie_model::id::UserId;
use foodie_model::page::PageParams;
use foodie_utils::Sensitive;

use crate::extract::{Json, Path, Query, SessionUser};
use crate::schema::users::{
    ActivityFeed, ActivityParams, ChangePassword, FollowResponse, LoginUser, LoginUserResponse,
    RegisterUser, RegisterUserResponse, UpdateProfile, UserProfile, VerifyEmail,
};
use crate::schema::{join_list, Paginated};
use crate::services::users::Direction;
use crate::services::util;
use crate::{services, App};

pub async fn register(app: App, Json(form): Json<RegisterUser>) -> Result<Response, ApiError> {
    let request = services::users::Register {
        email: Sensitive::new(&form.email),
        password: Sensitive::new(&form.password),
        confirm_password: Sensitive::new(&form.confirm_password),
        first_name: &form.first_name,
        last_name: &form.last_name,
    };

    let response = request.perform(&app).await?;
    let response = Json(RegisterUserResponse {
        user: response.user.into(),
        verification_token: response.verification_token,
    });

    Ok((StatusCode::CREATED, response).into_response())
}

pub async fn login(app: App, Json(form): Json<LoginUser>) -> Result<Response, ApiError> {
    let request = services::users::Login {
        email: Sensitive::new(&form.email),
        password: Sensitive::new(&form.password),
    };

    let response = request.perform(&app).await?;
    let response = Json(LoginUserResponse {
        token: response.token,
        user: response.user.into(),
    });

    Ok(response.into_response())
}

pub async fn verify_email(app: App, Json(form): Json<VerifyEmail>) -> Result<Response, ApiError> {
    let request = services::users::VerifyEmail {
        token: Sensitive::new(&form.token),
    };

    let user = request.perform(&app).await?;
    Ok(Json(UserProfile::from(user)).into_response())
}

pub async fn local_profile(user: SessionUser) -> Response {
    Json(UserProfile::from(user.into_inner())).into_response()
}

pub async fn update_profile(
    app: App,
    user: SessionUser,
    Json(form): Json<UpdateProfile>,
) -> Result<Response, ApiError> {
    let specialties = form.specialties.as_deref().map(join_list);
    let request = services::users::UpdateProfile {
        first_name: form.first_name.as_deref(),
        last_name: form.last_name.as_deref(),
        bio: form.bio.as_deref(),
        location: form.location.as_deref(),
        website: form.website.as_deref(),
        is_chef: form.is_chef,
        chef_experience: form.chef_experience,
        specialties: specialties.as_deref(),
    };

    let user = request.perform(&app, &user).await?;
    Ok(Json(UserProfile::from(user)).into_response())
}

pub async fn change_password(
    app: App,
    user: SessionUser,
    Json(form): Json<ChangePassword>,
) -> Result<Response, ApiError> {
    let request = services::users::ChangePassword {
        current_password: Sensitive::new(&form.current_password),
        new_password: Sensitive::new(&form.new_password),
        confirm_password: Sensitive::new(&form.confirm_password),
    };

    request.perform(&app, &user).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn profile(app: App, Path(id): Path<UserId>) -> Result<Response, ApiError> {
    let user = services::users::GetProfile { id }.perform(&app).await?;
    Ok(Json(UserProfile::from(user)).into_response())
}

pub async fn followers(
    app: App,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    list_connections(app, user_id, Direction::Followers, page).await
}

pub async fn following(
    app: App,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
    list_connections(app, user_id, Direction::Following, page).await
}

async fn list_connections(
    app: App,
    user_id: UserId,
    direction: Direction,
    page: PageParams,
) -> Result<Response, ApiError> {
    let page = util::page(page)?;
    let request = services::users::ListConnections {
        user_id,
        direction,
        page,
    };

    let response = request.perform(&app).await?;
    let response = Paginated::<UserProfile>::new(response.users, page, response.total);
    Ok(Json(response).into_response())
}

pub async fn follow(
    app: App,
    user: SessionUser,
    Path(target): Path<UserId>,
) -> Result<Response, ApiError> {
    let target = services::users::FollowUser { target }
        .perform(&app, &user)
        .await?;

    Ok(Json(FollowResponse {
        following: true,
        followers_count: target.followers_count,
    })
    .into_response())
}

pub async fn unfollow(
    app: App,
    user: SessionUser,
    Path(target): Path<UserId>,
) -> Result<Response, ApiError> {
    let target = services::users::UnfollowUser { target }
        .perform(&app, &user)
        .await?;

    Ok(Json(FollowResponse {
        following: false,
        followers_count: target.followers_count,
    })
    .into_response())
}

pub async fn activities(
    app: App,
    user: SessionUser,
    Path(user_id): Path<UserId>,
    Query(params): Query<ActivityParams>,
) -> Result<Response, ApiError> {
    let request = services::users::ListActivities {
        user_id,
        before: params.before,
        limit: params.limit,
    };

    let response = request.perform(&app, &user).await?;
    Ok(Json(ActivityFeed {
        items: response.activities.into_iter().map(Into::into).collect(),
        total: response.total,
        next_before: response.next_before,
    })
    .into_response())
}
