use foodie_db::SqliteConnection;
use foodie_error::api::RegisterUserFailed;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::id::{RecipeId, UserId};
use foodie_model::page::{Page, PageParams};
use foodie_model::recipe::Recipe;
use foodie_model::User;
use validator::ValidateEmail;

use crate::auth::password::MIN_PASSWORD_LEN;

const MAX_EMAIL_LEN: usize = 254;

/// Turns the raw `page` and `limit` parameters into a [`Page`].
pub fn page(params: PageParams) -> Result<Page, ApiError> {
    Page::try_from(params)
        .map_err(|error| ApiError::new(ApiErrorCategory::InvalidRequest).message(error.to_string()))
}

/// Checks whether `user` owns a resource created by `owner_id`.
pub fn check_owner(user: &User, owner_id: UserId, message: &str) -> Result<(), ApiError> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(ApiError::new(ApiErrorCategory::Forbidden).message(message))
    }
}

/// The address itself is only proven by email verification.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && email.validate_email()
}

/// Checks the password chosen during registration.
pub fn check_new_password(password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if password != confirm_password {
        return Err(ApiError::new(ApiErrorCategory::RegisterUserFailed(
            RegisterUserFailed::UnmatchedPassword,
        ))
        .message("Passwords do not match"));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::new(ApiErrorCategory::RegisterUserFailed(
            RegisterUserFailed::InvalidPassword,
        ))
        .message(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    Ok(())
}

/// Finds a recipe the user is allowed to see. Drafts and archived recipes
/// are only visible to their author.
pub async fn find_visible_recipe(
    conn: &mut SqliteConnection,
    id: RecipeId,
    viewer: Option<&User>,
) -> Result<Recipe, ApiError> {
    match Recipe::find(conn, id).await? {
        Some(recipe) if is_recipe_visible(&recipe, viewer) => Ok(recipe),
        _ => Err(recipe_not_found()),
    }
}

#[must_use]
pub fn is_recipe_visible(recipe: &Recipe, viewer: Option<&User>) -> bool {
    recipe.is_published() || viewer.is_some_and(|v| v.id == recipe.author_id)
}

pub fn recipe_not_found() -> ApiError {
    ApiError::new(ApiErrorCategory::NotFound).message("Could not find recipe specified")
}

pub fn blog_not_found() -> ApiError {
    ApiError::new(ApiErrorCategory::NotFound).message("Could not find blog specified")
}

pub fn user_not_found() -> ApiError {
    ApiError::new(ApiErrorCategory::NotFound).message("Could not find user specified")
}
