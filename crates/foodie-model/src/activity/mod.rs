//! Append-only log of user actions.
//!
//! Every state changing action writes exactly one [`UserActivity`] row
//! inside the same transaction as the change itself.
use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::id::{ActivityId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ActivityType {
    UserRegistered,
    EmailVerified,
    ProfileUpdated,
    PasswordChanged,
    UserFollowed,
    UserUnfollowed,
    RecipeCreated,
    RecipeUpdated,
    RecipePublished,
    RecipeDeleted,
    RecipeViewed,
    RecipeRated,
    RecipeCommented,
    RecipeLiked,
    RecipeUnliked,
    RecipeSaved,
    RecipeUnsaved,
    BlogCreated,
    BlogUpdated,
    BlogDeleted,
    BlogCommented,
    BlogLiked,
    BlogUnliked,
    BlogSaved,
    BlogUnsaved,
    CommentUpdated,
    CommentDeleted,
}

impl ActivityType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "user_registered",
            Self::EmailVerified => "email_verified",
            Self::ProfileUpdated => "profile_updated",
            Self::PasswordChanged => "password_changed",
            Self::UserFollowed => "user_followed",
            Self::UserUnfollowed => "user_unfollowed",
            Self::RecipeCreated => "recipe_created",
            Self::RecipeUpdated => "recipe_updated",
            Self::RecipePublished => "recipe_published",
            Self::RecipeDeleted => "recipe_deleted",
            Self::RecipeViewed => "recipe_viewed",
            Self::RecipeRated => "recipe_rated",
            Self::RecipeCommented => "recipe_commented",
            Self::RecipeLiked => "recipe_liked",
            Self::RecipeUnliked => "recipe_unliked",
            Self::RecipeSaved => "recipe_saved",
            Self::RecipeUnsaved => "recipe_unsaved",
            Self::BlogCreated => "blog_created",
            Self::BlogUpdated => "blog_updated",
            Self::BlogDeleted => "blog_deleted",
            Self::BlogCommented => "blog_commented",
            Self::BlogLiked => "blog_liked",
            Self::BlogUnliked => "blog_unliked",
            Self::BlogSaved => "blog_saved",
            Self::BlogUnsaved => "blog_unsaved",
            Self::CommentUpdated => "comment_updated",
            Self::CommentDeleted => "comment_deleted",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of object a [`UserActivity`] points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ObjectType {
    User,
    Recipe,
    Blog,
    Comment,
}

impl ObjectType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Recipe => "recipe",
            Self::Blog => "blog",
            Self::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserActivity {
    pub id: ActivityId,
    pub user_id: UserId,
    pub activity_type: ActivityType,
    pub description: String,
    /// Weak reference, the object may no longer exist.
    pub related_object_id: Option<i64>,
    pub related_object_type: Option<ObjectType>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum UserActivityIdent {
    UserActivities,
    Id,
    UserId,
    ActivityType,
    Description,
    RelatedObjectId,
    RelatedObjectType,
    CreatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertUserActivity {
    #[builder(into)]
    pub user_id: UserId,
    pub activity_type: ActivityType,
    #[builder(into)]
    pub description: String,
    /// Kind and id of the object the activity is about.
    pub related_object: Option<(ObjectType, i64)>,
}

/// Builds the description of an activity, in the form of
/// `User <email> <verb> <object>: <title>`.
#[must_use]
pub fn describe(email: &str, verb: &str, object: &str, title: &str) -> String {
    format!("User {email} {verb} {object}: {title}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_describe_activity() {
        assert_eq!(
            describe("alice@example.com", "liked", "recipe", "Khichuri"),
            "User alice@example.com liked recipe: Khichuri"
        );
    }

    #[test]
    fn should_serialize_type_as_snake_case() {
        assert_eq!(ActivityType::RecipeUnliked.as_str(), "recipe_unliked");
        assert_eq!(ActivityType::CommentDeleted.to_string(), "comment_deleted");
        assert_eq!(ActivityType::CommentUpdated.to_string(), "comment_updated");
    }
}
