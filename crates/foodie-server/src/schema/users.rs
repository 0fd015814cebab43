use bon::Builder;
use chrono::{DateTime, Utc};
use foodie_model::activity::{ActivityType, ObjectType, UserActivity};
use foodie_model::id::{ActivityId, UserId};
use foodie_model::User;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct RegisterUser {
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    pub password: String,
    #[builder(into)]
    pub confirm_password: String,
    #[serde(default)]
    #[builder(into, default)]
    pub first_name: String,
    #[serde(default)]
    #[builder(into, default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserResponse {
    pub user: UserProfile,
    /// Token for `POST /users/verify-email`.
    pub verification_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct LoginUser {
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUserResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEmail {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub is_chef: bool,
    pub chef_experience: Option<i64>,
    pub specialties: Vec<String>,
    pub is_verified: bool,
    pub recipes_count: i64,
    pub blogs_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub joined_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            specialties: user
                .specialties_list()
                .into_iter()
                .map(String::from)
                .collect(),
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            location: user.location,
            website: user.website,
            is_chef: user.is_chef,
            chef_experience: user.chef_experience,
            is_verified: user.is_verified,
            recipes_count: user.recipes_count,
            blogs_count: user.blogs_count,
            followers_count: user.followers_count,
            following_count: user.following_count,
            joined_at: user.created_at,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Builder)]
pub struct UpdateProfile {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_chef: Option<bool>,
    /// `null` clears the value.
    #[serde(
        default,
        deserialize_with = "super::double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub chef_experience: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct ChangePassword {
    #[builder(into)]
    pub current_password: String,
    #[builder(into)]
    pub new_password: String,
    #[builder(into)]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    pub following: bool,
    pub followers_count: i64,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ActivityParams {
    /// Only activities older than this one.
    pub before: Option<ActivityId>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub activity_type: ActivityType,
    pub description: String,
    pub related_object_id: Option<i64>,
    pub related_object_type: Option<ObjectType>,
    pub created_at: DateTime<Utc>,
}

impl From<UserActivity> for Activity {
    fn from(value: UserActivity) -> Self {
        Self {
            id: value.id,
            activity_type: value.activity_type,
            description: value.description,
            related_object_id: value.related_object_id,
            related_object_type: value.related_object_type,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFeed {
    pub items: Vec<Activity>,
    pub total: u64,
    /// Pass as `before` to get the next batch, absent on the last one.
    pub next_before: Option<ActivityId>,
}
