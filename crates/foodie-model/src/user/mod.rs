use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub is_chef: bool,
    pub chef_experience: Option<i64>,
    pub specialties: String,

    pub is_active: bool,
    pub is_verified: bool,

    pub recipes_count: i64,
    pub blogs_count: i64,
    pub followers_count: i64,
    pub following_count: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Splits the comma separated `specialties` field.
    #[must_use]
    pub fn specialties_list(&self) -> Vec<&str> {
        split_comma_list(&self.specialties)
    }
}

pub(crate) fn split_comma_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum UserIdent {
    Users,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    Bio,
    Location,
    Website,
    IsChef,
    ChefExperience,
    Specialties,
    IsActive,
    IsVerified,
    RecipesCount,
    BlogsCount,
    FollowersCount,
    FollowingCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Profile fields to change. Fields left as [`None`] are kept as is.
#[derive(Debug, Builder)]
pub struct UpdateUser<'a> {
    #[builder(into)]
    pub id: UserId,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub location: Option<&'a str>,
    pub website: Option<&'a str>,
    pub is_chef: Option<bool>,
    pub chef_experience: Option<Option<i64>>,
    pub specialties: Option<&'a str>,
}

impl UpdateUser<'_> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.location.is_none()
            && self.website.is_none()
            && self.is_chef.is_none()
            && self.chef_experience.is_none()
            && self.specialties.is_none()
    }
}
