use bon::Builder;
use chrono::{DateTime, Utc};
use sea_query::Iden;
use sqlx::FromRow;

use crate::id::{RatingId, RecipeId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Rating {
    pub id: RatingId,
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub rating: i64,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    #[must_use]
    pub fn is_valid_value(value: i64) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RatingView {
    #[sqlx(flatten)]
    pub rating: Rating,
    pub author_email: String,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum RatingIdent {
    RecipeRatings,
    Id,
    UserId,
    RecipeId,
    Rating,
    Review,
    CreatedAt,
}

#[derive(Debug, Builder)]
pub struct InsertRating<'a> {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
    pub rating: i64,
    #[builder(default)]
    pub review: &'a str,
}
