mod activities;
mod blogs;
mod categories;
mod comments;
mod counters;
mod filter;
mod followers;
mod ingredients;
mod ratings;
mod reactions;
mod recipes;
mod steps;
mod users;

pub use self::activities::{InsertActivityError, PurgeActivitiesError};
pub use self::blogs::{DeleteBlogError, InsertBlogError, UpdateBlogError};
pub use self::categories::{
    DeleteCategoryError, InsertBlogCategoryError, InsertCategoryError, UpdateCategoryError,
};
pub use self::comments::{DeleteCommentError, InsertCommentError, UpdateCommentError};
pub use self::counters::{RecountError, RefreshCounterError};
pub use self::followers::{FollowError, UnfollowError};
pub use self::ingredients::ReplaceIngredientsError;
pub use self::ratings::RateRecipeError;
pub use self::reactions::ReactionError;
pub use self::recipes::{DeleteRecipeError, InsertRecipeError, UpdateRecipeError};
pub use self::steps::ReplaceStepsError;
pub use self::users::{InsertUserError, UpdateUserError};

use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, IntoIden, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;

use crate::slug;

/// Maximum amount of numbered candidates tried by [`unique_slug`].
const MAX_SLUG_ATTEMPTS: u32 = 100;

/// Finds the first slug candidate derived from `base` that is not used
/// in the `slug` column of `table` yet.
pub(crate) async fn unique_slug<T, C>(
    conn: &mut SqliteConnection,
    table: T,
    column: C,
    base: &str,
) -> Result<String>
where
    T: IntoIden,
    C: IntoIden,
{
    let table = table.into_iden();
    let column = column.into_iden();

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let candidate = slug::candidate(base, attempt);
        let (sql, values) = Query::select()
            .expr(Expr::exists(
                Query::select()
                    .column(Asterisk)
                    .from(table.clone())
                    .and_where(Expr::col(column.clone()).eq(candidate.as_str()))
                    .take(),
            ))
            .build_sqlx(SqliteQueryBuilder);

        let taken = sqlx::query_scalar_with::<_, bool, _>(&sql, values)
            .fetch_one(&mut *conn)
            .await
            .erase_context()
            .attach_printable("could not check if slug is taken")?;

        if !taken {
            return Ok(candidate);
        }
    }

    // every numbered candidate is taken
    Ok(format!("{base}-{}", chrono::Utc::now().timestamp_millis()))
}
