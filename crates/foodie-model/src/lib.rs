mod sqlite;

pub mod activity;
pub mod blog;
pub mod category;
pub mod comment;
pub mod counter;
pub mod filter;
pub mod follower;
pub mod id;
pub mod ingredient;
pub mod page;
pub mod rating;
pub mod reaction;
pub mod recipe;
pub mod slug;
pub mod step;
pub mod user;

pub use self::sqlite::{
    DeleteBlogError, DeleteCategoryError, DeleteCommentError, DeleteRecipeError, FollowError,
    InsertActivityError, InsertBlogCategoryError, InsertBlogError, InsertCategoryError,
    InsertCommentError, InsertRecipeError, InsertUserError, PurgeActivitiesError, RateRecipeError,
    ReactionError, RecountError, RefreshCounterError, ReplaceIngredientsError, ReplaceStepsError,
    UnfollowError, UpdateBlogError, UpdateCategoryError, UpdateCommentError, UpdateRecipeError,
    UpdateUserError,
};
pub use self::user::User;

/// Schema migrations of the AmaderFoodie database.
pub static DB_MIGRATIONS: foodie_db::Migrator = sqlx::migrate!("./migrations");
