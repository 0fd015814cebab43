//! Denormalized counters.
//!
//! Every counter is recomputed from its source rows with a `COUNT(*)`
//! sub-query instead of being incremented in place, so a counter that
//! drifted is corrected by the next refresh.
use sea_query::{DynIden, IntoIden};

use crate::blog::BlogIdent;
use crate::category::CategoryIdent;
use crate::comment::{BlogCommentIdent, RecipeCommentIdent};
use crate::follower::FollowerIdent;
use crate::id::{BlogId, CategoryId, RecipeId, UserId};
use crate::reaction::ReactionIdent;
use crate::recipe::RecipeIdent;
use crate::user::UserIdent;

/// A single counter column of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    UserFollowers(UserId),
    UserFollowing(UserId),
    UserRecipes(UserId),
    UserBlogs(UserId),
    RecipeLikes(RecipeId),
    RecipeSaves(RecipeId),
    RecipeComments(RecipeId),
    BlogLikes(BlogId),
    BlogSaves(BlogId),
    BlogComments(BlogId),
    CategoryRecipes(CategoryId),
}

impl Counter {
    #[must_use]
    pub const fn kind(self) -> CounterKind {
        match self {
            Self::UserFollowers(..) => CounterKind::UserFollowers,
            Self::UserFollowing(..) => CounterKind::UserFollowing,
            Self::UserRecipes(..) => CounterKind::UserRecipes,
            Self::UserBlogs(..) => CounterKind::UserBlogs,
            Self::RecipeLikes(..) => CounterKind::RecipeLikes,
            Self::RecipeSaves(..) => CounterKind::RecipeSaves,
            Self::RecipeComments(..) => CounterKind::RecipeComments,
            Self::BlogLikes(..) => CounterKind::BlogLikes,
            Self::BlogSaves(..) => CounterKind::BlogSaves,
            Self::BlogComments(..) => CounterKind::BlogComments,
            Self::CategoryRecipes(..) => CounterKind::CategoryRecipes,
        }
    }

    pub(crate) const fn owner_id(self) -> i64 {
        match self {
            Self::UserFollowers(id)
            | Self::UserFollowing(id)
            | Self::UserRecipes(id)
            | Self::UserBlogs(id) => id.0,
            Self::RecipeLikes(id) | Self::RecipeSaves(id) | Self::RecipeComments(id) => id.0,
            Self::BlogLikes(id) | Self::BlogSaves(id) | Self::BlogComments(id) => id.0,
            Self::CategoryRecipes(id) => id.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    UserFollowers,
    UserFollowing,
    UserRecipes,
    UserBlogs,
    RecipeLikes,
    RecipeSaves,
    RecipeComments,
    BlogLikes,
    BlogSaves,
    BlogComments,
    CategoryRecipes,
}

impl CounterKind {
    pub const ALL: [Self; 11] = [
        Self::UserFollowers,
        Self::UserFollowing,
        Self::UserRecipes,
        Self::UserBlogs,
        Self::RecipeLikes,
        Self::RecipeSaves,
        Self::RecipeComments,
        Self::BlogLikes,
        Self::BlogSaves,
        Self::BlogComments,
        Self::CategoryRecipes,
    ];

    pub const USER: [Self; 4] = [
        Self::UserFollowers,
        Self::UserFollowing,
        Self::UserRecipes,
        Self::UserBlogs,
    ];

    pub(crate) fn source(self) -> CounterSource {
        use BlogCommentIdent as BC;
        use RecipeCommentIdent as RC;

        match self {
            Self::UserFollowers => CounterSource::new(
                (UserIdent::Users, UserIdent::Id, UserIdent::FollowersCount),
                (FollowerIdent::Followers, FollowerIdent::FollowingId),
            ),
            Self::UserFollowing => CounterSource::new(
                (UserIdent::Users, UserIdent::Id, UserIdent::FollowingCount),
                (FollowerIdent::Followers, FollowerIdent::FollowerId),
            ),
            Self::UserRecipes => CounterSource::new(
                (UserIdent::Users, UserIdent::Id, UserIdent::RecipesCount),
                (RecipeIdent::Recipes, RecipeIdent::AuthorId),
            ),
            Self::UserBlogs => CounterSource::new(
                (UserIdent::Users, UserIdent::Id, UserIdent::BlogsCount),
                (BlogIdent::Blogs, BlogIdent::AuthorId),
            ),
            Self::RecipeLikes => CounterSource::new(
                (RecipeIdent::Recipes, RecipeIdent::Id, RecipeIdent::LikesCount),
                (ReactionIdent::RecipeLikes, ReactionIdent::RecipeId),
            ),
            Self::RecipeSaves => CounterSource::new(
                (RecipeIdent::Recipes, RecipeIdent::Id, RecipeIdent::SavesCount),
                (ReactionIdent::RecipeSaves, ReactionIdent::RecipeId),
            ),
            Self::RecipeComments => CounterSource::new(
                (RecipeIdent::Recipes, RecipeIdent::Id, RecipeIdent::CommentsCount),
                (RC::RecipeComments, RC::RecipeId),
            ),
            Self::BlogLikes => CounterSource::new(
                (BlogIdent::Blogs, BlogIdent::Id, BlogIdent::LikesCount),
                (ReactionIdent::BlogLikes, ReactionIdent::BlogId),
            ),
            Self::BlogSaves => CounterSource::new(
                (BlogIdent::Blogs, BlogIdent::Id, BlogIdent::SavesCount),
                (ReactionIdent::BlogSaves, ReactionIdent::BlogId),
            ),
            Self::BlogComments => CounterSource::new(
                (BlogIdent::Blogs, BlogIdent::Id, BlogIdent::CommentsCount),
                (BC::BlogComments, BC::BlogId),
            ),
            Self::CategoryRecipes => CounterSource::new(
                (
                    CategoryIdent::Categories,
                    CategoryIdent::Id,
                    CategoryIdent::RecipeCount,
                ),
                (RecipeIdent::Recipes, RecipeIdent::CategoryId),
            ),
        }
    }
}

/// Where a counter lives and which rows it counts.
pub(crate) struct CounterSource {
    pub(crate) table: DynIden,
    pub(crate) id: DynIden,
    pub(crate) column: DynIden,
    pub(crate) rows: DynIden,
    pub(crate) rows_fk: DynIden,
}

impl CounterSource {
    fn new<A, B, C, D, E>((table, id, column): (A, B, C), (rows, rows_fk): (D, E)) -> Self
    where
        A: IntoIden,
        B: IntoIden,
        C: IntoIden,
        D: IntoIden,
        E: IntoIden,
    {
        Self {
            table: table.into_iden(),
            id: id.into_iden(),
            column: column.into_iden(),
            rows: rows.into_iden(),
            rows_fk: rows_fk.into_iden(),
        }
    }
}
