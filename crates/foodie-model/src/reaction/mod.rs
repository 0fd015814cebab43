use sea_query::Iden;

use crate::counter::Counter;
use crate::id::{BlogId, RecipeId};

/// A like or a save: a unique `(user, target)` row in one of the
/// reaction tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Like,
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Recipe(RecipeId),
    Blog(BlogId),
}

impl ReactionTarget {
    /// Counter on the target that mirrors the amount of `reaction` rows.
    #[must_use]
    pub const fn counter(self, reaction: Reaction) -> Counter {
        match (self, reaction) {
            (Self::Recipe(id), Reaction::Like) => Counter::RecipeLikes(id),
            (Self::Recipe(id), Reaction::Save) => Counter::RecipeSaves(id),
            (Self::Blog(id), Reaction::Like) => Counter::BlogLikes(id),
            (Self::Blog(id), Reaction::Save) => Counter::BlogSaves(id),
        }
    }

    pub(crate) const fn raw_id(self) -> i64 {
        match self {
            Self::Recipe(id) => id.0,
            Self::Blog(id) => id.0,
        }
    }

    /// Table of the reaction rows and the column pointing to the target.
    pub(crate) const fn idents(self, reaction: Reaction) -> (ReactionIdent, ReactionIdent) {
        let table = match (self, reaction) {
            (Self::Recipe(..), Reaction::Like) => ReactionIdent::RecipeLikes,
            (Self::Recipe(..), Reaction::Save) => ReactionIdent::RecipeSaves,
            (Self::Blog(..), Reaction::Like) => ReactionIdent::BlogLikes,
            (Self::Blog(..), Reaction::Save) => ReactionIdent::BlogSaves,
        };
        let column = match self {
            Self::Recipe(..) => ReactionIdent::RecipeId,
            Self::Blog(..) => ReactionIdent::BlogId,
        };
        (table, column)
    }
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum ReactionIdent {
    RecipeLikes,
    RecipeSaves,
    BlogLikes,
    BlogSaves,
    UserId,
    RecipeId,
    BlogId,
    CreatedAt,
}
