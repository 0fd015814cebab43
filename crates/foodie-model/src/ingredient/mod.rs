use sea_query::Iden;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::id::IngredientId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum IngredientUnit {
    Tsp,
    Tbsp,
    Cup,
    Oz,
    Lb,
    Kg,
    G,
    Ml,
    L,
    Piece,
    Clove,
    Slice,
    Bunch,
    Pinch,
    ToTaste,
}

impl IngredientUnit {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tsp => "tsp",
            Self::Tbsp => "tbsp",
            Self::Cup => "cup",
            Self::Oz => "oz",
            Self::Lb => "lb",
            Self::Kg => "kg",
            Self::G => "g",
            Self::Ml => "ml",
            Self::L => "l",
            Self::Piece => "piece",
            Self::Clove => "clove",
            Self::Slice => "slice",
            Self::Bunch => "bunch",
            Self::Pinch => "pinch",
            Self::ToTaste => "to_taste",
        }
    }
}

/// An ingredient entry such as "2 cup rice". Entries with the same name,
/// quantity and unit are stored once and linked to every recipe using them.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub quantity: String,
    pub unit: Option<IngredientUnit>,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum IngredientIdent {
    Ingredients,
    Id,
    Name,
    Quantity,
    Unit,
}

#[derive(Clone, Copy, Iden)]
pub(crate) enum RecipeIngredientIdent {
    RecipeIngredients,
    RecipeId,
    IngredientId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub quantity: &'a str,
    pub unit: Option<IngredientUnit>,
}
