//! Request and response bodies of the AmaderFoodie HTTP API.
use foodie_model::id::UserId;
use foodie_model::page::Page;
use serde::{Deserialize, Deserializer, Serialize};

pub mod blogs;
pub mod categories;
pub mod recipes;
pub mod users;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

/// One page of a listing plus the total amount of matching items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Paginated<T> {
    pub fn new<I>(items: I, page: Page, total: u64) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            page: page.number(),
            limit: page.limit(),
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub slug: String,
    pub name: String,
}

impl CategoryRef {
    #[must_use]
    pub fn from_parts(slug: Option<String>, name: Option<String>) -> Option<Self> {
        Some(Self {
            slug: slug?,
            name: name?,
        })
    }
}

/// Lets a field tell apart "missing" (`None`) from an explicit `null`
/// (`Some(None)`). Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn join_list(items: &[String]) -> String {
    items
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
