use bon::Builder;
use foodie_model::category::{BlogCategory, Category};
use foodie_model::id::{BlogCategoryId, CategoryId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub recipe_count: i64,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
            description: value.description,
            recipe_count: value.recipe_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct CreateCategory {
    #[builder(into)]
    pub name: String,
    #[serde(default)]
    #[builder(into, default)]
    pub description: String,
}

/// Fields left out are kept as is.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Builder)]
pub struct UpdateCategory {
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogCategoryResponse {
    pub id: BlogCategoryId,
    pub name: String,
    pub slug: String,
}

impl From<BlogCategory> for BlogCategoryResponse {
    fn from(value: BlogCategory) -> Self {
        Self {
            id: value.id,
            name: value.name,
            slug: value.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct CreateBlogCategory {
    #[builder(into)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
pub struct UpdateBlogCategory {
    #[builder(into)]
    pub name: String,
}
