use foodie_error::{ApiError, ApiErrorCategory};
use foodie_db::SqliteConnection;
use foodie_model::category::{
    self, BlogCategory, Category, InsertBlogCategory, InsertCategory, UpdateBlogCategory,
};
use foodie_model::slug::slugify;

use crate::extract::SessionUser;
use crate::App;

fn check_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::new(ApiErrorCategory::InvalidRequest)
            .message("Category name must not be empty"));
    }
    Ok(name)
}

async fn find_category(conn: &mut SqliteConnection, slug: &str) -> Result<Category, ApiError> {
    Category::find_by_slug(conn, slug).await?.ok_or_else(|| {
        ApiError::new(ApiErrorCategory::NotFound).message("Could not find category specified")
    })
}

async fn find_blog_category(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<BlogCategory, ApiError> {
    BlogCategory::find_by_slug(conn, slug).await?.ok_or_else(|| {
        ApiError::new(ApiErrorCategory::NotFound).message("Could not find category specified")
    })
}

#[derive(Debug)]
pub struct ListCategories;

impl ListCategories {
    #[tracing::instrument(skip_all, name = "services.categories.list")]
    pub async fn perform(self, app: &App) -> Result<Vec<Category>, ApiError> {
        let mut conn = app.db_read().await?;
        Ok(Category::list(&mut conn).await?)
    }
}

#[derive(Debug)]
pub struct CreateCategory<'a> {
    pub name: &'a str,
    pub description: &'a str,
}

impl CreateCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.categories.create")]
    pub async fn perform(
        self,
        app: &App,
        _session_user: &SessionUser,
    ) -> Result<Category, ApiError> {
        let name = check_name(self.name)?;
        let slug = slugify(name, "category");

        let mut conn = app.db_write().await?;
        let category = InsertCategory::builder()
            .name(name)
            .slug(&slug)
            .description(self.description.trim())
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(category)
    }
}

#[derive(Debug)]
pub struct GetCategory<'a> {
    pub slug: &'a str,
}

impl GetCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.categories.get")]
    pub async fn perform(self, app: &App) -> Result<Category, ApiError> {
        let mut conn = app.db_read().await?;
        find_category(&mut conn, self.slug).await
    }
}

/// Renames or redescribes a category. Its slug is kept.
#[derive(Debug)]
pub struct UpdateCategory<'a> {
    pub slug: &'a str,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl UpdateCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.categories.update")]
    pub async fn perform(
        self,
        app: &App,
        _session_user: &SessionUser,
    ) -> Result<Category, ApiError> {
        let name = self.name.map(check_name).transpose()?;

        let mut conn = app.db_write().await?;
        let existing = find_category(&mut conn, self.slug).await?;
        let updated = category::UpdateCategory {
            name,
            description: self.description,
        }
        .update(&mut conn, existing.id)
        .await?;

        let Some(updated) = updated else {
            return Err(ApiError::new(ApiErrorCategory::NotFound)
                .message("Could not find category specified"));
        };

        conn.commit().await?;
        Ok(updated)
    }
}

/// Recipes of a deleted category become uncategorized.
#[derive(Debug)]
pub struct DeleteCategory<'a> {
    pub slug: &'a str,
}

impl DeleteCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.categories.delete")]
    pub async fn perform(self, app: &App, _session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let existing = find_category(&mut conn, self.slug).await?;
        Category::delete(&mut conn, existing.id).await?;

        conn.commit().await?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct ListBlogCategories;

impl ListBlogCategories {
    #[tracing::instrument(skip_all, name = "services.blog_categories.list")]
    pub async fn perform(self, app: &App) -> Result<Vec<BlogCategory>, ApiError> {
        let mut conn = app.db_read().await?;
        Ok(BlogCategory::list(&mut conn).await?)
    }
}

#[derive(Debug)]
pub struct CreateBlogCategory<'a> {
    pub name: &'a str,
}

impl CreateBlogCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.blog_categories.create")]
    pub async fn perform(
        self,
        app: &App,
        _session_user: &SessionUser,
    ) -> Result<BlogCategory, ApiError> {
        let name = check_name(self.name)?;
        let slug = slugify(name, "category");

        let mut conn = app.db_write().await?;
        let category = InsertBlogCategory::builder()
            .name(name)
            .slug(&slug)
            .build()
            .insert(&mut conn)
            .await?;

        conn.commit().await?;
        Ok(category)
    }
}

#[derive(Debug)]
pub struct GetBlogCategory<'a> {
    pub slug: &'a str,
}

impl GetBlogCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.blog_categories.get")]
    pub async fn perform(self, app: &App) -> Result<BlogCategory, ApiError> {
        let mut conn = app.db_read().await?;
        find_blog_category(&mut conn, self.slug).await
    }
}

#[derive(Debug)]
pub struct UpdateBlogCategoryName<'a> {
    pub slug: &'a str,
    pub name: &'a str,
}

impl UpdateBlogCategoryName<'_> {
    #[tracing::instrument(skip_all, name = "services.blog_categories.update")]
    pub async fn perform(
        self,
        app: &App,
        _session_user: &SessionUser,
    ) -> Result<BlogCategory, ApiError> {
        let name = check_name(self.name)?;

        let mut conn = app.db_write().await?;
        let existing = find_blog_category(&mut conn, self.slug).await?;
        let Some(updated) = UpdateBlogCategory { name }
            .update(&mut conn, existing.id)
            .await?
        else {
            return Err(ApiError::new(ApiErrorCategory::NotFound)
                .message("Could not find category specified"));
        };

        conn.commit().await?;
        Ok(updated)
    }
}

#[derive(Debug)]
pub struct DeleteBlogCategory<'a> {
    pub slug: &'a str,
}

impl DeleteBlogCategory<'_> {
    #[tracing::instrument(skip_all, name = "services.blog_categories.delete")]
    pub async fn perform(self, app: &App, _session_user: &SessionUser) -> Result<(), ApiError> {
        let mut conn = app.db_write().await?;
        let existing = find_blog_category(&mut conn, self.slug).await?;
        BlogCategory::delete(&mut conn, existing.id).await?;

        conn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_include;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{self, TestResultExt};

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_and_list_categories() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let session_user = alice.get_session_user(&app).await;

        let category = CreateCategory {
            name: " Street Food ",
            description: "Fuchka and friends",
        }
        .perform(&app, &session_user)
        .await
        .unwrap();
        assert_eq!(category.name, "Street Food");
        assert_eq!(category.slug, "street-food");
        assert_eq!(category.recipe_count, 0);

        let categories = ListCategories.perform(&app).await.unwrap();
        assert_eq!(categories.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_reject_duplicated_category() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let session_user = alice.get_session_user(&app).await;

        CreateCategory {
            name: "Desserts",
            description: "",
        }
        .perform(&app, &session_user)
        .await
        .unwrap();

        let error = CreateCategory {
            name: "Desserts",
            description: "",
        }
        .perform(&app, &session_user)
        .await
        .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({ "code": "conflict" }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_create_blog_category() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;

        let category = CreateBlogCategory { name: "Travel" }
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .unwrap();
        assert_eq!(category.slug, "travel");

        let error = CreateBlogCategory { name: "  " }
            .perform(&app, &alice.get_session_user(&app).await)
            .await
            .expect_error_json();

        assert_json_include!(
            actual: error,
            expected: json!({
                "code": "invalid_request",
                "message": "Category name must not be empty",
            }),
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_update_and_delete_category() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let session_user = alice.get_session_user(&app).await;

        for name in ["Desserts", "Snacks"] {
            CreateCategory {
                name,
                description: "",
            }
            .perform(&app, &session_user)
            .await
            .unwrap();
        }

        let updated = UpdateCategory {
            slug: "desserts",
            name: Some(" Sweets "),
            description: Some("Mishti and more"),
        }
        .perform(&app, &session_user)
        .await
        .unwrap();
        assert_eq!(updated.name, "Sweets");
        assert_eq!(updated.slug, "desserts");
        assert_eq!(updated.description, "Mishti and more");

        let error = UpdateCategory {
            slug: "desserts",
            name: Some("Snacks"),
            description: None,
        }
        .perform(&app, &session_user)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "conflict" }),
        );

        let error = UpdateCategory {
            slug: "desserts",
            name: Some(" "),
            description: None,
        }
        .perform(&app, &session_user)
        .await
        .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "invalid_request" }),
        );

        DeleteCategory { slug: "desserts" }
            .perform(&app, &session_user)
            .await
            .unwrap();

        let error = GetCategory { slug: "desserts" }
            .perform(&app)
            .await
            .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "not_found" }),
        );
        assert_eq!(ListCategories.perform(&app).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn should_update_and_delete_blog_category() {
        let app = App::new_for_tests().await;
        let alice = test_utils::users::start_session()
            .app(&app)
            .email("alice@example.com")
            .call()
            .await;
        let session_user = alice.get_session_user(&app).await;

        CreateBlogCategory { name: "Travel" }
            .perform(&app, &session_user)
            .await
            .unwrap();

        let updated = UpdateBlogCategoryName {
            slug: "travel",
            name: "Food Travel",
        }
        .perform(&app, &session_user)
        .await
        .unwrap();
        assert_eq!(updated.name, "Food Travel");
        assert_eq!(
            GetBlogCategory { slug: "travel" }.perform(&app).await.unwrap(),
            updated
        );

        DeleteBlogCategory { slug: "travel" }
            .perform(&app, &session_user)
            .await
            .unwrap();

        let error = DeleteBlogCategory { slug: "travel" }
            .perform(&app, &session_user)
            .await
            .expect_error_json();
        assert_json_include!(
            actual: error,
            expected: json!({ "code": "not_found" }),
        );
    }
}
