use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::category::{
    BlogCategory, BlogCategoryIdent, Category, CategoryIdent, InsertBlogCategory, InsertCategory,
    UpdateBlogCategory, UpdateCategory,
};
use crate::id::{BlogCategoryId, CategoryId};

#[derive(Debug, Error)]
#[error("Could not update category")]
pub struct UpdateCategoryError;

#[derive(Debug, Error)]
#[error("Could not delete category")]
pub struct DeleteCategoryError;

impl Category {
    #[tracing::instrument(skip_all, name = "db.categories.find")]
    pub async fn find(conn: &mut SqliteConnection, id: CategoryId) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(CategoryIdent::Categories)
            .and_where(Expr::col(CategoryIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find category by id")
    }

    #[tracing::instrument(skip_all, name = "db.categories.find_by_slug")]
    pub async fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(CategoryIdent::Categories)
            .and_where(Expr::col(CategoryIdent::Slug).eq(slug))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find category by slug")
    }

    #[tracing::instrument(skip_all, name = "db.categories.list")]
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(CategoryIdent::Categories)
            .order_by(CategoryIdent::Name, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list categories")
    }

    /// Deletes the category. Its recipes are left without a category.
    #[tracing::instrument(skip_all, name = "db.categories.delete")]
    pub async fn delete(
        conn: &mut SqliteConnection,
        id: CategoryId,
    ) -> Result<bool, DeleteCategoryError> {
        let (sql, values) = Query::delete()
            .from_table(CategoryIdent::Categories)
            .and_where(Expr::col(CategoryIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(DeleteCategoryError)?;

        Ok(result.rows_affected() > 0)
    }
}

impl UpdateCategory<'_> {
    /// Returns [`None`] if the category does not exist. A taken name
    /// results in an error with [`ErrorCategory::Conflict`](foodie_error::ErrorCategory::Conflict).
    #[tracing::instrument(skip_all, name = "db.categories.update")]
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: CategoryId,
    ) -> Result<Option<Category>, UpdateCategoryError> {
        if self.is_empty() {
            return Category::find(conn, id)
                .await
                .change_context(UpdateCategoryError);
        }

        let mut query = Query::update();
        query.table(CategoryIdent::Categories);
        if let Some(name) = self.name {
            query.value(CategoryIdent::Name, name.trim());
        }
        if let Some(description) = self.description {
            query.value(CategoryIdent::Description, description.trim());
        }

        let (sql, values) = query
            .and_where(Expr::col(CategoryIdent::Id).eq(id.0))
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Category, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UpdateCategoryError)
    }
}

#[derive(Debug, Error)]
#[error("Could not insert category")]
pub struct InsertCategoryError;

impl InsertCategory<'_> {
    /// Inserts a new category. A taken name or slug results in an error
    /// with [`ErrorCategory::Conflict`](foodie_error::ErrorCategory::Conflict).
    #[tracing::instrument(skip_all, name = "db.categories.insert")]
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Category, InsertCategoryError> {
        let (sql, values) = Query::insert()
            .into_table(CategoryIdent::Categories)
            .columns([
                CategoryIdent::Name,
                CategoryIdent::Slug,
                CategoryIdent::Description,
                CategoryIdent::CreatedAt,
            ])
            .values_panic([
                self.name.trim().into(),
                self.slug.into(),
                self.description.into(),
                Utc::now().into(),
            ])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Category, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertCategoryError)
    }
}

impl BlogCategory {
    #[tracing::instrument(skip_all, name = "db.blog_categories.find_by_slug")]
    pub async fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(BlogCategoryIdent::BlogCategories)
            .and_where(Expr::col(BlogCategoryIdent::Slug).eq(slug))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find blog category by slug")
    }

    #[tracing::instrument(skip_all, name = "db.blog_categories.list")]
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(BlogCategoryIdent::BlogCategories)
            .order_by(BlogCategoryIdent::Name, Order::Asc)
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list blog categories")
    }

    #[tracing::instrument(skip_all, name = "db.blog_categories.delete")]
    pub async fn delete(
        conn: &mut SqliteConnection,
        id: BlogCategoryId,
    ) -> Result<bool, DeleteCategoryError> {
        let (sql, values) = Query::delete()
            .from_table(BlogCategoryIdent::BlogCategories)
            .and_where(Expr::col(BlogCategoryIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(DeleteCategoryError)?;

        Ok(result.rows_affected() > 0)
    }
}

impl UpdateBlogCategory<'_> {
    #[tracing::instrument(skip_all, name = "db.blog_categories.update")]
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: BlogCategoryId,
    ) -> Result<Option<BlogCategory>, UpdateCategoryError> {
        let (sql, values) = Query::update()
            .table(BlogCategoryIdent::BlogCategories)
            .value(BlogCategoryIdent::Name, self.name.trim())
            .and_where(Expr::col(BlogCategoryIdent::Id).eq(id.0))
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, BlogCategory, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UpdateCategoryError)
    }
}

#[derive(Debug, Error)]
#[error("Could not insert blog category")]
pub struct InsertBlogCategoryError;

impl InsertBlogCategory<'_> {
    #[tracing::instrument(skip_all, name = "db.blog_categories.insert")]
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<BlogCategory, InsertBlogCategoryError> {
        let (sql, values) = Query::insert()
            .into_table(BlogCategoryIdent::BlogCategories)
            .columns([
                BlogCategoryIdent::Name,
                BlogCategoryIdent::Slug,
                BlogCategoryIdent::CreatedAt,
            ])
            .values_panic([self.name.trim().into(), self.slug.into(), Utc::now().into()])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, BlogCategory, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertBlogCategoryError)
    }
}
