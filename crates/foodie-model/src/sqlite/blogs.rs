use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{
    Alias, Asterisk, Condition, Expr, Func, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::blog::{Blog, BlogFilter, BlogIdent, BlogView, InsertBlog, UpdateBlog};
use crate::category::BlogCategoryIdent;
use crate::id::BlogId;
use crate::page::Page;
use crate::slug;
use crate::user::UserIdent;

#[derive(Debug, Error)]
#[error("Could not insert blog")]
pub struct InsertBlogError;

#[derive(Debug, Error)]
#[error("Could not update blog")]
pub struct UpdateBlogError;

#[derive(Debug, Error)]
#[error("Could not delete blog")]
pub struct DeleteBlogError;

impl Blog {
    #[tracing::instrument(skip_all, name = "db.blogs.find")]
    pub async fn find(conn: &mut SqliteConnection, id: BlogId) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(BlogIdent::Blogs)
            .and_where(Expr::col(BlogIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find blog by id")
    }

    #[tracing::instrument(skip_all, name = "db.blogs.find_by_slug")]
    pub async fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(BlogIdent::Blogs)
            .and_where(Expr::col(BlogIdent::Slug).eq(slug))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find blog by slug")
    }

    #[tracing::instrument(skip_all, name = "db.blogs.unique_slug")]
    pub async fn unique_slug(conn: &mut SqliteConnection, title: &str) -> Result<String> {
        let base = slug::slugify(title, "blog");
        super::unique_slug(conn, BlogIdent::Blogs, BlogIdent::Slug, &base).await
    }

    #[tracing::instrument(skip_all, name = "db.blogs.delete")]
    pub async fn delete(conn: &mut SqliteConnection, id: BlogId) -> Result<bool, DeleteBlogError> {
        let (sql, values) = Query::delete()
            .from_table(BlogIdent::Blogs)
            .and_where(Expr::col(BlogIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(DeleteBlogError)?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all, name = "db.blogs.increment_views")]
    pub async fn increment_views(conn: &mut SqliteConnection, id: BlogId) -> Result<()> {
        let (sql, values) = Query::update()
            .table(BlogIdent::Blogs)
            .value(BlogIdent::ViewsCount, Expr::col(BlogIdent::ViewsCount).add(1))
            .and_where(Expr::col(BlogIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .erase_context()
            .attach_printable("could not increment blog views")?;

        Ok(())
    }
}

impl InsertBlog<'_> {
    #[tracing::instrument(skip_all, name = "db.blogs.insert")]
    pub async fn insert(&self, conn: &mut SqliteConnection) -> Result<Blog, InsertBlogError> {
        let now = Utc::now();
        let (sql, values) = Query::insert()
            .into_table(BlogIdent::Blogs)
            .columns([
                BlogIdent::AuthorId,
                BlogIdent::CategoryId,
                BlogIdent::Title,
                BlogIdent::Slug,
                BlogIdent::Description,
                BlogIdent::Content,
                BlogIdent::CreatedAt,
                BlogIdent::UpdatedAt,
            ])
            .values_panic([
                self.author_id.0.into(),
                self.category_id.map(|v| v.0).into(),
                self.title.trim().into(),
                self.slug.into(),
                self.description.into(),
                self.content.into(),
                now.into(),
                now.into(),
            ])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Blog, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertBlogError)
    }
}

impl UpdateBlog<'_> {
    #[tracing::instrument(skip_all, name = "db.blogs.update")]
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: BlogId,
    ) -> Result<Option<Blog>, UpdateBlogError> {
        let mut query = Query::update();
        query
            .table(BlogIdent::Blogs)
            .value(BlogIdent::UpdatedAt, Utc::now())
            .and_where(Expr::col(BlogIdent::Id).eq(id.0))
            .returning_all();

        if let Some(category_id) = self.category_id {
            query.value(BlogIdent::CategoryId, category_id.map(|v| v.0));
        }
        if let Some(title) = self.title {
            query.value(BlogIdent::Title, title.trim());
        }
        if let Some(description) = self.description {
            query.value(BlogIdent::Description, description);
        }
        if let Some(content) = self.content {
            query.value(BlogIdent::Content, content);
        }

        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, Blog, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UpdateBlogError)
    }
}

fn blog_view_select() -> SelectStatement {
    let mut select = Query::select();
    select
        .column((BlogIdent::Blogs, Asterisk))
        .expr_as(
            Expr::col((UserIdent::Users, UserIdent::Email)),
            Alias::new("author_email"),
        )
        .expr_as(
            Expr::col((BlogCategoryIdent::BlogCategories, BlogCategoryIdent::Slug)),
            Alias::new("category_slug"),
        )
        .expr_as(
            Expr::col((BlogCategoryIdent::BlogCategories, BlogCategoryIdent::Name)),
            Alias::new("category_name"),
        );

    with_joins(&mut select);
    select
}

fn with_joins(select: &mut SelectStatement) {
    select
        .from(BlogIdent::Blogs)
        .inner_join(
            UserIdent::Users,
            Expr::col((UserIdent::Users, UserIdent::Id))
                .equals((BlogIdent::Blogs, BlogIdent::AuthorId)),
        )
        .left_join(
            BlogCategoryIdent::BlogCategories,
            Expr::col((BlogCategoryIdent::BlogCategories, BlogCategoryIdent::Id))
                .equals((BlogIdent::Blogs, BlogIdent::CategoryId)),
        );
}

impl BlogFilter {
    fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(author_id) = self.author_id {
            cond = cond.add(Expr::col((BlogIdent::Blogs, BlogIdent::AuthorId)).eq(author_id.0));
        }
        if let Some(category) = self.category.as_deref() {
            let slug = Expr::col((BlogCategoryIdent::BlogCategories, BlogCategoryIdent::Slug));
            cond = cond.add(slug.eq(category));
        }
        cond
    }
}

impl BlogView {
    #[tracing::instrument(skip_all, name = "db.blogs.view.find_by_slug")]
    pub async fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> Result<Option<Self>> {
        let (sql, values) = blog_view_select()
            .and_where(Expr::col((BlogIdent::Blogs, BlogIdent::Slug)).eq(slug))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find blog view by slug")
    }

    /// Lists blogs matching `filter`, newest first.
    #[tracing::instrument(skip(conn), name = "db.blogs.view.list")]
    pub async fn list(
        conn: &mut SqliteConnection,
        filter: &BlogFilter,
        page: Page,
    ) -> Result<Vec<Self>> {
        let (sql, values) = blog_view_select()
            .cond_where(filter.condition())
            .order_by((BlogIdent::Blogs, BlogIdent::CreatedAt), Order::Desc)
            .order_by((BlogIdent::Blogs, BlogIdent::Id), Order::Desc)
            .limit(page.limit())
            .offset(page.offset())
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list blogs")
    }

    #[tracing::instrument(skip(conn), name = "db.blogs.view.count")]
    pub async fn count(conn: &mut SqliteConnection, filter: &BlogFilter) -> Result<u64> {
        let mut select = Query::select();
        select.expr(Func::count(Expr::col((BlogIdent::Blogs, BlogIdent::Id))));
        with_joins(&mut select);

        let (sql, values) = select
            .cond_where(filter.condition())
            .build_sqlx(SqliteQueryBuilder);

        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(conn)
            .await
            .erase_context()
            .attach_printable("could not count blogs")?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use crate::blog::{Blog, BlogFilter, BlogView, InsertBlog, UpdateBlog};
    use crate::category::InsertBlogCategory;
    use crate::counter::Counter;
    use crate::page::Page;
    use crate::user::User;
    use foodie_db::Pool;
    use foodie_error::ext::ResultExt;
    use foodie_error::Result;

    #[tokio::test]
    async fn should_list_blogs_by_category() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let tips = InsertBlogCategory::builder()
            .name("Kitchen Tips")
            .slug("kitchen-tips")
            .build()
            .insert(&mut conn)
            .await
            .erase_context()?;

        for (title, category_id) in [("Knife Care", Some(tips.id)), ("My Story", None)] {
            let slug = Blog::unique_slug(&mut conn, title).await?;
            InsertBlog::builder()
                .author_id(alice.id)
                .maybe_category_id(category_id)
                .title(title)
                .slug(&slug)
                .description("About cooking.")
                .content("Lorem ipsum.")
                .build()
                .insert(&mut conn)
                .await
                .erase_context()?;
        }

        let filter = BlogFilter {
            category: Some("kitchen-tips".into()),
            ..Default::default()
        };
        let blogs = BlogView::list(&mut conn, &filter, Page::default()).await?;
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].blog.slug, "knife-care");
        assert_eq!(blogs[0].category_name.as_deref(), Some("Kitchen Tips"));

        let all = BlogFilter::default();
        assert_eq!(BlogView::count(&mut conn, &all).await?, 2);

        Counter::refresh_user(&mut conn, alice.id).await.erase_context()?;
        let alice = User::find(&mut conn, alice.id).await?.unwrap();
        assert_eq!(alice.blogs_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn should_update_and_delete_blog() -> Result<()> {
        let pool = Pool::build_for_tests(&crate::DB_MIGRATIONS).await.erase_context()?;
        let mut conn = pool.acquire().await.erase_context()?;

        let alice = crate::test_utils::insert_user(&mut conn, "alice@example.com").await;
        let blog = InsertBlog::builder()
            .author_id(alice.id)
            .title("Draft Thoughts")
            .slug("draft-thoughts")
            .description("Short.")
            .content("Long.")
            .build()
            .insert(&mut conn)
            .await
            .erase_context()?;

        let updated = UpdateBlog::builder()
            .content("Longer.")
            .build()
            .update(&mut conn, blog.id)
            .await
            .erase_context()?
            .unwrap();
        assert_eq!(updated.content, "Longer.");
        assert_eq!(updated.title, "Draft Thoughts");

        Blog::increment_views(&mut conn, blog.id).await?;
        let found = BlogView::find_by_slug(&mut conn, "draft-thoughts").await?.unwrap();
        assert_eq!(found.blog.views_count, 1);

        assert!(Blog::delete(&mut conn, blog.id).await.erase_context()?);
        assert!(Blog::find(&mut conn, blog.id).await?.is_none());

        Ok(())
    }
}
