use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Alias, Asterisk, Expr, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::comment::{
    BlogComment, BlogCommentIdent, BlogCommentView, InsertBlogComment, InsertRecipeComment,
    RecipeComment, RecipeCommentIdent, RecipeCommentView,
};
use crate::id::{BlogCommentId, BlogId, RecipeCommentId, RecipeId};
use crate::page::Page;
use crate::user::UserIdent;

#[derive(Debug, Error)]
#[error("Could not insert comment")]
pub struct InsertCommentError;

#[derive(Debug, Error)]
#[error("Could not update comment")]
pub struct UpdateCommentError;

#[derive(Debug, Error)]
#[error("Could not delete comment")]
pub struct DeleteCommentError;

impl InsertRecipeComment<'_> {
    #[tracing::instrument(skip_all, name = "db.recipe_comments.insert")]
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<RecipeComment, InsertCommentError> {
        let (sql, values) = Query::insert()
            .into_table(RecipeCommentIdent::RecipeComments)
            .columns([
                RecipeCommentIdent::UserId,
                RecipeCommentIdent::RecipeId,
                RecipeCommentIdent::ParentId,
                RecipeCommentIdent::Content,
                RecipeCommentIdent::CreatedAt,
            ])
            .values_panic([
                self.user_id.0.into(),
                self.recipe_id.0.into(),
                self.parent_id.map(|v| v.0).into(),
                self.content.trim().into(),
                Utc::now().into(),
            ])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, RecipeComment, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertCommentError)
    }
}

impl RecipeComment {
    #[tracing::instrument(skip_all, name = "db.recipe_comments.find")]
    pub async fn find(conn: &mut SqliteConnection, id: RecipeCommentId) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(RecipeCommentIdent::RecipeComments)
            .and_where(Expr::col(RecipeCommentIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find recipe comment by id")
    }

    /// Deletes the comment together with its replies.
    ///
    /// Returns `false` if the comment does not exist.
    #[tracing::instrument(skip_all, name = "db.recipe_comments.delete")]
    pub async fn delete(
        conn: &mut SqliteConnection,
        id: RecipeCommentId,
    ) -> Result<bool, DeleteCommentError> {
        let (sql, values) = Query::delete()
            .from_table(RecipeCommentIdent::RecipeComments)
            .and_where(Expr::col(RecipeCommentIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(DeleteCommentError)?;

        Ok(result.rows_affected() > 0)
    }
}

impl RecipeCommentView {
    /// Lists the comments of a recipe in the order they were written.
    #[tracing::instrument(skip_all, name = "db.recipe_comments.list_for_recipe")]
    pub async fn list_for_recipe(
        conn: &mut SqliteConnection,
        recipe_id: RecipeId,
        page: Page,
    ) -> Result<Vec<Self>> {
        use RecipeCommentIdent as C;

        let (sql, values) = Query::select()
            .column((C::RecipeComments, Asterisk))
            .expr_as(
                Expr::col((UserIdent::Users, UserIdent::Email)),
                Alias::new("author_email"),
            )
            .from(C::RecipeComments)
            .inner_join(
                UserIdent::Users,
                Expr::col((UserIdent::Users, UserIdent::Id)).equals((C::RecipeComments, C::UserId)),
            )
            .and_where(Expr::col((C::RecipeComments, C::RecipeId)).eq(recipe_id.0))
            .order_by((C::RecipeComments, C::Id), Order::Asc)
            .limit(page.limit())
            .offset(page.offset())
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list comments of recipe")
    }
}

impl InsertBlogComment<'_> {
    #[tracing::instrument(skip_all, name = "db.blog_comments.insert")]
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<BlogComment, InsertCommentError> {
        let (sql, values) = Query::insert()
            .into_table(BlogCommentIdent::BlogComments)
            .columns([
                BlogCommentIdent::UserId,
                BlogCommentIdent::BlogId,
                BlogCommentIdent::Content,
                BlogCommentIdent::CreatedAt,
            ])
            .values_panic([
                self.user_id.0.into(),
                self.blog_id.0.into(),
                self.content.trim().into(),
                Utc::now().into(),
            ])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, BlogComment, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertCommentError)
    }
}

impl BlogComment {
    #[tracing::instrument(skip_all, name = "db.blog_comments.find")]
    pub async fn find(conn: &mut SqliteConnection, id: BlogCommentId) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(BlogCommentIdent::BlogComments)
            .and_where(Expr::col(BlogCommentIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find blog comment by id")
    }

    /// Returns [`None`] if the comment does not exist.
    #[tracing::instrument(skip_all, name = "db.blog_comments.update_content")]
    pub async fn update_content(
        conn: &mut SqliteConnection,
        id: BlogCommentId,
        content: &str,
    ) -> Result<Option<Self>, UpdateCommentError> {
        let (sql, values) = Query::update()
            .table(BlogCommentIdent::BlogComments)
            .value(BlogCommentIdent::Content, content.trim())
            .and_where(Expr::col(BlogCommentIdent::Id).eq(id.0))
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UpdateCommentError)
    }

    #[tracing::instrument(skip_all, name = "db.blog_comments.delete")]
    pub async fn delete(
        conn: &mut SqliteConnection,
        id: BlogCommentId,
    ) -> Result<bool, DeleteCommentError> {
        let (sql, values) = Query::delete()
            .from_table(BlogCommentIdent::BlogComments)
            .and_where(Expr::col(BlogCommentIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(DeleteCommentError)?;

        Ok(result.rows_affected() > 0)
    }
}

impl BlogCommentView {
    #[tracing::instrument(skip_all, name = "db.blog_comments.list_for_blog")]
    pub async fn list_for_blog(
        conn: &mut SqliteConnection,
        blog_id: BlogId,
        page: Page,
    ) -> Result<Vec<Self>> {
        use BlogCommentIdent as C;

        let (sql, values) = Query::select()
            .column((C::BlogComments, Asterisk))
            .expr_as(
                Expr::col((UserIdent::Users, UserIdent::Email)),
                Alias::new("author_email"),
            )
            .from(C::BlogComments)
            .inner_join(
                UserIdent::Users,
                Expr::col((UserIdent::Users, UserIdent::Id)).equals((C::BlogComments, C::UserId)),
            )
            .and_where(Expr::col((C::BlogComments, C::BlogId)).eq(blog_id.0))
            .order_by((C::BlogComments, C::Id), Order::Asc)
            .limit(page.limit())
            .offset(page.offset())
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list comments of blog")
    }
}
