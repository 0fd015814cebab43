use chrono::Utc;
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, OnConflict, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::id::UserId;
use crate::user::{InsertUser, UpdateUser, User, UserIdent};

impl User {
    #[tracing::instrument(skip_all, name = "db.users.find")]
    pub async fn find(conn: &mut SqliteConnection, id: UserId) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(UserIdent::Users)
            .and_where(Expr::col(UserIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find user by id")
    }

    /// Finds a user by their email address. Emails are compared
    /// case-insensitively.
    #[tracing::instrument(skip_all, name = "db.users.find_by_email")]
    pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> Result<Option<Self>> {
        let (sql, values) = Query::select()
            .column(Asterisk)
            .from(UserIdent::Users)
            .and_where(Expr::col(UserIdent::Email).eq(email.trim()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .erase_context()
            .attach_printable("could not find user by email")
    }

    #[tracing::instrument(skip_all, name = "db.users.set_password")]
    pub async fn set_password(
        conn: &mut SqliteConnection,
        id: UserId,
        password_hash: &str,
    ) -> Result<()> {
        let (sql, values) = Query::update()
            .table(UserIdent::Users)
            .value(UserIdent::PasswordHash, password_hash)
            .value(UserIdent::UpdatedAt, Utc::now())
            .and_where(Expr::col(UserIdent::Id).eq(id.0))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .erase_context()
            .attach_printable("could not update user password")?;

        Ok(())
    }

    /// Marks the user's email as verified.
    ///
    /// Returns `false` if the user was already verified.
    #[tracing::instrument(skip_all, name = "db.users.mark_verified")]
    pub async fn mark_verified(conn: &mut SqliteConnection, id: UserId) -> Result<bool> {
        let (sql, values) = Query::update()
            .table(UserIdent::Users)
            .value(UserIdent::IsVerified, true)
            .value(UserIdent::UpdatedAt, Utc::now())
            .and_where(Expr::col(UserIdent::Id).eq(id.0))
            .and_where(Expr::col(UserIdent::IsVerified).eq(false))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .erase_context()
            .attach_printable("could not mark user as verified")?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Error)]
#[error("Could not insert user")]
pub struct InsertUserError;

impl InsertUser<'_> {
    /// Inserts a new user.
    ///
    /// Returns [`None`] if the email address is already taken.
    #[tracing::instrument(skip_all, name = "db.users.insert")]
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Option<User>, InsertUserError> {
        let now = Utc::now();
        let (sql, values) = Query::insert()
            .into_table(UserIdent::Users)
            .columns([
                UserIdent::Email,
                UserIdent::PasswordHash,
                UserIdent::FirstName,
                UserIdent::LastName,
                UserIdent::CreatedAt,
                UserIdent::UpdatedAt,
            ])
            .values_panic([
                self.email.trim().into(),
                self.password_hash.into(),
                self.first_name.trim().into(),
                self.last_name.trim().into(),
                now.into(),
                now.into(),
            ])
            .on_conflict(OnConflict::column(UserIdent::Email).do_nothing().to_owned())
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(InsertUserError)
    }
}

#[derive(Debug, Error)]
#[error("Could not update user")]
pub struct UpdateUserError;

impl UpdateUser<'_> {
    #[tracing::instrument(skip_all, name = "db.users.update")]
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<Option<User>, UpdateUserError> {
        let mut query = Query::update();
        query
            .table(UserIdent::Users)
            .value(UserIdent::UpdatedAt, Utc::now())
            .and_where(Expr::col(UserIdent::Id).eq(self.id.0))
            .returning_all();

        if let Some(first_name) = self.first_name {
            query.value(UserIdent::FirstName, first_name.trim());
        }
        if let Some(last_name) = self.last_name {
            query.value(UserIdent::LastName, last_name.trim());
        }
        if let Some(bio) = self.bio {
            query.value(UserIdent::Bio, bio);
        }
        if let Some(location) = self.location {
            query.value(UserIdent::Location, location.trim());
        }
        if let Some(website) = self.website {
            query.value(UserIdent::Website, website.trim());
        }
        if let Some(is_chef) = self.is_chef {
            query.value(UserIdent::IsChef, is_chef);
        }
        if let Some(chef_experience) = self.chef_experience {
            query.value(UserIdent::ChefExperience, chef_experience);
        }
        if let Some(specialties) = self.specialties {
            query.value(UserIdent::Specialties, specialties);
        }

        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, User, _>(&sql, values)
            .fetch_optional(conn)
            .await
            .change_context(UpdateUserError)
    }
}
