use chrono::{DateTime, Utc};
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sea_query::{Asterisk, Expr, Func, Order, Query, SqliteQueryBuilder};
use sea_query_binder::SqlxBinder;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::activity::{InsertUserActivity, UserActivity, UserActivityIdent};
use crate::id::{ActivityId, UserId};

#[derive(Debug, Error)]
#[error("Could not record user activity")]
pub struct InsertActivityError;

#[derive(Debug, Error)]
#[error("Could not purge user activities")]
pub struct PurgeActivitiesError;

impl InsertUserActivity {
    #[tracing::instrument(skip_all, name = "db.user_activities.insert")]
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<UserActivity, InsertActivityError> {
        let (object_type, object_id) = self.related_object.unzip();
        let (sql, values) = Query::insert()
            .into_table(UserActivityIdent::UserActivities)
            .columns([
                UserActivityIdent::UserId,
                UserActivityIdent::ActivityType,
                UserActivityIdent::Description,
                UserActivityIdent::RelatedObjectId,
                UserActivityIdent::RelatedObjectType,
                UserActivityIdent::CreatedAt,
            ])
            .values_panic([
                self.user_id.0.into(),
                self.activity_type.as_str().into(),
                self.description.as_str().into(),
                object_id.into(),
                object_type.map(|v| v.as_str()).into(),
                Utc::now().into(),
            ])
            .returning_all()
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_as_with::<_, UserActivity, _>(&sql, values)
            .fetch_one(conn)
            .await
            .change_context(InsertActivityError)
            .attach_printable_lazy(|| format!("activity type = {}", self.activity_type))
    }
}

impl UserActivity {
    /// Lists activities of a user, most recent first.
    ///
    /// Pass the id of the last activity of the previous batch as `before`
    /// to continue where it left off.
    #[tracing::instrument(skip(conn), name = "db.user_activities.list_for_user")]
    pub async fn list_for_user(
        conn: &mut SqliteConnection,
        user_id: UserId,
        before: Option<ActivityId>,
        limit: u64,
    ) -> Result<Vec<Self>> {
        let mut query = Query::select();
        query
            .column(Asterisk)
            .from(UserActivityIdent::UserActivities)
            .and_where(Expr::col(UserActivityIdent::UserId).eq(user_id.0))
            .order_by(UserActivityIdent::Id, Order::Desc)
            .limit(limit);

        if let Some(before) = before {
            query.and_where(Expr::col(UserActivityIdent::Id).lt(before.0));
        }

        let (sql, values) = query.build_sqlx(SqliteQueryBuilder);
        sqlx::query_as_with::<_, Self, _>(&sql, values)
            .fetch_all(conn)
            .await
            .erase_context()
            .attach_printable("could not list user activities")
    }

    #[tracing::instrument(skip(conn), name = "db.user_activities.count_for_user")]
    pub async fn count_for_user(conn: &mut SqliteConnection, user_id: UserId) -> Result<u64> {
        let (sql, values) = Query::select()
            .expr(Func::count(Expr::col(Asterisk)))
            .from(UserActivityIdent::UserActivities)
            .and_where(Expr::col(UserActivityIdent::UserId).eq(user_id.0))
            .build_sqlx(SqliteQueryBuilder);

        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(conn)
            .await
            .erase_context()
            .attach_printable("could not count user activities")?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Deletes every activity created before `cutoff`.
    ///
    /// Returns the amount of deleted activities.
    #[tracing::instrument(skip(conn), name = "db.user_activities.purge_older_than")]
    pub async fn purge_older_than(
        conn: &mut SqliteConnection,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, PurgeActivitiesError> {
        let (sql, values) = Query::delete()
            .from_table(UserActivityIdent::UserActivities)
            .and_where(Expr::col(UserActivityIdent::CreatedAt).lt(cutoff))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values)
            .execute(conn)
            .await
            .change_context(PurgeActivitiesError)?;

        Ok(result.rows_affected())
    }
}
