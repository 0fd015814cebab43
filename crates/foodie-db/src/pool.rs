use foodie_error::ext::ResultExt;
use foodie_error::{ErrorCategory, Result};
use sqlx::migrate::Migrator;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::Sqlite;
use std::str::FromStr;
use tracing::{debug, trace};

use crate::error::{AcquireError, BeginTransactError, MigrateError, PoolError};
use crate::Transaction;

/// Pooled SQLite connection.
pub type Connection = PoolConnection<Sqlite>;

/// A SQLite database connection pool.
#[derive(Clone)]
pub struct Pool {
    inner: sqlx::SqlitePool,
}

impl Pool {
    /// Builds a database pool from the configuration.
    ///
    /// Connections are established lazily, use [`Pool::wait_until_healthy`]
    /// to check whether the database is reachable.
    ///
    /// In-memory databases live as long as their connection, so the pool is
    /// limited to one connection that never expires.
    pub fn build(config: &foodie_config::Database) -> Result<Self, PoolError> {
        crate::install_error_hooks();

        let url = config.url.as_str();
        let connect_opts = SqliteConnectOptions::from_str(url)
            .change_context(PoolError)
            .attach_printable("invalid SQLite connection url")?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_opts = SqlitePoolOptions::new().acquire_timeout(config.timeout());
        let connect_opts = if is_in_memory(url) {
            pool_opts = pool_opts
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);

            connect_opts
        } else {
            pool_opts = pool_opts.max_connections(config.max_connections.get());
            if let Some(min) = config.min_connections {
                pool_opts = pool_opts.min_connections(min);
            }
            connect_opts.journal_mode(SqliteJournalMode::Wal)
        };

        Ok(Self {
            inner: pool_opts.connect_lazy_with(connect_opts),
        })
    }

    /// Builds an in-memory database pool with all migrations applied.
    pub async fn build_for_tests(migrator: &Migrator) -> Result<Self, PoolError> {
        let pool = Self::build(&foodie_config::Database::for_tests())?;
        pool.migrate(migrator).await.change_context(PoolError)?;
        Ok(pool)
    }
}

impl Pool {
    /// Gets the amount of open connections of the pool.
    #[must_use]
    pub fn connections(&self) -> u32 {
        self.inner.size()
    }

    /// Obtains a connection from the pool.
    #[tracing::instrument(skip_all, name = "db.acquire")]
    pub async fn acquire(&self) -> Result<Connection, AcquireError> {
        trace!("acquiring database connection...");
        self.inner
            .acquire()
            .await
            .change_context(AcquireError)
    }

    /// Starts a database transaction. It is rolled back once dropped
    /// unless [`Transaction::commit`] is called.
    #[tracing::instrument(skip_all, name = "db.begin")]
    pub async fn begin(&self) -> Result<Transaction, BeginTransactError> {
        trace!("beginning database transaction...");
        let inner = self
            .inner
            .begin()
            .await
            .change_context(BeginTransactError)?;

        Ok(Transaction::new(inner))
    }

    /// Waits until a connection can be established or the acquire
    /// timeout of the pool passes.
    #[tracing::instrument(skip_all, name = "db.wait_until_healthy")]
    pub async fn wait_until_healthy(&self) -> Result<(), AcquireError> {
        let conn = self.acquire().await.category(ErrorCategory::Outage)?;
        drop(conn);
        Ok(())
    }

    /// Applies pending migrations.
    #[tracing::instrument(skip_all, name = "db.migrate")]
    pub async fn migrate(&self, migrator: &Migrator) -> Result<(), MigrateError> {
        debug!("running database migrations...");
        migrator
            .run(&self.inner)
            .await
            .change_context(MigrateError)?;

        debug!("database migrations are up to date");
        Ok(())
    }

    /// Closes every connection of the pool.
    pub async fn close(&self) {
        self.inner.close().await;
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("connections", &self.connections())
            .finish_non_exhaustive()
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_detect_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://foodie?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://foodie.db"));
    }

    #[tokio::test]
    async fn should_commit_and_rollback_transactions() {
        let pool = Pool::build(&foodie_config::Database::for_tests()).unwrap();

        let mut conn = pool.acquire().await.unwrap();
        sqlx::query("CREATE TABLE notes (body TEXT NOT NULL)")
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        let mut tx = pool.begin().await.unwrap();
        sqlx::query("INSERT INTO notes VALUES ('kept')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        sqlx::query("INSERT INTO notes VALUES ('dropped')")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx.rollback().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&mut *conn)
            .await
            .unwrap();

        assert_eq!(count, 1);
    }
}
