use axum::extract::{FromRequestParts, State};
use foodie_db::error::{AcquireError, BeginTransactError, MigrateError};
use foodie_db::{Connection, Pool, Transaction};
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

use self::private::AppInner;

mod private;

#[derive(Clone, FromRequestParts)]
#[from_request(via(State))]
#[must_use]
pub struct App(Arc<AppInner>);

#[derive(Debug, Error)]
#[error("Could not initialize server application")]
pub struct AppError;

impl App {
    pub fn new(config: foodie_config::Server) -> Result<Self, AppError> {
        let db = Pool::build(&config.database)
            .change_context(AppError)
            .attach_printable("could not setup database pool")?;

        Ok(Self::with_pool(config, db))
    }

    /// Creates a new [`App`] backed by a fresh in-memory database
    /// with all migrations applied.
    #[cfg(test)]
    pub async fn new_for_tests() -> Self {
        let db = Pool::build_for_tests(&foodie_model::DB_MIGRATIONS)
            .await
            .expect("could not build test database pool");

        Self::with_pool(foodie_config::Server::for_tests(), db)
    }

    fn with_pool(config: foodie_config::Server, db: Pool) -> Self {
        let secret = config.auth.jwt_secret.as_str().as_bytes();
        let jwt_encode = EncodingKey::from_secret(secret);
        let jwt_decode = DecodingKey::from_secret(secret);

        Self(Arc::new(AppInner {
            config: Arc::new(config),
            db,
            jwt_encode,
            jwt_decode,
        }))
    }
}

impl App {
    /// Starts a database transaction. Dropping it without committing
    /// rolls back every change made through it.
    #[tracing::instrument(skip_all, name = "app.db_write")]
    pub async fn db_write(&self) -> Result<Transaction, BeginTransactError> {
        trace!("obtaining db transaction...");
        self.db.begin().await
    }

    /// Obtains a database connection meant for reading.
    #[tracing::instrument(skip_all, name = "app.db_read")]
    pub async fn db_read(&self) -> Result<Connection, AcquireError> {
        trace!("obtaining db connection...");
        self.db.acquire().await
    }

    #[tracing::instrument(skip_all, name = "app.migrate")]
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        self.db.migrate(&foodie_model::DB_MIGRATIONS).await
    }

    pub async fn wait_until_healthy(&self) -> Result<(), AcquireError> {
        self.db.wait_until_healthy().await
    }

    /// Closes every database connection. Used when the server shuts down.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl std::ops::Deref for App {
    type Target = AppInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
