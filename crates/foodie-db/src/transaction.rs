use foodie_error::ext::ResultExt;
use foodie_error::Result;
use sqlx::{Sqlite, SqliteConnection};
use tracing::trace;

use crate::error::{CommitTransactError, RollbackTransactError};

/// An active database transaction.
///
/// Dropping it without calling [`Transaction::commit`] rolls back
/// every change made within it.
pub struct Transaction {
    inner: sqlx::Transaction<'static, Sqlite>,
}

impl Transaction {
    pub(crate) fn new(inner: sqlx::Transaction<'static, Sqlite>) -> Self {
        Self { inner }
    }

    #[tracing::instrument(skip_all, name = "db.transaction.commit")]
    pub async fn commit(self) -> Result<(), CommitTransactError> {
        trace!("commiting transaction...");
        self.inner.commit().await.change_context(CommitTransactError)?;

        trace!("commiting done");
        Ok(())
    }

    #[tracing::instrument(skip_all, name = "db.transaction.rollback")]
    pub async fn rollback(self) -> Result<(), RollbackTransactError> {
        self.inner
            .rollback()
            .await
            .change_context(RollbackTransactError)
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}

impl std::ops::Deref for Transaction {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for Transaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
