use thiserror::Error;

#[derive(Debug, Error)]
#[error("Could not build database pool")]
pub struct PoolError;

#[derive(Debug, Error)]
#[error("Could not acquire database connection")]
pub struct AcquireError;

#[derive(Debug, Error)]
#[error("Could not begin database transaction")]
pub struct BeginTransactError;

#[derive(Debug, Error)]
#[error("Could not commit database transaction")]
pub struct CommitTransactError;

#[derive(Debug, Error)]
#[error("Could not rollback database transaction")]
pub struct RollbackTransactError;

#[derive(Debug, Error)]
#[error("Could not run database migrations")]
pub struct MigrateError;
