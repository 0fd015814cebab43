pub mod error;
pub mod pool;
pub mod transaction;

pub use self::pool::{Connection, Pool};
pub use self::transaction::Transaction;

pub use sqlx::migrate::Migrator;
pub use sqlx::SqliteConnection;

/// Teaches [`foodie_error`] which category an [`sqlx::Error`] belongs to
/// whenever it gets wrapped into an error report.
///
/// It is safe to call this function more than once.
pub fn install_error_hooks() {
    use foodie_error::ErrorCategory;
    use std::sync::Once;

    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        foodie_error::hooks::install::<sqlx::Error>(|error| match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(..) => {
                Some(ErrorCategory::Outage)
            }
            sqlx::Error::Database(error) if error.is_unique_violation() => {
                Some(ErrorCategory::Conflict)
            }
            _ => None,
        });
    });
}
