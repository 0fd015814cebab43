mod figment_ext;

pub mod auth;
pub mod database;
pub mod logging;
pub mod maintenance;
pub mod server;
pub mod vars;

pub use self::auth::Auth;
pub use self::database::Database;
pub use self::logging::{Logging, LoggingStyle};
pub use self::maintenance::Maintenance;
pub use self::server::Server;
