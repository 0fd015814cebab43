mod app;

pub mod auth;
pub mod extract;
pub mod headers;
pub mod maintenance;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;

mod server;

#[cfg(test)]
pub(crate) mod test_utils;

pub use self::app::{App, AppError};
pub use self::routes::build_axum_router;
pub use self::server::{run, StartServerError};
