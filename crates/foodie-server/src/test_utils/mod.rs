use axum_test::TestServer;
use foodie_error::ApiError;
use std::fmt::Debug;

use crate::App;

pub mod blogs;
pub mod recipes;
pub mod users;

pub trait TestResultExt {
    /// Serializes the [`ApiError`] of a result into [`serde_json::Value`]
    /// so it can be compared with `assert_json_include!`.
    ///
    /// ## Panics
    /// It will panic if the result is [`Ok`].
    fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for std::result::Result<T, ApiError> {
    fn expect_error_json(self) -> serde_json::Value {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => serde_json::to_value(error).unwrap(),
        }
    }
}

/// Builds a [`TestServer`] serving the whole API of `app`.
pub fn build_test_server(app: &App) -> TestServer {
    let router = crate::build_axum_router(app.clone());
    TestServer::new(router).expect("could not build test server")
}
