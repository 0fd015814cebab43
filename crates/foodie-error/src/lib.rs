mod error;
mod fmt;

pub mod api;
pub mod ext;
pub mod hooks;

pub use self::api::{ApiError, ErrorCategory, ErrorCategory as ApiErrorCategory};
pub use self::error::{Error, NoContext};

pub type Result<T, C = NoContext> = std::result::Result<T, Error<C>>;
