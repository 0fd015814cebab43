mod json;
mod params;
mod session_user;

pub use self::json::Json;
pub use self::params::{Path, Query};
pub use self::session_user::SessionUser;
