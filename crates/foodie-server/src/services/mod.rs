pub mod blogs;
pub mod categories;
pub mod recipes;
pub mod users;
pub mod util;

mod reactions;
