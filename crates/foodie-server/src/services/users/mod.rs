mod activities;
mod change_password;
mod connections;
mod follow;
mod login;
mod profile;
mod register;
mod verify_email;

pub use self::activities::{ListActivities, ListActivitiesResult};
pub use self::change_password::ChangePassword;
pub use self::connections::{Direction, ListConnections, ListConnectionsResult};
pub use self::follow::{FollowUser, UnfollowUser};
pub use self::login::{Login, LoginResult};
pub use self::profile::{GetProfile, UpdateProfile};
pub use self::register::{Register, RegisterResult};
pub use self::verify_email::VerifyEmail;
