use axum::http::header;
use axum_test::TestServer;
use foodie_model::id::UserId;
use foodie_model::User;
use foodie_utils::Sensitive;

use crate::extract::SessionUser;
use crate::App;

pub const DEFAULT_PASSWORD: &str = "correct-horse-battery";

pub struct UserSessionData {
    pub user: User,
    /// User's login token
    pub token: String,
}

impl UserSessionData {
    /// Gets the [`SessionUser`] extractor.
    #[tracing::instrument(skip_all, name = "test_utils.users.get_session_user", fields(
        user.id = %self.user.id,
    ))]
    pub async fn get_session_user(&self, app: &App) -> SessionUser {
        SessionUser::from_db(&mut app.db_read().await.unwrap(), self.user.id)
            .await
            .unwrap()
    }
}

/// Registers a user and lets every following request of `server`
/// be made as that user.
#[bon::builder]
#[tracing::instrument(skip(app, server), name = "test_utils.users.override_credentials")]
pub async fn override_credentials(
    app: &App,
    server: &mut TestServer,
    email: &str,
) -> UserSessionData {
    let session = start_session().app(app).email(email).call().await;
    server.add_header(header::AUTHORIZATION, format!("Bearer {}", session.token));
    session
}

#[bon::builder]
#[tracing::instrument(skip(app), name = "test_utils.users.start_session")]
pub async fn start_session(app: &App, email: &str) -> UserSessionData {
    register().app(app).email(email).call().await;

    let response = crate::services::users::Login {
        email: Sensitive::new(email),
        password: Sensitive::new(DEFAULT_PASSWORD),
    }
    .perform(app)
    .await
    .unwrap();

    UserSessionData {
        user: response.user,
        token: response.token,
    }
}

#[bon::builder]
#[tracing::instrument(skip(app), name = "test_utils.users.register")]
pub async fn register(app: &App, email: &str, password: Option<&str>) -> User {
    let password = password.unwrap_or(DEFAULT_PASSWORD);
    let response = crate::services::users::Register {
        email: Sensitive::new(email),
        password: Sensitive::new(password),
        confirm_password: Sensitive::new(password),
        first_name: "Test",
        last_name: "User",
    }
    .perform(app)
    .await
    .unwrap();

    response.user
}

/// Loads the current state of a user, counters included.
pub async fn find(app: &App, id: UserId) -> User {
    let mut conn = app.db_read().await.unwrap();
    User::find(&mut conn, id).await.unwrap().unwrap()
}
