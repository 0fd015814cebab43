use foodie_model::blog::BlogView;

use super::users::UserSessionData;
use crate::services::blogs::CreateBlog;
use crate::App;

#[bon::builder]
#[tracing::instrument(skip(app, author), name = "test_utils.blogs.create")]
pub async fn create(app: &App, author: &UserSessionData, title: &str) -> BlogView {
    CreateBlog {
        title,
        description: "Notes from the kitchen.",
        content: "Once upon a time there was a pot of rice.",
        category: None,
    }
    .perform(app, &author.get_session_user(app).await)
    .await
    .unwrap()
}
