use foodie_db::SqliteConnection;
use foodie_error::{ApiError, ApiErrorCategory};
use foodie_model::activity::{self, ActivityType, InsertUserActivity, ObjectType};
use foodie_model::reaction::{Reaction, ReactionTarget};
use foodie_model::User;

fn activity_type(target: ReactionTarget, reaction: Reaction, active: bool) -> ActivityType {
    match (target, reaction, active) {
        (ReactionTarget::Recipe(..), Reaction::Like, true) => ActivityType::RecipeLiked,
        (ReactionTarget::Recipe(..), Reaction::Like, false) => ActivityType::RecipeUnliked,
        (ReactionTarget::Recipe(..), Reaction::Save, true) => ActivityType::RecipeSaved,
        (ReactionTarget::Recipe(..), Reaction::Save, false) => ActivityType::RecipeUnsaved,
        (ReactionTarget::Blog(..), Reaction::Like, true) => ActivityType::BlogLiked,
        (ReactionTarget::Blog(..), Reaction::Like, false) => ActivityType::BlogUnliked,
        (ReactionTarget::Blog(..), Reaction::Save, true) => ActivityType::BlogSaved,
        (ReactionTarget::Blog(..), Reaction::Save, false) => ActivityType::BlogUnsaved,
    }
}

fn verb(reaction: Reaction, active: bool) -> &'static str {
    match (reaction, active) {
        (Reaction::Like, true) => "liked",
        (Reaction::Like, false) => "unliked",
        (Reaction::Save, true) => "saved",
        (Reaction::Save, false) => "unsaved",
    }
}

fn object(target: ReactionTarget) -> (ObjectType, i64, &'static str) {
    match target {
        ReactionTarget::Recipe(id) => (ObjectType::Recipe, id.0, "recipe"),
        ReactionTarget::Blog(id) => (ObjectType::Blog, id.0, "blog"),
    }
}

/// Adds (`active`) or removes a like or save of `user` on `target`, then
/// refreshes the target's counter and logs the action.
///
/// Returns the refreshed counter value.
pub async fn apply(
    conn: &mut SqliteConnection,
    user: &User,
    reaction: Reaction,
    target: ReactionTarget,
    active: bool,
    title: &str,
) -> Result<i64, ApiError> {
    let (object_type, object_id, object_name) = object(target);
    let changed = if active {
        reaction.add(conn, user.id, target).await?
    } else {
        reaction.remove(conn, user.id, target).await?
    };

    if !changed {
        let message = match (reaction, active) {
            (Reaction::Like, true) => format!("You have already liked this {object_name}"),
            (Reaction::Like, false) => format!("You have not liked this {object_name}"),
            (Reaction::Save, true) => format!("You have already saved this {object_name}"),
            (Reaction::Save, false) => format!("You have not saved this {object_name}"),
        };
        return Err(ApiError::new(ApiErrorCategory::InvalidRequest).message(message));
    }

    let count = target
        .counter(reaction)
        .refresh(conn)
        .await?
        .unwrap_or_default();

    InsertUserActivity::builder()
        .user_id(user.id)
        .activity_type(activity_type(target, reaction, active))
        .description(activity::describe(
            &user.email,
            verb(reaction, active),
            object_name,
            title,
        ))
        .related_object((object_type, object_id))
        .build()
        .insert(conn)
        .await?;

    Ok(count)
}
