use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{extractors::AuthUser, repo::User},
    error::{ApiError, FieldError},
    state::AppState,
};

use super::dto::CreatePost;
use super::repo::Post;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/post", get(list_posts).post(create_post))
        .route("/post/:id", get(get_post).delete(delete_post))
}

const POST_NOT_FOUND: &str = "post not found";

/// Malformed ids get the same 400 as unknown ones, so the route never leaks
/// which ids parse.
fn parse_post_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse::<Uuid>()
        .map_err(|_| ApiError::bad_request(POST_NOT_FOUND))
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = Post::list_all(&state.db).await?;
    Ok(Json(posts))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePost>,
) -> Result<Json<Post>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "text",
            "text is required",
        )]));
    }

    // Snapshot the author's name and avatar onto the post.
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::bad_request("user not found"))?;

    let post = Post::create(&state.db, user_id, payload.text.trim(), &user.name, &user.avatar).await?;
    info!(user_id = %user_id, post_id = %post.id, "post created");
    Ok(Json(post))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let id = parse_post_id(&id)?;
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::bad_request(POST_NOT_FOUND))?;
    Ok(Json(post))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_post_id(&id)?;
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::bad_request(POST_NOT_FOUND))?;

    if !post.is_owned_by(user_id) {
        warn!(user_id = %user_id, post_id = %id, "delete refused, not the owner");
        return Err(ApiError::bad_request("user not authorized"));
    }

    Post::delete(&state.db, id).await?;
    info!(user_id = %user_id, post_id = %id, "post deleted");
    Ok(Json(serde_json::json!({ "msg": "post removed" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_maps_to_not_found() {
        let err = parse_post_id("definitely-not-a-uuid").unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, POST_NOT_FOUND),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn well_formed_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_post_id(&id.to_string()).unwrap(), id);
    }
}
