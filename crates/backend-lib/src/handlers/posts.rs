// ============================
// crates/backend-lib/src/handlers/posts.rs
// ============================
//! Feed endpoints.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use postboard_common::{MessageResponse, PostId, PostInput, PostListResponse, PostResponse};
use std::sync::Arc;

use super::ValidJson;
use crate::error::AppError;
use crate::middleware::AuthSession;
use crate::storage::Storage;
use crate::AppState;

/// Ids that do not parse cannot name an existing post
fn parse_post_id(raw: &str) -> Result<PostId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Post not found".to_string()))
}

/// `GET /api/posts`
pub async fn list<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<PostListResponse>, AppError> {
    let posts = state.posts.list().await?;
    Ok(Json(PostListResponse { posts }))
}

/// `POST /api/posts`
pub async fn create<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<AuthSession>,
    ValidJson(input): ValidJson<PostInput>,
) -> Result<impl IntoResponse, AppError> {
    let post = state.posts.create(session.user_id, &input.content).await?;
    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}

/// `PUT /api/posts/{id}`
pub async fn update<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<PostInput>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = parse_post_id(&id)?;
    let post = state
        .posts
        .update(session.user_id, post_id, &input.content)
        .await?;
    Ok(Json(PostResponse {
        message: "Post updated successfully".to_string(),
        post,
    }))
}

/// `DELETE /api/posts/{id}`
pub async fn remove<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let post_id = parse_post_id(&id)?;
    state.posts.delete(session.user_id, post_id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
