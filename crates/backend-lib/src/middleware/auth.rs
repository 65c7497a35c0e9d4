use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use postboard_common::UserId;
use std::sync::Arc;

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// The authenticated caller, inserted as a request extension by
/// [`require_authenticated`]
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: UserId,
    pub session_id: String,
}

/// Reject requests without a live session with 401
pub async fn require_authenticated<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = state
        .cookies
        .extract(request.headers())
        .ok_or(AppError::NotAuthenticated)?
        .to_string();

    let user_id = state
        .sessions
        .resolve(&session_id)
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    request.extensions_mut().insert(AuthSession {
        user_id,
        session_id,
    });

    Ok(next.run(request).await)
}
