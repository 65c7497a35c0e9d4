// ============================
// crates/backend-lib/src/handlers/users.rs
// ============================
//! Registration, login, logout and current-user endpoints.
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use postboard_common::{Credentials, MessageResponse, UserResponse};
use std::sync::Arc;
use zeroize::Zeroizing;

use super::ValidJson;
use crate::error::AppError;
use crate::middleware::AuthSession;
use crate::storage::Storage;
use crate::AppState;

/// `POST /api/users/register`
pub async fn register<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidJson(Credentials { email, password }): ValidJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let password = Zeroizing::new(password);
    let outcome = state.auth.register(&email, &password).await?;
    let cookie = state.cookies.issue(&outcome.session.session_id)?;

    let body = UserResponse {
        message: Some("User registered successfully".to_string()),
        user: outcome.user,
    };
    Ok((StatusCode::CREATED, [(SET_COOKIE, cookie)], Json(body)))
}

/// `POST /api/users/login`
pub async fn login<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ValidJson(Credentials { email, password }): ValidJson<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let password = Zeroizing::new(password);
    let outcome = state.auth.login(&email, &password).await?;
    let cookie = state.cookies.issue(&outcome.session.session_id)?;

    let body = UserResponse {
        message: Some("Logged in successfully".to_string()),
        user: outcome.user,
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// `POST /api/users/logout`
pub async fn logout<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<AuthSession>,
) -> Result<impl IntoResponse, AppError> {
    state.auth.logout(&session.session_id).await?;
    tracing::info!(user_id = %session.user_id, "user logged out");

    let cookie = state.cookies.clear()?;
    Ok((
        [(SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out successfully")),
    ))
}

/// `GET /api/users/me`
pub async fn me<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.auth.current_user(&session.session_id).await?;
    Ok(Json(UserResponse {
        message: None,
        user,
    }))
}
