// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::handlers::{posts, system, users};
use crate::middleware::require_authenticated;
use crate::storage::Storage;
use crate::AppState;

/// Create the application router
pub fn create_router<S: Storage + 'static>(state: Arc<AppState<S>>) -> Router {
    let gated = Router::new()
        .route("/api/users/logout", post(users::logout::<S>))
        .route("/api/users/me", get(users::me::<S>))
        .route("/api/posts", post(posts::create::<S>))
        .route(
            "/api/posts/{id}",
            put(posts::update::<S>).delete(posts::remove::<S>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_authenticated::<S>));

    let public = Router::new()
        .route("/", get(system::index))
        .route("/health", get(system::health::<S>))
        .route("/api/users/register", post(users::register::<S>))
        .route("/api/users/login", post(users::login::<S>))
        .route("/api/posts", get(posts::list::<S>));

    public
        .merge(gated)
        .layer(cors_layer(&state.settings))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the single web client origin, with credentials
fn cors_layer(settings: &Settings) -> CorsLayer {
    let origin = match HeaderValue::from_str(&settings.client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(client_url = %settings.client_url, "invalid client_url, CORS disabled");
            AllowOrigin::list([])
        },
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
