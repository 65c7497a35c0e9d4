// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the Postboard client and server.
//! This module defines the JSON request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a registered user
pub type UserId = Uuid;

/// Identifier of a post
pub type PostId = Uuid;

/// Body of `POST /api/users/register` and `POST /api/users/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/posts` and `PUT /api/posts/{id}`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostInput {
    pub content: String,
}

/// Public identity of a user. Never carries credential material.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
}

/// A post as returned to clients, with its author's public identity attached
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub content: String,
    /// `None` when the author record no longer exists
    pub author: Option<PublicUser>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response carrying a user (register, login, current user)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: PublicUser,
}

/// Response carrying a single post (create, update)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostResponse {
    pub message: String,
    pub post: PostView,
}

/// Response of `GET /api/posts`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostListResponse {
    pub posts: Vec<PostView>,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body. `error` is a short human readable message, `code` is stable.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// Response of `GET /health`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub database: String,
}
