// ============================
// crates/backend-lib/src/models.rs
// ============================
//! Persisted records.
use chrono::{DateTime, Utc};
use postboard_common::{PostId, PostView, PublicUser, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account with its credential material
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Normalized (trimmed, lower-cased) and unique
    pub email: String,
    /// scrypt PHC string
    pub password_hash: String,
    pub password_salt: String,
}

impl User {
    pub fn new(email: String, password_hash: String, password_salt: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            password_salt,
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// A post in the shared feed. The author never changes.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub content: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: UserId, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    pub fn into_view(self, author: Option<PublicUser>) -> PostView {
        PostView {
            id: self.id,
            content: self.content,
            author,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
