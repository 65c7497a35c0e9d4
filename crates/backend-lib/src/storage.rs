// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! Every record is one JSON document. Documents are replaced by writing a
//! temporary file and renaming it over the old one, so readers never observe
//! a half-written record and concurrent writers resolve last-write-wins.
use async_trait::async_trait;
use postboard_common::{PostId, UserId};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs as tokio_fs;
use uuid::Uuid;

use crate::auth::session::Session;
use crate::error::AppError;
use crate::models::{Post, User};

/// Namespace for deriving email index keys
const EMAIL_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_4c2e_9a0b_4f3e_8d7c_5b6a_4e3f_2a19);

/// Persistent table of user identities and password hashes
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`AppError::EmailTaken`] if the email is
    /// already registered, however many inserts race for it.
    async fn insert_user(&self, user: &User) -> Result<(), AppError>;

    /// Look up a user by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Look up a user by id
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;
}

/// Persistent posts
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: &Post) -> Result<(), AppError>;

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, AppError>;

    /// All posts, newest `created_at` first
    async fn list_posts(&self) -> Result<Vec<Post>, AppError>;

    /// Overwrite an existing post document
    async fn replace_post(&self, post: &Post) -> Result<(), AppError>;

    /// Remove a post. Returns false if it did not exist.
    async fn remove_post(&self, id: PostId) -> Result<bool, AppError>;
}

/// Session records keyed by opaque token
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, AppError>;

    async fn put(&self, session: &Session) -> Result<(), AppError>;

    /// Delete a session. Deleting a missing session succeeds.
    async fn delete(&self, session_id: &str) -> Result<(), AppError>;
}

/// Everything the application needs from a storage backend
#[async_trait]
pub trait Storage: UserStore + PostStore + SessionStore + Send + Sync {
    /// Check that the backend is reachable and writable
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Email index entry; its file name is derived from the email
#[derive(Serialize, Deserialize, Debug)]
struct EmailIndexEntry {
    email: String,
    user_id: UserId,
}

/// Flat-file implementation of the Storage traits
#[derive(Clone, Debug)]
pub struct FlatFileStorage {
    root: PathBuf,
}

impl FlatFileStorage {
    /// Open (and create if needed) a data directory.
    ///
    /// Fails with [`AppError::StorageUnavailable`] if the directory cannot be
    /// created or written to.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users").join("by-email"))?;
        fs::create_dir_all(root.join("posts"))?;
        fs::create_dir_all(root.join("sessions"))?;

        let probe = root.join(".write-probe");
        fs::write(&probe, b"ok")?;
        fs::remove_file(&probe)?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_path(&self, id: UserId) -> PathBuf {
        self.root.join("users").join(format!("{id}.json"))
    }

    fn email_index_path(&self, email: &str) -> PathBuf {
        let key = Uuid::new_v5(&EMAIL_NAMESPACE, email.as_bytes());
        self.root
            .join("users")
            .join("by-email")
            .join(format!("{key}.json"))
    }

    fn post_path(&self, id: PostId) -> PathBuf {
        self.root.join("posts").join(format!("{id}.json"))
    }

    /// `None` for keys that could escape the sessions directory
    fn session_path(&self, session_id: &str) -> Option<PathBuf> {
        let safe = !session_id.is_empty()
            && session_id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        safe.then(|| self.root.join("sessions").join(format!("{session_id}.json")))
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    path.with_file_name(name)
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    match tokio_fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a document to a fresh temp file next to `path`, returning the temp path
async fn write_temp<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf, AppError> {
    let json = serde_json::to_vec_pretty(value)?;
    let tmp = temp_path_for(path);
    tokio_fs::write(&tmp, json).await?;
    Ok(tmp)
}

async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let tmp = write_temp(path, value).await?;
    if let Err(e) = tokio_fs::rename(&tmp, path).await {
        let _ = tokio_fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn remove_if_exists(path: &Path) -> Result<bool, AppError> {
    match tokio_fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl UserStore for FlatFileStorage {
    async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        let user_path = self.user_path(user.id);
        let index_path = self.email_index_path(&user.email);

        write_json_atomic(&user_path, user).await?;

        // Publishing the index entry is the uniqueness check: hard_link never
        // replaces an existing file.
        let entry = EmailIndexEntry {
            email: user.email.clone(),
            user_id: user.id,
        };
        let tmp = match write_temp(&index_path, &entry).await {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = tokio_fs::remove_file(&user_path).await;
                return Err(e);
            },
        };
        let published = tokio_fs::hard_link(&tmp, &index_path).await;
        let _ = tokio_fs::remove_file(&tmp).await;

        match published {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = tokio_fs::remove_file(&user_path).await;
                if e.kind() == ErrorKind::AlreadyExists {
                    Err(AppError::EmailTaken)
                } else {
                    Err(e.into())
                }
            },
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let entry: Option<EmailIndexEntry> = read_json(&self.email_index_path(email)).await?;
        match entry {
            Some(entry) if entry.email == email => self.find_user_by_id(entry.user_id).await,
            _ => Ok(None),
        }
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        read_json(&self.user_path(id)).await
    }
}

#[async_trait]
impl PostStore for FlatFileStorage {
    async fn insert_post(&self, post: &Post) -> Result<(), AppError> {
        write_json_atomic(&self.post_path(post.id), post).await
    }

    async fn get_post(&self, id: PostId) -> Result<Option<Post>, AppError> {
        read_json(&self.post_path(id)).await
    }

    async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let mut entries = tokio_fs::read_dir(self.root.join("posts")).await?;
        let mut posts = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // a post deleted since read_dir simply drops out
            if let Some(post) = read_json::<Post>(&path).await? {
                posts.push(post);
            }
        }

        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(posts)
    }

    async fn replace_post(&self, post: &Post) -> Result<(), AppError> {
        write_json_atomic(&self.post_path(post.id), post).await
    }

    async fn remove_post(&self, id: PostId) -> Result<bool, AppError> {
        remove_if_exists(&self.post_path(id)).await
    }
}

#[async_trait]
impl SessionStore for FlatFileStorage {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, AppError> {
        match self.session_path(session_id) {
            Some(path) => read_json(&path).await,
            None => Ok(None),
        }
    }

    async fn put(&self, session: &Session) -> Result<(), AppError> {
        let path = self
            .session_path(&session.session_id)
            .ok_or_else(|| AppError::Internal("refusing to store malformed session id".to_string()))?;
        write_json_atomic(&path, session).await
    }

    async fn delete(&self, session_id: &str) -> Result<(), AppError> {
        if let Some(path) = self.session_path(session_id) {
            remove_if_exists(&path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn health_check(&self) -> Result<(), AppError> {
        let probe = temp_path_for(&self.root.join(".health"));
        tokio_fs::write(&probe, b"ok").await?;
        tokio_fs::remove_file(&probe).await?;
        Ok(())
    }
}
