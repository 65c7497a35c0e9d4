// ==========================
// crates/backend-lib/tests/storage.rs
// ==========================
use backend_lib::auth::Session;
use backend_lib::error::AppError;
use backend_lib::models::{Post, User};
use backend_lib::storage::{FlatFileStorage, PostStore, SessionStore, Storage, UserStore};
use chrono::{TimeDelta, Utc};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

fn test_user(email: &str) -> User {
    User::new(email.to_string(), "hash".to_string(), "salt".to_string())
}

#[tokio::test]
async fn test_storage_users() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();

    let user = test_user("john.doe@example.com");
    storage.insert_user(&user).await.unwrap();

    let by_email = storage
        .find_user_by_email("john.doe@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.password_hash, "hash");

    let by_id = storage.find_user_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, "john.doe@example.com");

    assert!(storage
        .find_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
    assert!(storage
        .find_user_by_id(Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_storage_rejects_duplicate_email() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();

    let first = test_user("jane@example.com");
    let second = test_user("jane@example.com");

    storage.insert_user(&first).await.unwrap();
    let err = storage.insert_user(&second).await.unwrap_err();
    assert!(matches!(err, AppError::EmailTaken));

    // the losing insert leaves nothing behind
    assert!(storage.find_user_by_id(second.id).await.unwrap().is_none());
    let owner = storage
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.id, first.id);
}

#[tokio::test]
async fn test_concurrent_inserts_create_one_user() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FlatFileStorage::new(temp_dir.path()).unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage.insert_user(&test_user("race@example.com")).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => created += 1,
            Err(AppError::EmailTaken) => {},
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(created, 1);

    let user_files = std::fs::read_dir(temp_dir.path().join("users"))
        .unwrap()
        .filter(|entry| entry.as_ref().unwrap().path().is_file())
        .count();
    assert_eq!(user_files, 1);
}

#[tokio::test]
async fn test_storage_posts() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
    let author = Uuid::new_v4();

    let mut older = Post::new(author, "first".to_string());
    older.created_at = Utc::now() - TimeDelta::seconds(10);
    let newer = Post::new(author, "second".to_string());

    storage.insert_post(&older).await.unwrap();
    storage.insert_post(&newer).await.unwrap();

    // newest first
    let posts = storage.list_posts().await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, newer.id);
    assert_eq!(posts[1].id, older.id);

    // replace
    let mut edited = older.clone();
    edited.content = "first, edited".to_string();
    storage.replace_post(&edited).await.unwrap();
    let fetched = storage.get_post(older.id).await.unwrap().unwrap();
    assert_eq!(fetched.content, "first, edited");

    // remove
    assert!(storage.remove_post(older.id).await.unwrap());
    assert!(!storage.remove_post(older.id).await.unwrap());
    assert!(storage.get_post(older.id).await.unwrap().is_none());
    assert_eq!(storage.list_posts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_sessions() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();

    let now = Utc::now();
    let session = Session {
        session_id: "abcDEF123_-".to_string(),
        user_id: Uuid::new_v4(),
        created_at: now,
        expires_at: now + TimeDelta::hours(1),
    };

    storage.put(&session).await.unwrap();
    let fetched = storage.get("abcDEF123_-").await.unwrap().unwrap();
    assert_eq!(fetched.user_id, session.user_id);

    storage.delete("abcDEF123_-").await.unwrap();
    assert!(storage.get("abcDEF123_-").await.unwrap().is_none());

    // deleting again is fine
    storage.delete("abcDEF123_-").await.unwrap();

    // keys that could escape the sessions directory never touch the filesystem
    assert!(storage.get("../users/x").await.unwrap().is_none());
    storage.delete("../posts").await.unwrap();
    assert!(temp_dir.path().join("posts").exists());
}

#[tokio::test]
async fn test_storage_health_check() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FlatFileStorage::new(temp_dir.path()).unwrap();
    assert!(storage.health_check().await.is_ok());
}

#[test]
fn test_storage_unavailable_on_bad_root() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").unwrap();

    let err = FlatFileStorage::new(&file).unwrap_err();
    assert!(matches!(err, AppError::StorageUnavailable(_)));
}
