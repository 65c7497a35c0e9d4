mod test_utils;

use backend_lib::error::AppError;
use test_utils::setup_test_env;
use uuid::Uuid;

#[tokio::test]
async fn test_create_rejects_blank_content() {
    let (state, _temp_dir) = setup_test_env();
    let author = state
        .auth
        .register("author@example.com", "password123")
        .await
        .unwrap()
        .user;

    let err = state.posts.create(author.id, "   ").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(state.posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_then_list_newest_first() {
    let (state, _temp_dir) = setup_test_env();
    let author = state
        .auth
        .register("author@example.com", "password123")
        .await
        .unwrap()
        .user;

    let older = state.posts.create(author.id, "older").await.unwrap();
    let newest = state.posts.create(author.id, "hi").await.unwrap();
    assert_eq!(newest.content, "hi");
    assert_eq!(newest.author.as_ref(), Some(&author));

    let feed = state.posts.list().await.unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].id, newest.id);
    assert_eq!(feed[1].id, older.id);
}

#[tokio::test]
async fn test_round_trip() {
    let (state, _temp_dir) = setup_test_env();
    let author = state
        .auth
        .register("author@example.com", "password123")
        .await
        .unwrap()
        .user;

    let post = state
        .posts
        .create(author.id, "  Coffee, code, repeat.  ")
        .await
        .unwrap();

    let feed = state.posts.list().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].content, "Coffee, code, repeat.");
    assert_eq!(feed[0].author.as_ref().map(|a| a.id), Some(author.id));

    state.posts.delete(author.id, post.id).await.unwrap();
    assert!(state.posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_only_author_can_update() {
    let (state, _temp_dir) = setup_test_env();
    let author = state
        .auth
        .register("author@example.com", "password123")
        .await
        .unwrap()
        .user;
    let stranger = state
        .auth
        .register("stranger@example.com", "password123")
        .await
        .unwrap()
        .user;

    let post = state.posts.create(author.id, "original").await.unwrap();

    let err = state
        .posts
        .update(stranger.id, post.id, "hijacked")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let updated = state
        .posts
        .update(author.id, post.id, "edited")
        .await
        .unwrap();
    assert_eq!(updated.content, "edited");
    assert_eq!(updated.created_at, post.created_at);
    assert!(updated.updated_at >= post.updated_at);
    assert_eq!(updated.author.as_ref(), Some(&author));

    let feed = state.posts.list().await.unwrap();
    assert_eq!(feed[0].content, "edited");
}

#[tokio::test]
async fn test_only_author_can_delete() {
    let (state, _temp_dir) = setup_test_env();
    let author = state
        .auth
        .register("author@example.com", "password123")
        .await
        .unwrap()
        .user;
    let stranger = state
        .auth
        .register("stranger@example.com", "password123")
        .await
        .unwrap()
        .user;

    let post = state.posts.create(author.id, "mine").await.unwrap();

    let err = state.posts.delete(stranger.id, post.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(state.posts.list().await.unwrap().len(), 1);

    state.posts.delete(author.id, post.id).await.unwrap();
    assert!(state.posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let (state, _temp_dir) = setup_test_env();
    let actor = Uuid::new_v4();
    let missing = Uuid::new_v4();

    let err = state
        .posts
        .update(actor, missing, "content")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = state.posts.delete(actor, missing).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_check_order_on_update() {
    let (state, _temp_dir) = setup_test_env();
    let author = state
        .auth
        .register("author@example.com", "password123")
        .await
        .unwrap()
        .user;
    let stranger = Uuid::new_v4();
    let post = state.posts.create(author.id, "original").await.unwrap();

    // not found beats validation
    let err = state
        .posts
        .update(author.id, Uuid::new_v4(), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // forbidden beats validation
    let err = state
        .posts
        .update(stranger, post.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    // the author gets the validation error
    let err = state
        .posts
        .update(author.id, post.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
