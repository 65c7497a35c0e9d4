// ============================
// crates/backend-lib/src/posts.rs
// ============================
//! Feed posts and the author-owns-post rule.
use chrono::Utc;
use metrics::counter;
use postboard_common::{PostId, PostView, PublicUser, UserId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::{OWNERSHIP_REJECTED, POST_CREATED, POST_DELETED, POST_UPDATED};
use crate::models::Post;
use crate::storage::{PostStore, UserStore};
use crate::validation::validate_post_content;

/// Post operations. Mutations are allowed for the author only.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    /// Publish a post authored by `author_id`
    pub async fn create(&self, author_id: UserId, content: &str) -> Result<PostView, AppError> {
        let content = validate_post_content(content)?;

        let post = Post::new(author_id, content.to_string());
        self.posts.insert_post(&post).await?;

        counter!(POST_CREATED).increment(1);
        tracing::info!(post_id = %post.id, %author_id, "post created");

        self.with_author(post).await
    }

    /// Every post, newest first, each with its author attached
    pub async fn list(&self) -> Result<Vec<PostView>, AppError> {
        let posts = self.posts.list_posts().await?;

        let mut authors: HashMap<UserId, Option<PublicUser>> = HashMap::new();
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            let author = match authors.get(&post.author_id) {
                Some(author) => author.clone(),
                None => {
                    let author = self.author_of(&post).await?;
                    authors.insert(post.author_id, author.clone());
                    author
                },
            };
            views.push(post.into_view(author));
        }

        Ok(views)
    }

    /// Replace the content of a post owned by `actor_id`.
    ///
    /// Checks run in order: existence, ownership, content.
    pub async fn update(
        &self,
        actor_id: UserId,
        post_id: PostId,
        content: &str,
    ) -> Result<PostView, AppError> {
        let mut post = self.owned_post(actor_id, post_id, "edit").await?;
        let content = validate_post_content(content)?;

        post.content = content.to_string();
        post.updated_at = Utc::now();
        self.posts.replace_post(&post).await?;

        counter!(POST_UPDATED).increment(1);
        tracing::info!(%post_id, "post updated");

        self.with_author(post).await
    }

    /// Permanently remove a post owned by `actor_id`
    pub async fn delete(&self, actor_id: UserId, post_id: PostId) -> Result<(), AppError> {
        self.owned_post(actor_id, post_id, "delete").await?;

        // lost a race with another delete of the same post
        if !self.posts.remove_post(post_id).await? {
            return Err(post_not_found());
        }

        counter!(POST_DELETED).increment(1);
        tracing::info!(%post_id, "post deleted");

        Ok(())
    }

    async fn owned_post(
        &self,
        actor_id: UserId,
        post_id: PostId,
        action: &str,
    ) -> Result<Post, AppError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(post_not_found)?;

        if !post.is_authored_by(actor_id) {
            counter!(OWNERSHIP_REJECTED).increment(1);
            tracing::warn!(%post_id, %actor_id, "rejected {action} by non-author");
            return Err(AppError::Forbidden(format!(
                "You can only {action} your own posts"
            )));
        }

        Ok(post)
    }

    async fn author_of(&self, post: &Post) -> Result<Option<PublicUser>, AppError> {
        Ok(self
            .users
            .find_user_by_id(post.author_id)
            .await?
            .map(|user| user.public()))
    }

    async fn with_author(&self, post: Post) -> Result<PostView, AppError> {
        let author = self.author_of(&post).await?;
        Ok(post.into_view(author))
    }
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}
