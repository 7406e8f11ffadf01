//! Post lifecycle service - create, update, delete with ownership checks

use crate::db::PostRepository;
use crate::error::{AppError, Result};
use crate::models::Post;
use crate::services::ownership::ensure_owner;
use crate::validators;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post. The image URL is an opaque string; only the content
    /// is validated.
    pub async fn create(
        &self,
        author_id: Uuid,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post> {
        validators::validate_post_content(content)?;

        let post = self.posts.create(author_id, content, image_url).await?;
        tracing::info!(post_id = %post.id, user_id = %author_id, "post created");

        Ok(post)
    }

    /// Replace a post's content and image URL; only the author may do this.
    /// The update timestamp is refreshed by the write.
    pub async fn update(
        &self,
        post_id: Uuid,
        actor_id: Uuid,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".into()))?;

        ensure_owner(actor_id, post.user_id)?;
        validators::validate_post_content(content)?;

        self.posts
            .update(post_id, content, image_url)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".into()))
    }

    /// Delete a post; only the author may do this. Comments and likes
    /// referencing the post are removed with it.
    pub async fn delete(&self, post_id: Uuid, actor_id: Uuid) -> Result<()> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".into()))?;

        ensure_owner(actor_id, post.user_id)?;

        self.posts.delete(post_id).await?;
        tracing::info!(%post_id, user_id = %actor_id, "post deleted");
        Ok(())
    }
}
