//! Comment thread service - ordered comment collections under a post

use crate::db::{CommentRepository, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::Comment;
use crate::services::ownership::ensure_owner;
use crate::services::users::UserSummary;
use crate::validators;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Comment enriched with its author summary
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: UserSummary,
    pub post_id: Uuid,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    /// Create a comment under an existing post
    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<CommentView> {
        validators::validate_comment_content(content)?;

        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".into()))?;

        let comment = self.comments.create(post_id, author_id, content).await?;
        tracing::debug!(comment_id = %comment.id, %post_id, "comment created");

        let mut views = self.to_views(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("comment author missing".into()))
    }

    /// Thread under a post in chronological reading order
    pub async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        let comments = self.comments.list_by_post(post_id).await?;
        self.to_views(comments).await
    }

    /// A user's comments, most recent first
    pub async fn list_by_author(&self, user_id: Uuid) -> Result<Vec<CommentView>> {
        let comments = self.comments.list_by_author(user_id).await?;
        self.to_views(comments).await
    }

    /// Edit a comment; only its author may do this
    pub async fn update(
        &self,
        comment_id: Uuid,
        actor_id: Uuid,
        content: &str,
    ) -> Result<CommentView> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".into()))?;

        ensure_owner(actor_id, comment.user_id)?;
        validators::validate_comment_content(content)?;

        let updated = self
            .comments
            .update(comment_id, content)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".into()))?;

        let mut views = self.to_views(vec![updated]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("comment author missing".into()))
    }

    /// Delete a comment; only its author may do this
    pub async fn delete(&self, comment_id: Uuid, actor_id: Uuid) -> Result<()> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("comment not found".into()))?;

        ensure_owner(actor_id, comment.user_id)?;

        self.comments.delete(comment_id).await?;
        tracing::debug!(%comment_id, "comment deleted");
        Ok(())
    }

    /// Attach author summaries with batched lookups
    async fn to_views(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<Uuid, _> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let post_counts: HashMap<Uuid, i64> = self
            .posts
            .count_by_authors(&author_ids)
            .await?
            .into_iter()
            .collect();

        let views = comments
            .into_iter()
            .filter_map(|comment| {
                let author = match authors.get(&comment.user_id) {
                    Some(author) => author,
                    None => {
                        tracing::warn!(
                            comment_id = %comment.id,
                            user_id = %comment.user_id,
                            "comment author row missing, dropping from view"
                        );
                        return None;
                    }
                };
                let post_count = post_counts.get(&author.id).copied().unwrap_or(0);
                Some(CommentView {
                    id: comment.id,
                    content: comment.content,
                    created_at: comment.created_at,
                    updated_at: comment.updated_at,
                    author: UserSummary::from_user(author, post_count),
                    post_id: comment.post_id,
                })
            })
            .collect();

        Ok(views)
    }
}
