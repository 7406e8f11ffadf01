//! Like toggle service
//!
//! One state machine per (user, post) pair with states liked / not-liked.
//! The uniqueness constraint on the likes table is the source of truth
//! under concurrent toggles: duplicate inserts land on the conflict arm and
//! deletes of an already-removed row affect zero rows, so racing identical
//! requests converge on one row and one final state.

use crate::db::{LikeRepository, PostRepository};
use crate::error::{AppError, Result};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Final state reported by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeState {
    Liked,
    NotLiked,
}

#[derive(Clone)]
pub struct LikeService {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(posts: Arc<dyn PostRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { posts, likes }
    }

    /// Flip the like state for the caller on a post.
    ///
    /// The toggle always acts on the caller's own id; there is no way to
    /// toggle on behalf of another user.
    pub async fn toggle(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeState> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".into()))?;

        if self.likes.exists(user_id, post_id).await? {
            // Zero rows affected means a concurrent call removed it first;
            // the pair is not liked either way.
            self.likes.delete(user_id, post_id).await?;
            Ok(LikeState::NotLiked)
        } else {
            // A conflicting concurrent insert is swallowed by the
            // repository; the pair is liked either way.
            self.likes.create(user_id, post_id).await?;
            Ok(LikeState::Liked)
        }
    }

    /// Whether the user has liked the post; no side effects
    pub async fn is_liked(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        self.likes.exists(user_id, post_id).await
    }

    /// Live like count for a post
    pub async fn count_for_post(&self, post_id: Uuid) -> Result<i64> {
        self.likes.count_by_post(post_id).await
    }
}
