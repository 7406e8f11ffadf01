//! Feed assembly - paginated recency-ordered post views with derived counts
//!
//! Enrichment is read-only: like and comment counts are recomputed from the
//! live interaction rows on every read, never persisted.

use crate::db::{CommentRepository, LikeRepository, Page, PageRequest, PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::Post;
use crate::services::users::UserSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Post enriched with author, counts and the viewer's like state
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: UserSummary,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            comments,
            likes,
        }
    }

    /// One page of the global feed, newest first
    pub async fn get_page(
        &self,
        request: PageRequest,
        viewer_id: Option<Uuid>,
    ) -> Result<Page<PostView>> {
        let total = self.posts.count_all().await?;
        let posts = self
            .posts
            .list_page(request.limit(), request.offset())
            .await?;

        let views = self.enrich(posts, viewer_id).await?;
        Ok(Page::new(views, total, request))
    }

    /// One page of a single author's posts, newest first
    pub async fn get_page_by_author(
        &self,
        author_id: Uuid,
        request: PageRequest,
        viewer_id: Option<Uuid>,
    ) -> Result<Page<PostView>> {
        let total = self.posts.count_by_author(author_id).await?;
        let posts = self
            .posts
            .list_page_by_author(author_id, request.limit(), request.offset())
            .await?;

        let views = self.enrich(posts, viewer_id).await?;
        Ok(Page::new(views, total, request))
    }

    /// A single enriched post
    pub async fn get_by_id(&self, post_id: Uuid, viewer_id: Option<Uuid>) -> Result<PostView> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".into()))?;

        let mut views = self.enrich(vec![post], viewer_id).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("post author missing".into()))
    }

    /// Attach authors, counts and viewer like state with batched queries;
    /// one round trip per concern, regardless of page size.
    async fn enrich(&self, posts: Vec<Post>, viewer_id: Option<Uuid>) -> Result<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let like_counts: HashMap<Uuid, i64> = self
            .likes
            .count_by_posts(&post_ids)
            .await?
            .into_iter()
            .collect();
        let comment_counts: HashMap<Uuid, i64> = self
            .comments
            .count_by_posts(&post_ids)
            .await?
            .into_iter()
            .collect();
        let authors: HashMap<Uuid, _> = self
            .users
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let author_post_counts: HashMap<Uuid, i64> = self
            .posts
            .count_by_authors(&author_ids)
            .await?
            .into_iter()
            .collect();

        let liked_by_viewer: HashSet<Uuid> = match viewer_id {
            Some(viewer) => self
                .likes
                .liked_by_user(viewer, &post_ids)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        let views = posts
            .into_iter()
            .filter_map(|post| {
                let author = match authors.get(&post.user_id) {
                    Some(author) => author,
                    None => {
                        tracing::warn!(
                            post_id = %post.id,
                            user_id = %post.user_id,
                            "post author row missing, dropping from feed"
                        );
                        return None;
                    }
                };
                let post_count = author_post_counts.get(&author.id).copied().unwrap_or(0);
                Some(PostView {
                    id: post.id,
                    content: post.content,
                    image_url: post.image_url,
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                    author: UserSummary::from_user(author, post_count),
                    like_count: like_counts.get(&post.id).copied().unwrap_or(0),
                    comment_count: comment_counts.get(&post.id).copied().unwrap_or(0),
                    liked_by_viewer: liked_by_viewer.contains(&post.id),
                })
            })
            .collect();

        Ok(views)
    }
}
