//! In-memory repository implementations backing the service-level tests.
//!
//! One shared store stands in for the database: the like map models the
//! (user_id, post_id) uniqueness constraint and post deletion removes
//! dependent comment and like rows the way the schema's cascading foreign
//! keys do. A monotonic tick drives timestamps so ordering assertions are
//! deterministic.

// Not every test binary uses every helper
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use timeline_service::db::{CommentRepository, LikeRepository, PostRepository, UserRepository};
use timeline_service::error::{AppError, Result};
use timeline_service::models::{Comment, Like, NewUser, Post, UpdateProfile, User};
use timeline_service::services::{
    CommentService, FeedService, LikeService, PostService, UserService,
};
use uuid::Uuid;

#[derive(Default)]
struct StoreInner {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<(Uuid, Uuid), Like>,
    clock: i64,
}

pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(StoreInner::default()),
        })
    }

    pub fn like_row_count(&self) -> usize {
        self.inner.lock().unwrap().likes.len()
    }
}

fn tick(inner: &mut StoreInner) -> DateTime<Utc> {
    inner.clock += 1;
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(inner.clock)
}

// --- Users ---

#[derive(Clone)]
pub struct MemUserRepo(pub Arc<InMemoryStore>);

#[async_trait]
impl UserRepository for MemUserRepo {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let mut inner = self.0.inner.lock().unwrap();
        if inner.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("email is already registered".into()));
        }
        let now = tick(&mut inner);
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            bio: None,
            location: None,
            avatar_url: None,
            cover_photo_url: None,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.0.inner.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn find_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<User>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.users.values().any(|u| u.email == email))
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &UpdateProfile,
    ) -> Result<Option<User>> {
        let mut inner = self.0.inner.lock().unwrap();
        let now = tick(&mut inner);
        let Some(user) = inner.users.get_mut(&user_id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(bio) = &changes.bio {
            user.bio = Some(bio.clone());
        }
        if let Some(location) = &changes.location {
            user.location = Some(location.clone());
        }
        if let Some(avatar_url) = &changes.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        if let Some(cover_photo_url) = &changes.cover_photo_url {
            user.cover_photo_url = Some(cover_photo_url.clone());
        }
        user.updated_at = now;
        Ok(Some(user.clone()))
    }

    async fn search_by_name(&self, query: &str, limit: i64) -> Result<Vec<User>> {
        let inner = self.0.inner.lock().unwrap();
        let needle = query.to_lowercase();
        let mut matches: Vec<User> = inner
            .users
            .values()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(limit.max(0) as usize);
        Ok(matches)
    }
}

// --- Posts ---

#[derive(Clone)]
pub struct MemPostRepo(pub Arc<InMemoryStore>);

#[async_trait]
impl PostRepository for MemPostRepo {
    async fn create(&self, user_id: Uuid, content: &str, image_url: Option<&str>) -> Result<Post> {
        let mut inner = self.0.inner.lock().unwrap();
        let now = tick(&mut inner);
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            image_url: image_url.map(str::to_string),
            created_at: now,
            updated_at: now,
        };
        inner.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(self.0.inner.lock().unwrap().posts.get(&post_id).cloned())
    }

    async fn update(
        &self,
        post_id: Uuid,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Option<Post>> {
        let mut inner = self.0.inner.lock().unwrap();
        let now = tick(&mut inner);
        let Some(post) = inner.posts.get_mut(&post_id) else {
            return Ok(None);
        };
        post.content = content.to_string();
        post.image_url = image_url.map(str::to_string);
        post.updated_at = now;
        Ok(Some(post.clone()))
    }

    async fn delete(&self, post_id: Uuid) -> Result<bool> {
        let mut inner = self.0.inner.lock().unwrap();
        let removed = inner.posts.remove(&post_id).is_some();
        if removed {
            // Mirror the schema's ON DELETE CASCADE
            inner.comments.retain(|_, c| c.post_id != post_id);
            inner.likes.retain(|_, l| l.post_id != post_id);
        }
        Ok(removed)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let inner = self.0.inner.lock().unwrap();
        let mut posts: Vec<Post> = inner.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn list_page_by_author(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let inner = self.0.inner.lock().unwrap();
        let mut posts: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.0.inner.lock().unwrap().posts.len() as i64)
    }

    async fn count_by_author(&self, user_id: Uuid) -> Result<i64> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.posts.values().filter(|p| p.user_id == user_id).count() as i64)
    }

    async fn count_by_authors(&self, user_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>> {
        let inner = self.0.inner.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for post in inner.posts.values() {
            if user_ids.contains(&post.user_id) {
                *counts.entry(post.user_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

// --- Comments ---

#[derive(Clone)]
pub struct MemCommentRepo(pub Arc<InMemoryStore>);

#[async_trait]
impl CommentRepository for MemCommentRepo {
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment> {
        let mut inner = self.0.inner.lock().unwrap();
        let now = tick(&mut inner);
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        Ok(self
            .0
            .inner
            .lock()
            .unwrap()
            .comments
            .get(&comment_id)
            .cloned())
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let inner = self.0.inner.lock().unwrap();
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn list_by_author(&self, user_id: Uuid) -> Result<Vec<Comment>> {
        let inner = self.0.inner.lock().unwrap();
        let mut comments: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn update(&self, comment_id: Uuid, content: &str) -> Result<Option<Comment>> {
        let mut inner = self.0.inner.lock().unwrap();
        let now = tick(&mut inner);
        let Some(comment) = inner.comments.get_mut(&comment_id) else {
            return Ok(None);
        };
        comment.content = content.to_string();
        comment.updated_at = now;
        Ok(Some(comment.clone()))
    }

    async fn delete(&self, comment_id: Uuid) -> Result<bool> {
        let mut inner = self.0.inner.lock().unwrap();
        Ok(inner.comments.remove(&comment_id).is_some())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as i64)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>> {
        let inner = self.0.inner.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for comment in inner.comments.values() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

// --- Likes ---

#[derive(Clone)]
pub struct MemLikeRepo(pub Arc<InMemoryStore>);

#[async_trait]
impl LikeRepository for MemLikeRepo {
    async fn create(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let mut inner = self.0.inner.lock().unwrap();
        // Check-and-insert under one lock, like the database constraint
        if inner.likes.contains_key(&(user_id, post_id)) {
            return Ok(false);
        }
        let now = tick(&mut inner);
        inner.likes.insert(
            (user_id, post_id),
            Like {
                id: Uuid::new_v4(),
                user_id,
                post_id,
                created_at: now,
            },
        );
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let mut inner = self.0.inner.lock().unwrap();
        Ok(inner.likes.remove(&(user_id, post_id)).is_some())
    }

    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.likes.contains_key(&(user_id, post_id)))
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner.likes.values().filter(|l| l.post_id == post_id).count() as i64)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>> {
        let inner = self.0.inner.lock().unwrap();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for like in inner.likes.values() {
            if post_ids.contains(&like.post_id) {
                *counts.entry(like.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn liked_by_user(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let inner = self.0.inner.lock().unwrap();
        Ok(inner
            .likes
            .values()
            .filter(|l| l.user_id == user_id && post_ids.contains(&l.post_id))
            .map(|l| l.post_id)
            .collect())
    }
}

// --- Wiring ---

/// All services wired against one shared in-memory store
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
    pub feed: FeedService,
}

pub fn test_app() -> TestApp {
    let store = InMemoryStore::new();

    let user_repo: Arc<dyn UserRepository> = Arc::new(MemUserRepo(store.clone()));
    let post_repo: Arc<dyn PostRepository> = Arc::new(MemPostRepo(store.clone()));
    let comment_repo: Arc<dyn CommentRepository> = Arc::new(MemCommentRepo(store.clone()));
    let like_repo: Arc<dyn LikeRepository> = Arc::new(MemLikeRepo(store.clone()));

    TestApp {
        store,
        users: UserService::new(user_repo.clone(), post_repo.clone()),
        posts: PostService::new(post_repo.clone()),
        comments: CommentService::new(comment_repo.clone(), post_repo.clone(), user_repo.clone()),
        likes: LikeService::new(post_repo.clone(), like_repo.clone()),
        feed: FeedService::new(post_repo, user_repo, comment_repo, like_repo),
    }
}

/// Register a user with a unique email and return their id
pub async fn register_user(app: &TestApp, name: &str) -> Uuid {
    let email = format!("{}@example.com", Uuid::new_v4());
    app.users
        .register(name, &email, "password123")
        .await
        .expect("registration should succeed")
        .id
}

/// Create a post and return its id
pub async fn create_post(app: &TestApp, author_id: Uuid, content: &str) -> Uuid {
    app.posts
        .create(author_id, content, None)
        .await
        .expect("post creation should succeed")
        .id
}
