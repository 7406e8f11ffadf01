//! User account service - registration, profiles, search

use crate::db::{PostRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{NewUser, UpdateProfile, User};
use crate::security;
use crate::services::ownership::ensure_owner;
use crate::validators;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Public projection of a user, with the live post count attached
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub cover_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

impl UserSummary {
    pub fn from_user(user: &User, post_count: i64) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            cover_photo_url: user.cover_photo_url.clone(),
            created_at: user.created_at,
            post_count,
        }
    }
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Register a new account. The unique index on email is the backstop
    /// for concurrent registrations with the same address.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserSummary> {
        validators::validate_display_name(name)?;
        validators::validate_email(email)?;
        validators::validate_password(password)?;

        if self.users.exists_by_email(email).await? {
            return Err(AppError::Conflict("email is already registered".into()));
        }

        let new_user = NewUser {
            name: name.trim().to_string(),
            email: email.to_string(),
            password_hash: security::hash_password(password)?,
        };

        let user = self.users.create(&new_user).await?;
        tracing::info!(user_id = %user.id, "user registered");

        Ok(UserSummary::from_user(&user, 0))
    }

    /// Fetch one user's public summary
    pub async fn get_by_id(&self, user_id: Uuid) -> Result<UserSummary> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        let post_count = self.posts.count_by_author(user.id).await?;
        Ok(UserSummary::from_user(&user, post_count))
    }

    /// Apply profile changes; only the account owner may do this
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        actor_id: Uuid,
        changes: &UpdateProfile,
    ) -> Result<UserSummary> {
        ensure_owner(actor_id, user_id)?;

        if let Some(name) = &changes.name {
            validators::validate_display_name(name)?;
        }

        let user = self
            .users
            .update_profile(user_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        let post_count = self.posts.count_by_author(user.id).await?;
        Ok(UserSummary::from_user(&user, post_count))
    }

    /// Case-insensitive name search
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<UserSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let users = self.users.search_by_name(query, limit).await?;
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let counts: HashMap<Uuid, i64> =
            self.posts.count_by_authors(&ids).await?.into_iter().collect();

        Ok(users
            .iter()
            .map(|u| UserSummary::from_user(u, counts.get(&u.id).copied().unwrap_or(0)))
            .collect())
    }
}
