use crate::error::{AppError, Result};
use crate::models::{NewUser, UpdateProfile, User};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Storage contract for user rows
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A duplicate email surfaces as `Conflict`.
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    /// Find a user by ID
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Fetch multiple users by ID in one round trip
    async fn find_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<User>>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Whether the email is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Apply profile changes, refreshing the update timestamp.
    /// Returns None when the row no longer exists.
    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &UpdateProfile,
    ) -> Result<Option<User>>;

    /// Users whose name contains the query, newest first
    async fn search_by_name(&self, query: &str, limit: i64) -> Result<Vec<User>>;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, bio, location,
                      avatar_url, cover_photo_url, created_at, updated_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(err) => {
                // Losing the insert race on the unique email index is a
                // client-visible conflict, not an internal failure.
                if let sqlx::Error::Database(db_err) = &err {
                    if db_err.is_unique_violation() {
                        return Err(AppError::Conflict("email is already registered".into()));
                    }
                }
                Err(err.into())
            }
        }
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, location,
                   avatar_url, cover_photo_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_ids(&self, user_ids: &[Uuid]) -> Result<Vec<User>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, location,
                   avatar_url, cover_photo_url, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, location,
                   avatar_url, cover_photo_url, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &UpdateProfile,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                location = COALESCE($4, location),
                avatar_url = COALESCE($5, avatar_url),
                cover_photo_url = COALESCE($6, cover_photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, bio, location,
                      avatar_url, cover_photo_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&changes.name)
        .bind(&changes.bio)
        .bind(&changes.location)
        .bind(&changes.avatar_url)
        .bind(&changes.cover_photo_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn search_by_name(&self, query: &str, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, bio, location,
                   avatar_url, cover_photo_url, created_at, updated_at
            FROM users
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
