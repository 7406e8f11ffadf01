use crate::error::Result;
use crate::models::Like;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Storage contract for like rows.
///
/// The `likes` table carries a uniqueness constraint on (user_id, post_id);
/// `create` and `delete` are written so that racing duplicate requests
/// converge instead of surfacing constraint errors.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Insert a like. Returns true when a row was inserted, false when the
    /// pair was already present.
    async fn create(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;

    /// Remove a like. Returns true when a row was removed, false when the
    /// pair was already absent.
    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;

    /// Whether the user has liked the post
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;

    /// Live like count for a post
    async fn count_by_post(&self, post_id: Uuid) -> Result<i64>;

    /// Live like counts for multiple posts; posts without likes are absent
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>>;

    /// Of the given posts, the ones the user has liked
    async fn liked_by_user(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<Vec<Uuid>>;
}

/// PostgreSQL-backed like repository
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the raw like row, mostly useful for diagnostics
    pub async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Like>> {
        let like = sqlx::query_as::<_, Like>(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(like)
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn create(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        // The uniqueness constraint is the source of truth: a concurrent
        // duplicate insert lands on the conflict arm and reports "already
        // present" instead of an error.
        let result = sqlx::query(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM likes
            WHERE user_id = $1 AND post_id = $2
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT post_id, COUNT(*)
            FROM likes
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    async fn liked_by_user(&self, user_id: Uuid, post_ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let liked: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT post_id
            FROM likes
            WHERE user_id = $1 AND post_id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(liked)
    }
}
