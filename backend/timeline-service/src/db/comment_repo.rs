use crate::error::Result;
use crate::models::Comment;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Storage contract for comment rows
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment and return it
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment>;

    /// Find a comment by ID
    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<Comment>>;

    /// All comments under a post in chronological reading order
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    /// A user's comments, most recent first
    async fn list_by_author(&self, user_id: Uuid) -> Result<Vec<Comment>>;

    /// Persist new content, refreshing the update timestamp.
    /// Returns None when the row no longer exists.
    async fn update(&self, comment_id: Uuid, content: &str) -> Result<Option<Comment>>;

    /// Delete a comment
    async fn delete(&self, comment_id: Uuid) -> Result<bool>;

    /// Live comment count for a post
    async fn count_by_post(&self, post_id: Uuid) -> Result<i64>;

    /// Live comment counts for multiple posts; posts without comments are absent
    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>>;
}

/// PostgreSQL-backed comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, post_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_by_author(&self, user_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn update(&self, comment_id: Uuid, content: &str) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, post_id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(comment_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn delete(&self, comment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
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
            FROM comments
            WHERE post_id = ANY($1)
            GROUP BY post_id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
