use crate::error::Result;
use crate::models::Post;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Storage contract for post rows
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post and return it
    async fn create(&self, user_id: Uuid, content: &str, image_url: Option<&str>) -> Result<Post>;

    /// Find a post by ID
    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// Persist new content and image URL, refreshing the update timestamp.
    /// Returns None when the row no longer exists.
    async fn update(
        &self,
        post_id: Uuid,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Option<Post>>;

    /// Delete a post. Comments and likes referencing it go with it
    /// (`ON DELETE CASCADE` in the schema).
    async fn delete(&self, post_id: Uuid) -> Result<bool>;

    /// One page of all posts, newest first
    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>>;

    /// One page of a single author's posts, newest first
    async fn list_page_by_author(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>>;

    /// Total number of posts
    async fn count_all(&self) -> Result<i64>;

    /// Total number of posts by one author
    async fn count_by_author(&self, user_id: Uuid) -> Result<i64>;

    /// Post counts for multiple authors; authors without posts are absent
    async fn count_by_authors(&self, user_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>>;
}

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, user_id: Uuid, content: &str, image_url: Option<&str>) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, content, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, content, image_url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, content, image_url, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn update(
        &self,
        post_id: Uuid,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = $2, image_url = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, content, image_url, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(content)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, content, image_url, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn list_page_by_author(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, content, image_url, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_by_author(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_by_authors(&self, user_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT user_id, COUNT(*)
            FROM posts
            WHERE user_id = ANY($1)
            GROUP BY user_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
