use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::data::like_repository::LikeRepository;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn insert_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| map_like_db_error("begin insert_like", err))?;

        // Under concurrent duplicate inserts exactly one transaction wins;
        // the loser hits the uniqueness constraint and lands on AlreadyLiked.
        sqlx::query("INSERT INTO likes_post (post_id, user_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|err| map_like_db_error("insert like", err))?;

        tx.commit()
            .await
            .map_err(|err| map_like_db_error("commit insert_like", err))?;

        Ok(())
    }

    async fn delete_like(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| map_like_db_error("begin delete_like", err))?;

        let result = sqlx::query("DELETE FROM likes_post WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|err| map_like_db_error("delete like", err))?;

        tx.commit()
            .await
            .map_err(|err| map_like_db_error("commit delete_like", err))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64, DomainError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM likes_post WHERE post_id = $1")
                .bind(post_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| map_like_db_error("count likes", err))?;

        Ok(count)
    }
}

fn map_like_db_error(context: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return DomainError::AlreadyLiked,
            Some("23503") => return DomainError::NotFound("post or user".to_string()),
            _ => {}
        }
    }
    error!(context, error = %err, "likes storage operation failed");
    DomainError::Storage(context.to_string())
}
