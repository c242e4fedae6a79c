use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostWithAuthor};

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    author_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct PostWithAuthorRow {
    id: i64,
    title: String,
    body: String,
    author_id: i64,
    created_at: DateTime<Utc>,
    author_username: String,
    author_email: String,
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| map_post_db_error("begin create_post", err))?;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, body, id_user)
            VALUES ($1, $2, $3)
            RETURNING id, title, body, id_user AS author_id, date_creation AS created_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| map_post_db_error("insert post", err))?;

        tx.commit()
            .await
            .map_err(|err| map_post_db_error("commit create_post", err))?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, body, id_user AS author_id, date_creation AS created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_post_db_error("select post", err))?;

        row.map(map_row_to_post).transpose()
    }

    async fn get_post_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, DomainError> {
        let row = sqlx::query_as::<_, PostWithAuthorRow>(
            r#"
            SELECT
                p.id,
                p.title,
                p.body,
                p.id_user AS author_id,
                p.date_creation AS created_at,
                u.username AS author_username,
                u.email AS author_email
            FROM posts p
            JOIN users u ON u.id = p.id_user
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_post_db_error("select post with author", err))?;

        row.map(|r| {
            let post = Post::new(r.id, r.title, r.body, r.author_id, r.created_at)
                .map_err(|err| DomainError::Unexpected(err.to_string()))?;
            Ok(PostWithAuthor {
                post,
                author_username: r.author_username,
                author_email: r.author_email,
            })
        })
        .transpose()
    }

    async fn delete_post(&self, id: i64) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| map_post_db_error("begin delete_post", err))?;

        // likes reference the post, they go in the same transaction
        sqlx::query("DELETE FROM likes_post WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| map_post_db_error("delete post likes", err))?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|err| map_post_db_error("delete post", err))?;

        tx.commit()
            .await
            .map_err(|err| map_post_db_error("commit delete_post", err))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self, author_id: Option<i64>) -> Result<Vec<Post>, DomainError> {
        let rows = match author_id {
            Some(author_id) => {
                sqlx::query_as::<_, PostRow>(
                    r#"
                    SELECT id, title, body, id_user AS author_id, date_creation AS created_at
                    FROM posts
                    WHERE id_user = $1
                    "#,
                )
                .bind(author_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, PostRow>(
                    r#"
                    SELECT id, title, body, id_user AS author_id, date_creation AS created_at
                    FROM posts
                    ORDER BY date_creation DESC, id DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|err| map_post_db_error("list posts", err))?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(row.id, row.title, row.body, row.author_id, row.created_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(context: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23503")
    {
        return DomainError::NotFound("author".to_string());
    }
    error!(context, error = %err, "posts storage operation failed");
    DomainError::Storage(context.to_string())
}
