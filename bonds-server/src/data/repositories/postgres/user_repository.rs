use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::error;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    is_superuser: bool,
    registered_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    id: i64,
    username: String,
    email: String,
    hashed_password: String,
    is_active: bool,
    is_superuser: bool,
    registered_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, DomainError> {
        User::new(
            self.id,
            self.username,
            self.email,
            self.is_active,
            self.is_superuser,
            self.registered_at,
        )
        .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}

impl UserCredentialsRow {
    fn into_credentials(self) -> Result<UserCredentials, DomainError> {
        let user = User::new(
            self.id,
            self.username,
            self.email,
            self.is_active,
            self.is_superuser,
            self.registered_at,
        )
        .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(UserCredentials {
            user,
            password_hash: self.hashed_password,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| map_user_db_error("begin create_user", err))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, is_active, is_superuser, registered_at
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| map_user_db_error("insert user", err))?;

        tx.commit()
            .await
            .map_err(|err| map_user_db_error("commit create_user", err))?;

        row.into_user()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT id, username, email, hashed_password, is_active, is_superuser, registered_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_user_db_error("select user by email", err))?;

        row.map(UserCredentialsRow::into_credentials).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, is_active, is_superuser, registered_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_user_db_error("select user by id", err))?;

        row.map(UserRow::into_user).transpose()
    }
}

fn map_user_db_error(context: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        return DomainError::AlreadyExists("email".to_string());
    }
    error!(context, error = %err, "users storage operation failed");
    DomainError::Storage(context.to_string())
}
