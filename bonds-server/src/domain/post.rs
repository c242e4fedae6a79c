use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

/// Empty titles and bodies are allowed: content rules belong to the HTTP
/// boundary, the domain only pins identity and length limits the schema
/// enforces anyway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) title: String,
    pub(crate) body: String,
}

impl CreatePostRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        if self.title.chars().count() > 100 {
            return Err(DomainError::Validation {
                field: "title",
                message: "must be at most 100 chars",
            });
        }
        Ok(self)
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
        author_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        validate_positive_i64("id", id)?;
        validate_positive_i64("author_id", author_id)?;

        Ok(Self {
            id,
            title: title.into(),
            body: body.into(),
            author_id,
            created_at,
        })
    }
}

/// A post joined with its author, fully materialized in one query. The like
/// workflow needs the author's identity for both the self-like guard and the
/// notification payload.
#[derive(Debug, Clone)]
pub(crate) struct PostWithAuthor {
    pub(crate) post: Post,
    pub(crate) author_username: String,
    pub(crate) author_email: String,
}

fn validate_positive_i64(field: &'static str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::Validation {
            field,
            message: "must be > 0",
        });
    }
    Ok(())
}
