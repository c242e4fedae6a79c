use async_trait::async_trait;

use crate::domain::error::DomainError;

/// The likes relation. The `(user_id, post_id)` uniqueness constraint in the
/// schema is the authoritative guard: `insert_like` must surface a duplicate
/// insert as `AlreadyLiked`, never as a second row.
#[async_trait]
pub(crate) trait LikeRepository: Send + Sync {
    async fn insert_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError>;
    /// Returns whether a row was actually removed.
    async fn delete_like(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError>;
    async fn count_likes(&self, post_id: i64) -> Result<i64, DomainError>;
}
