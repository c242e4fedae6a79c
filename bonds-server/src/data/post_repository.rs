use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostWithAuthor};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) author_id: i64,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn get_post_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, DomainError>;
    async fn delete_post(&self, id: i64) -> Result<bool, DomainError>;
    /// All posts newest-first, or every post by one author (unordered).
    async fn list_posts(&self, author_id: Option<i64>) -> Result<Vec<Post>, DomainError>;
}
