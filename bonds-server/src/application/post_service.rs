use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, PostWithAuthor};

#[derive(Debug, Clone)]
pub(crate) struct PostView {
    pub(crate) post: PostWithAuthor,
    pub(crate) like_count: i64,
}

pub(crate) struct PostService<P: PostRepository, L: LikeRepository> {
    posts: P,
    likes: L,
}

impl<P: PostRepository, L: LikeRepository> PostService<P, L> {
    pub(crate) fn new(posts: P, likes: L) -> Self {
        Self { posts, likes }
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            title: req.title,
            body: req.body,
            author_id,
        };
        self.posts.create_post(new_post).await
    }

    pub(crate) async fn list_posts(
        &self,
        author_id: Option<i64>,
    ) -> Result<Vec<Post>, DomainError> {
        self.posts.list_posts(author_id).await
    }

    pub(crate) async fn get_post(&self, id: i64) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .get_post_with_author(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {id}")))?;

        let like_count = self.likes.count_likes(id).await?;

        Ok(PostView { post, like_count })
    }

    /// Only the author may delete; anyone else gets `false` and the post
    /// stays. A missing post is a distinct not-found outcome.
    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<bool, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        if post.author_id != actor_user_id {
            return Ok(false);
        }

        self.posts.delete_post(post_id).await
    }
}
