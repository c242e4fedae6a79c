use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::like::LikeNotification;
use crate::infrastructure::notifier::NotifierHandle;

/// The like workflow. Per (user, post) pair the relation is a two-state
/// machine, Liked / NotLiked; the author of a post is permanently barred
/// from both transitions on their own post.
pub(crate) struct LikeService<U: UserRepository, P: PostRepository, L: LikeRepository> {
    users: U,
    posts: P,
    likes: L,
    notifier: NotifierHandle,
}

impl<U: UserRepository, P: PostRepository, L: LikeRepository> LikeService<U, P, L> {
    pub(crate) fn new(users: U, posts: P, likes: L, notifier: NotifierHandle) -> Self {
        Self {
            users,
            posts,
            likes,
            notifier,
        }
    }

    /// NotLiked -> Liked. On success the notification payload is queued for
    /// out-of-band delivery and returned to the caller; the request never
    /// waits on delivery.
    pub(crate) async fn add_like(
        &self,
        post_id: i64,
        liker_id: i64,
    ) -> Result<LikeNotification, DomainError> {
        let liker = self
            .users
            .find_by_id(liker_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {liker_id}")))?;

        let target = self
            .posts
            .get_post_with_author(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        if target.post.author_id == liker_id {
            return Err(DomainError::SelfLike);
        }

        // the (user, post) uniqueness constraint arbitrates concurrent
        // duplicates; a losing insert surfaces here as AlreadyLiked
        self.likes.insert_like(post_id, liker_id).await?;

        let note = LikeNotification {
            post_title: target.post.title,
            author_username: target.author_username,
            author_email: target.author_email,
            liker_username: liker.username,
        };
        self.notifier.dispatch(note.clone());

        Ok(note)
    }

    /// Liked -> NotLiked. Removing a like that was never there is a no-op
    /// reported as `false`, as is the author acting on their own post (no
    /// like can exist for that pair).
    pub(crate) async fn remove_like(
        &self,
        post_id: i64,
        unliker_id: i64,
    ) -> Result<bool, DomainError> {
        self.users
            .find_by_id(unliker_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {unliker_id}")))?;

        let target = self
            .posts
            .get_post_with_author(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        if target.post.author_id == unliker_id {
            return Ok(false);
        }

        self.likes.delete_like(post_id, unliker_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::LikeService;
    use crate::data::like_repository::LikeRepository;
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::post::{Post, PostWithAuthor};
    use crate::domain::user::User;
    use crate::infrastructure::notifier;

    #[derive(Clone)]
    struct FakeUserRepo {
        users: Arc<Mutex<Vec<User>>>,
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, _input: NewUser) -> Result<User, DomainError> {
            unimplemented!("not used by the like workflow")
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(None)
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
            Ok(self
                .users
                .lock()
                .expect("users mutex poisoned")
                .iter()
                .find(|user| user.id == id)
                .cloned())
        }
    }

    #[derive(Clone)]
    struct FakePostRepo {
        post: Arc<Mutex<Option<PostWithAuthor>>>,
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, _input: NewPost) -> Result<Post, DomainError> {
            unimplemented!("not used by the like workflow")
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self
                .post
                .lock()
                .expect("post mutex poisoned")
                .clone()
                .map(|p| p.post))
        }

        async fn get_post_with_author(
            &self,
            _id: i64,
        ) -> Result<Option<PostWithAuthor>, DomainError> {
            Ok(self.post.lock().expect("post mutex poisoned").clone())
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn list_posts(&self, _author_id: Option<i64>) -> Result<Vec<Post>, DomainError> {
            Ok(Vec::new())
        }
    }

    /// In-memory likes relation enforcing the uniqueness constraint the
    /// same way the schema does.
    #[derive(Clone)]
    struct FakeLikeRepo {
        rows: Arc<Mutex<HashSet<(i64, i64)>>>,
        fail_storage: bool,
    }

    impl FakeLikeRepo {
        fn new() -> Self {
            Self {
                rows: Arc::new(Mutex::new(HashSet::new())),
                fail_storage: false,
            }
        }

        fn failing() -> Self {
            Self {
                rows: Arc::new(Mutex::new(HashSet::new())),
                fail_storage: true,
            }
        }

        fn row_count(&self) -> usize {
            self.rows.lock().expect("rows mutex poisoned").len()
        }
    }

    #[async_trait]
    impl LikeRepository for FakeLikeRepo {
        async fn insert_like(&self, post_id: i64, user_id: i64) -> Result<(), DomainError> {
            if self.fail_storage {
                return Err(DomainError::Storage("insert like".to_string()));
            }
            let mut rows = self.rows.lock().expect("rows mutex poisoned");
            if !rows.insert((post_id, user_id)) {
                return Err(DomainError::AlreadyLiked);
            }
            Ok(())
        }

        async fn delete_like(&self, post_id: i64, user_id: i64) -> Result<bool, DomainError> {
            if self.fail_storage {
                return Err(DomainError::Storage("delete like".to_string()));
            }
            Ok(self
                .rows
                .lock()
                .expect("rows mutex poisoned")
                .remove(&(post_id, user_id)))
        }

        async fn count_likes(&self, post_id: i64) -> Result<i64, DomainError> {
            Ok(self
                .rows
                .lock()
                .expect("rows mutex poisoned")
                .iter()
                .filter(|(p, _)| *p == post_id)
                .count() as i64)
        }
    }

    fn sample_user(id: i64, username: &str, email: &str) -> User {
        User::new(id, username, email, true, false, Utc::now()).expect("sample user must be valid")
    }

    fn sample_post_with_author(post_id: i64, author: &User) -> PostWithAuthor {
        let post = Post::new(post_id, "Test", "Test post", author.id, Utc::now())
            .expect("sample post must be valid");
        PostWithAuthor {
            post,
            author_username: author.username.clone(),
            author_email: author.email.clone(),
        }
    }

    struct Fixture {
        service: LikeService<FakeUserRepo, FakePostRepo, FakeLikeRepo>,
        likes: FakeLikeRepo,
        notifications: tokio::sync::mpsc::Receiver<crate::domain::like::LikeNotification>,
    }

    /// User 1 (alice) authored post 10; user 2 (bob) is a reader.
    fn fixture_with_likes(likes: FakeLikeRepo) -> Fixture {
        let alice = sample_user(1, "alice", "alice@example.com");
        let bob = sample_user(2, "bob", "bob@example.com");

        let users = FakeUserRepo {
            users: Arc::new(Mutex::new(vec![alice.clone(), bob])),
        };
        let posts = FakePostRepo {
            post: Arc::new(Mutex::new(Some(sample_post_with_author(10, &alice)))),
        };
        let (notifier, notifications) = notifier::channel(8);

        Fixture {
            service: LikeService::new(users, posts, likes.clone(), notifier),
            likes,
            notifications,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_likes(FakeLikeRepo::new())
    }

    #[tokio::test]
    async fn add_like_creates_row_and_queues_notification() {
        let mut fx = fixture();

        let note = fx.service.add_like(10, 2).await.expect("like must succeed");

        assert_eq!(note.post_title, "Test");
        assert_eq!(note.author_username, "alice");
        assert_eq!(note.author_email, "alice@example.com");
        assert_eq!(note.liker_username, "bob");
        assert_eq!(fx.likes.row_count(), 1);

        let queued = fx
            .notifications
            .try_recv()
            .expect("notification must be queued");
        assert_eq!(queued, note);
    }

    #[tokio::test]
    async fn add_like_rejects_author_on_own_post() {
        let mut fx = fixture();

        let err = fx
            .service
            .add_like(10, 1)
            .await
            .expect_err("self-like must be rejected");

        assert!(matches!(err, DomainError::SelfLike));
        assert_eq!(fx.likes.row_count(), 0);
        assert!(fx.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn repeated_add_like_never_creates_a_second_row() {
        let mut fx = fixture();

        fx.service.add_like(10, 2).await.expect("first like");
        let err = fx
            .service
            .add_like(10, 2)
            .await
            .expect_err("second like must collide");

        assert!(matches!(err, DomainError::AlreadyLiked));
        assert_eq!(fx.likes.row_count(), 1);

        // only the first like produced a notification
        assert!(fx.notifications.try_recv().is_ok());
        assert!(fx.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn add_like_on_missing_post_is_not_found() {
        let fx = fixture();
        *fx.service.posts.post.lock().expect("post mutex poisoned") = None;

        let err = fx
            .service
            .add_like(10, 2)
            .await
            .expect_err("missing post must surface");
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(fx.likes.row_count(), 0);
    }

    #[tokio::test]
    async fn add_like_by_unknown_user_is_not_found() {
        let fx = fixture();

        let err = fx
            .service
            .add_like(10, 99)
            .await
            .expect_err("unknown user must surface");
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(fx.likes.row_count(), 0);
    }

    #[tokio::test]
    async fn storage_failure_sends_no_notification() {
        let mut fx = fixture_with_likes(FakeLikeRepo::failing());

        let err = fx
            .service
            .add_like(10, 2)
            .await
            .expect_err("storage failure must surface");

        assert!(matches!(err, DomainError::Storage(_)));
        assert!(fx.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn remove_like_restores_the_pre_like_state() {
        let fx = fixture();

        fx.service.add_like(10, 2).await.expect("like must succeed");
        assert_eq!(fx.likes.row_count(), 1);

        let removed = fx
            .service
            .remove_like(10, 2)
            .await
            .expect("unlike must succeed");
        assert!(removed);
        assert_eq!(fx.likes.row_count(), 0);
    }

    #[tokio::test]
    async fn remove_like_without_existing_like_is_a_noop() {
        let fx = fixture();

        let removed = fx
            .service
            .remove_like(10, 2)
            .await
            .expect("must not error");
        assert!(!removed);
    }

    #[tokio::test]
    async fn remove_like_rejects_author_on_own_post() {
        let fx = fixture();

        let removed = fx
            .service
            .remove_like(10, 1)
            .await
            .expect("must not error");
        assert!(!removed);
    }

    #[tokio::test]
    async fn remove_like_surfaces_storage_failure() {
        let fx = fixture_with_likes(FakeLikeRepo::failing());

        let err = fx
            .service
            .remove_like(10, 2)
            .await
            .expect_err("storage failure must surface");
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn remove_like_on_missing_post_is_not_found() {
        let fx = fixture();
        *fx.service.posts.post.lock().expect("post mutex poisoned") = None;

        let err = fx
            .service
            .remove_like(10, 2)
            .await
            .expect_err("missing post must surface");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
