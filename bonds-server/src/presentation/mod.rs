use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::data::repositories::postgres::like_repository::PostgresLikeRepository;
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod http_handlers;
pub(crate) mod middleware;
pub(crate) mod openapi;
pub(crate) mod routes;

type PgAuthService = AuthService<PostgresUserRepository>;
type PgPostService = PostService<PostgresPostRepository, PostgresLikeRepository>;
type PgLikeService =
    LikeService<PostgresUserRepository, PostgresPostRepository, PostgresLikeRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<PgAuthService>,
    pub(crate) post_service: Arc<PgPostService>,
    pub(crate) like_service: Arc<PgLikeService>,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<PgAuthService>,
        post_service: Arc<PgPostService>,
        like_service: Arc<PgLikeService>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
            like_service,
        }
    }
}
