use std::sync::Arc;

use anyhow::{Context, Result};

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::auth_service::AuthService;
use application::like_service::LikeService;
use application::post_service::PostService;
use data::repositories::postgres::like_repository::PostgresLikeRepository;
use data::repositories::postgres::post_repository::PostgresPostRepository;
use data::repositories::postgres::user_repository::PostgresUserRepository;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::notifier::{self, LogMailer};
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url).await?;
    run_migrations(&pool).await?;

    let private_pem = std::fs::read(&settings.jwt_private_key_path).with_context(|| {
        format!(
            "failed to read private key {}",
            settings.jwt_private_key_path.display()
        )
    })?;
    let public_pem = std::fs::read(&settings.jwt_public_key_path).with_context(|| {
        format!(
            "failed to read public key {}",
            settings.jwt_public_key_path.display()
        )
    })?;
    let jwt = JwtService::from_pem(
        &private_pem,
        &public_pem,
        settings.access_token_expire_minutes,
    )
    .context("failed to build token service")?;

    let user_repo = PostgresUserRepository::new(pool.clone());
    let post_repo = PostgresPostRepository::new(pool.clone());
    let like_repo = PostgresLikeRepository::new(pool.clone());

    let (like_notifier, notifications) = notifier::channel(settings.notify_queue_capacity);
    notifier::spawn_worker(notifications, Arc::new(LogMailer));

    let auth_service = Arc::new(AuthService::new(user_repo.clone(), jwt));
    let post_service = Arc::new(PostService::new(post_repo.clone(), like_repo.clone()));
    let like_service = Arc::new(LikeService::new(
        user_repo,
        post_repo,
        like_repo,
        like_notifier,
    ));

    let state = AppState::new(auth_service, post_service, like_service);

    server::run_http(&settings, state).await
}
