use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

/// Name of the HTTP-only cookie carrying the access token.
pub(crate) const AUTH_COOKIE: &str = "bonds_chat";

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) jwt_private_key_path: PathBuf,
    pub(crate) jwt_public_key_path: PathBuf,
    pub(crate) access_token_expire_minutes: i64,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) notify_queue_capacity: usize,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_private_key_path = PathBuf::from(
            get_required("JWT_PRIVATE_KEY_PATH").context("JWT_PRIVATE_KEY_PATH is required")?,
        );
        let jwt_public_key_path = PathBuf::from(
            get_required("JWT_PUBLIC_KEY_PATH").context("JWT_PUBLIC_KEY_PATH is required")?,
        );

        let access_token_expire_minutes: i64 = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .context("Failed to parse ACCESS_TOKEN_EXPIRE_MINUTES, expecting integer")?;
        if access_token_expire_minutes <= 0 {
            return Err(anyhow!("ACCESS_TOKEN_EXPIRE_MINUTES must be > 0"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let notify_queue_capacity = parse_usize_env("NOTIFY_QUEUE_CAPACITY", 1024)?;
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;

        Ok(Self {
            database_url,
            jwt_private_key_path,
            jwt_public_key_path,
            access_token_expire_minutes,
            http_addr,
            cors_origins,
            log_level,
            notify_queue_capacity,
            http_request_body_limit_bytes,
            http_concurrency_limit,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
