use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::error::DomainError;
use crate::domain::like::LikeNotification;
use crate::presentation::AppState;
use crate::presentation::app_error::AppError;
use crate::presentation::middleware::auth::AuthenticatedUser;

/// Wire form of the like notification payload.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LikeNotificationDto {
    pub(crate) title_post: String,
    pub(crate) name_user: String,
    pub(crate) email: String,
    pub(crate) name_friend: String,
}

impl From<LikeNotification> for LikeNotificationDto {
    fn from(note: LikeNotification) -> Self {
        Self {
            title_post: note.post_title,
            name_user: note.author_username,
            email: note.author_email,
            name_friend: note.liker_username,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/posts/{id}/likes",
    tag = "likes",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 201, description = "Like recorded, notification payload returned", body = LikeNotificationDto),
        (status = 400, description = "Self-like or storage failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or user not found"),
        (status = 409, description = "Already liked")
    )
)]
pub(crate) async fn add_like(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Response {
    let outcome = state.like_service.add_like(id, auth.user.id).await;
    add_like_response(outcome)
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}/likes",
    tag = "likes",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Like removed"),
        (status = 400, description = "Nothing to remove, self-unlike or storage failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post or user not found")
    )
)]
pub(crate) async fn remove_like(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> Response {
    let outcome = state.like_service.remove_like(id, auth.user.id).await;
    remove_like_response(outcome)
}

fn add_like_response(outcome: Result<LikeNotification, DomainError>) -> Response {
    match outcome {
        Ok(note) => (
            StatusCode::CREATED,
            Json(json!({ "result": LikeNotificationDto::from(note) })),
        )
            .into_response(),
        Err(DomainError::SelfLike) => like_result(StatusCode::BAD_REQUEST, json!("Error User")),
        Err(DomainError::AlreadyLiked) => like_result(StatusCode::CONFLICT, json!("Already liked")),
        Err(DomainError::Storage(_)) => like_result(StatusCode::BAD_REQUEST, json!("Error BD")),
        Err(err) => AppError::from(err).into_response(),
    }
}

fn remove_like_response(outcome: Result<bool, DomainError>) -> Response {
    match outcome {
        Ok(true) => like_result(StatusCode::OK, json!(true)),
        Ok(false) => like_result(StatusCode::BAD_REQUEST, json!(false)),
        Err(DomainError::Storage(_)) => like_result(StatusCode::BAD_REQUEST, json!(false)),
        Err(err) => AppError::from(err).into_response(),
    }
}

fn like_result(status: StatusCode, result: Value) -> Response {
    (status, Json(json!({ "result": result }))).into_response()
}
