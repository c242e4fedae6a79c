use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::post_service::PostView;
use crate::domain::post::{CreatePostRequest, Post};
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostForm {
    #[validate(length(max = 100))]
    pub(crate) title: String,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct ListPostsQuery {
    pub(crate) author_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) author_id: i64,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDetailDto {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) author_id: i64,
    pub(crate) author_username: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) like_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeleteResultDto {
    pub(crate) result: bool,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            author_id: post.author_id,
            created_at: post.created_at,
        }
    }
}

impl From<PostView> for PostDetailDto {
    fn from(view: PostView) -> Self {
        Self {
            id: view.post.post.id,
            title: view.post.post.title,
            body: view.post.post.body,
            author_id: view.post.post.author_id,
            author_username: view.post.author_username,
            created_at: view.post.post.created_at,
            like_count: view.like_count,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("author_id" = Option<i64>, Query, description = "Only posts by this author")
    ),
    responses(
        (status = 200, description = "Posts listed, newest first when unfiltered", body = [PostDto]),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> AppResult<(StatusCode, Json<Vec<PostDto>>)> {
    let posts = state.post_service.list_posts(query.author_id).await?;

    Ok((
        StatusCode::OK,
        Json(posts.into_iter().map(PostDto::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "Post found", body = PostDetailDto),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<PostDetailDto>)> {
    let view = state.post_service.get_post(id).await?;

    Ok((StatusCode::OK, Json(PostDetailDto::from(view))))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    request_body(content = CreatePostForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Form(form): Form<CreatePostForm>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    form.validate()?;
    let req = CreatePostRequest {
        title: form.title,
        body: form.content,
    };

    let post = state.post_service.create_post(auth.user.id, req).await?;
    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Post id")
    ),
    responses(
        (status = 200, description = "True when the post was deleted, false when the caller does not own it", body = DeleteResultDto),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<DeleteResultDto>)> {
    let result = state.post_service.delete_post(auth.user.id, id).await?;
    Ok((StatusCode::OK, Json(DeleteResultDto { result })))
}
