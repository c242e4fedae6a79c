use axum::Json;

use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::auth::UserDto;
use crate::presentation::middleware::auth::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Unauthorized")
    )
)]
pub(crate) async fn me(auth: AuthenticatedUser) -> AppResult<Json<UserDto>> {
    Ok(Json(auth.user.into()))
}
