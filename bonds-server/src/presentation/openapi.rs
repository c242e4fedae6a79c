use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};

use crate::infrastructure::settings::AUTH_COOKIE;
use crate::presentation::handlers::auth::{
    AuthResponseDto, LoginDto, RegisterDto, RegisteredDto, UserDto,
};
use crate::presentation::handlers::likes::LikeNotificationDto;
use crate::presentation::handlers::posts::{
    CreatePostForm, DeleteResultDto, ListPostsQuery, PostDetailDto, PostDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::auth::logout,
        crate::presentation::handlers::users::me,
        crate::presentation::handlers::posts::list_posts,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::likes::add_like,
        crate::presentation::handlers::likes::remove_like
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            RegisteredDto,
            AuthResponseDto,
            UserDto,
            CreatePostForm,
            ListPostsQuery,
            PostDto,
            PostDetailDto,
            DeleteResultDto,
            LikeNotificationDto
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User endpoints"),
        (name = "posts", description = "Post endpoints"),
        (name = "likes", description = "Like endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
        );
        openapi.components = Some(components);
    }
}
