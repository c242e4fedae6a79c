use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};

use crate::presentation::AppState;
use crate::presentation::handlers::likes::{add_like, remove_like};
use crate::presentation::handlers::posts::{create_post, delete_post, get_post, list_posts};
use crate::presentation::middleware::auth::auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_posts))
        .route("/{id}", get(get_post));

    let protected = Router::new()
        .route("/", post(create_post))
        .route("/{id}", delete(delete_post))
        .route("/{id}/likes", post(add_like).delete(remove_like))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}
