use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::handlers::users::me;
use crate::presentation::middleware::auth::auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
