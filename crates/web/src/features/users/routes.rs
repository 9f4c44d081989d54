use axum::{
    Router, middleware,
    routing::{get, put},
};

use super::handlers::{
    general_stats, get_user, list_users, my_registrations, my_stats, update_user_admin,
    update_user_status,
};
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(list_users))
        .route("/stats/general", get(general_stats))
        .route("/:id", get(get_user))
        .route("/:id/status", put(update_user_status))
        .route("/:id/admin", put(update_user_admin))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/me/registrations", get(my_registrations))
        .route("/me/stats", get(my_stats))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
        .merge(admin)
}
