use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{change_password, login, me, register_account, update_profile};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register_account))
        .route("/login", post(login))
        .merge(protected)
}
