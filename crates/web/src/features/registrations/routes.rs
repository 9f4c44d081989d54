use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    check_in_registration, leave_feedback, list_tournament_registrations,
    record_registration_result, register_for_tournament, unregister_from_tournament,
    update_registration_status,
};
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

/// Nested under /api/tournaments alongside the tournament routes
pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/:id/registrations", get(list_tournament_registrations))
        .route(
            "/:id/registrations/:registration_id/status",
            put(update_registration_status),
        )
        .route(
            "/:id/registrations/:registration_id/result",
            put(record_registration_result),
        )
        .route(
            "/:id/registrations/:registration_id/check-in",
            post(check_in_registration),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/:id/register", post(register_for_tournament))
        .route("/:id/register", delete(unregister_from_tournament))
        .route("/:id/feedback", post(leave_feedback))
        .route_layer(middleware::from_fn_with_state(state, require_auth))
        .merge(admin)
}
