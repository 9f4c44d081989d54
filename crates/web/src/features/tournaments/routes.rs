use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    calendar_tournaments, create_tournament, delete_tournament, get_tournament, list_tournaments,
    monthly_tournaments, tournament_stats, update_tournament, weekly_tournaments,
};
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_tournament))
        .route("/stats", get(tournament_stats))
        .route("/:id", put(update_tournament))
        .route("/:id", delete(delete_tournament))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/", get(list_tournaments))
        .route("/weekly", get(weekly_tournaments))
        .route("/monthly", get(monthly_tournaments))
        .route("/calendar/:year/:month", get(calendar_tournaments))
        .route("/:id", get(get_tournament))
        .merge(admin)
}
