use axum::{Router, routing::get};

use super::handlers::site_stats;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(site_stats))
}
