use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::stats::SiteStatsResponse};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Public site statistics", body = SiteStatsResponse)
    ),
    tag = "stats"
)]
pub async fn site_stats(State(db): State<Database>) -> Result<Response, WebError> {
    let stats = services::site_stats(db.pool()).await?;

    Ok(Json(stats).into_response())
}
