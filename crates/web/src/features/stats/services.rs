use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::stats::SiteStatsResponse,
    repository::{tournament::TournamentRepository, user::UserRepository},
};

use crate::error::WebResult;

/// Public landing-page numbers
pub async fn site_stats(pool: &PgPool) -> WebResult<SiteStatsResponse> {
    let total_members = UserRepository::new(pool).count_all().await?;

    let (total_tournaments, active_tournaments, finished_tournaments, total_games) =
        TournamentRepository::new(pool).site_counts(Utc::now()).await?;

    Ok(SiteStatsResponse {
        total_members,
        total_tournaments,
        active_tournaments,
        finished_tournaments,
        total_games,
        upcoming_tournaments: active_tournaments,
    })
}
